//! # Subscription Reconciler
//!
//! Keeps the long-lived message sources of a model/update/view program
//! (timers, sockets, listeners) in step with the program's state.
//!
//! ## Core Concepts
//!
//! - **Subscriptions**: an effect that starts producing messages plus a
//!   cancel that stops it
//! - **Subscription sets**: stable keys mapped to requested/not requested,
//!   computed from the model after every update
//! - **Reconciliation**: diffing the running handles against the requested
//!   keys into stop and start steps, leaving unchanged keys running
//! - **Effects**: inspectable plans the host loop runs with its dispatch
//!
//! ## Example
//!
//! ```ignore
//! use subscription_reconciler::{with_subscriptions, Program, SubscriptionSet, Subscriptions};
//!
//! impl Subscriptions for Clock {
//!     fn subscriptions(&self, model: &Model) -> SubscriptionSet<Msg> {
//!         SubscriptionSet::new().request_if(model.running, "tick", || every(SECOND, Msg::Tick))
//!     }
//! }
//!
//! let program = with_subscriptions(Clock);
//! let (dispatch, messages) = Dispatch::channel();
//!
//! let (mut model, effect) = program.init();
//! effect.run(&dispatch);
//! while let Ok(msg) = messages.recv() {
//!     let (next, effect) = program.update(msg, model);
//!     model = next;
//!     effect.run(&dispatch);
//! }
//! program.done(model);
//! ```

pub mod effect;
pub mod error;
pub mod program;
pub mod reconcile;
pub mod subscriptions;
#[cfg(feature = "test-helpers")]
pub mod testing;
pub mod types;

// Re-exports
pub use effect::{Effect, EffectFn, EffectStep};
pub use error::{Result, SubscriptionError};
pub use program::{
    with_subscriptions, with_subscriptions_config, Model, Program, Subscriptions,
    SubscriptionsConfig, WithSubscriptions,
};
pub use reconcile::{transition, Transition, TransitionReport};
pub use subscriptions::{
    batch_subscriptions, map_subscription, CancelSet, Factory, Request, Subscription,
    SubscriptionSet,
};
pub use types::{Cancel, Dispatch};
