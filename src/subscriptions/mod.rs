//! Subscriptions: long-lived message sources a program declares per state.
//!
//! A program describes, for each of its states, which subscriptions should
//! be running as a [`SubscriptionSet`]: stable string keys mapped to a
//! [`Request`]. Nothing is started by building the set; the reconciler
//! decides what actually needs to start or stop.
//!
//! # Example
//!
//! ```ignore
//! let set = SubscriptionSet::new()
//!     .request("clock", || clock_subscription(Duration::from_secs(1)))
//!     .request_if(model.online, "socket", move || socket_subscription(url))
//!     .not_requested("legacy");
//!
//! // Wrap inner messages before they reach the outer program
//! let child = map_subscription(child_subscription(), Msg::Child);
//! let both = batch_subscriptions(vec![child, keyboard_subscription()]);
//! ```

mod combinators;
mod types;

pub use combinators::{batch_subscriptions, map_subscription};
pub use types::{CancelSet, Factory, Request, Subscription, SubscriptionSet};
