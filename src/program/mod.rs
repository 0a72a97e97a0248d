//! Model/update/view programs and the subscription-aware wrapper.
//!
//! The host loop drives a [`Program`]: it calls `init` once, runs the
//! returned effect with a dispatch that feeds `update`, calls `update` for
//! every message (never concurrently for one model), renders with `view`
//! and finally hands the last model to `done`.
//!
//! A program that also implements [`Subscriptions`] can be wrapped with
//! [`with_subscriptions`]; the wrapper is itself a `Program`, and keeps the
//! declared subscriptions running, starting and stopping them as the model
//! changes.

mod adapter;

pub use adapter::{
    with_subscriptions, with_subscriptions_config, Model, SubscriptionsConfig, WithSubscriptions,
};

use crate::effect::Effect;
use crate::subscriptions::SubscriptionSet;
use crate::types::Dispatch;

/// A model/update/view program.
pub trait Program {
    type Model;
    type Msg: 'static;
    type View;

    /// Initial model and effect.
    fn init(&self) -> (Self::Model, Effect<Self::Msg>);

    fn update(&self, msg: Self::Msg, model: Self::Model) -> (Self::Model, Effect<Self::Msg>);

    fn view(&self, model: &Self::Model, dispatch: &Dispatch<Self::Msg>) -> Self::View;

    /// Called once when the loop terminates.
    fn done(&self, _model: Self::Model) {}
}

/// Programs that declare subscriptions as a function of their model.
pub trait Subscriptions: Program {
    fn subscriptions(&self, model: &Self::Model) -> SubscriptionSet<Self::Msg>;
}
