//! Building subscriptions out of other subscriptions.

use crate::effect::{map_effect_fn, EffectFn};
use crate::types::{Cancel, Dispatch};
use std::sync::Arc;

use super::types::Subscription;

/// Re-tag every message a subscription produces.
///
/// The returned subscription dispatches `f(msg)` wherever the source would
/// have dispatched `msg`. Cancelling it is cancelling the source.
pub fn map_subscription<A: 'static, B: 'static>(
    subscription: Subscription<A>,
    f: impl Fn(A) -> B + Send + Sync + 'static,
) -> Subscription<B> {
    let (effect, cancel) = subscription.into_parts();
    Subscription::from_parts(map_effect_fn(effect, Arc::new(f)), cancel)
}

/// Merge subscriptions into one.
///
/// Starting the batch starts every member with the same dispatch, in order;
/// cancelling it cancels every member, in order. Members deliver messages on
/// their own schedule. An empty batch does nothing.
pub fn batch_subscriptions<Msg: 'static>(
    subscriptions: impl IntoIterator<Item = Subscription<Msg>>,
) -> Subscription<Msg> {
    let (effects, cancels): (Vec<EffectFn<Msg>>, Vec<Cancel>) = subscriptions
        .into_iter()
        .map(Subscription::into_parts)
        .unzip();

    Subscription::new(
        move |dispatch: Dispatch<Msg>| {
            for effect in effects {
                effect(dispatch.clone());
            }
        },
        move || {
            for cancel in cancels {
                cancel.call();
            }
        },
    )
}
