//! Deferred side effects handed back to the host loop.
//!
//! An [`Effect`] is a plan, not an action: nothing happens until the host
//! calls [`Effect::run`] with its dispatch callback. Keeping the plan as a
//! closed set of variants means the issuance order can be inspected with
//! [`Effect::steps`] before anything runs.

use crate::types::{Cancel, Dispatch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Boxed procedure that receives a dispatch callback.
pub type EffectFn<Msg> = Box<dyn FnOnce(Dispatch<Msg>) + Send>;

/// A deferred unit of work.
pub enum Effect<Msg> {
    /// Does nothing.
    None,

    /// Opaque host effect.
    Call(EffectFn<Msg>),

    /// Begin producing messages for the subscription stored under `key`.
    Start { key: String, effect: EffectFn<Msg> },

    /// Stop the subscription stored under `key`.
    Stop { key: String, cancel: Cancel },

    /// Run every member in order with the same dispatch.
    Batch(Vec<Effect<Msg>>),
}

/// One issued step of an effect plan, in run order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum EffectStep {
    Call,
    Start(String),
    Stop(String),
}

impl<Msg> Default for Effect<Msg> {
    fn default() -> Self {
        Effect::None
    }
}

impl<Msg: 'static> Effect<Msg> {
    pub fn none() -> Self {
        Effect::None
    }

    /// Wrap a host procedure.
    pub fn call(f: impl FnOnce(Dispatch<Msg>) + Send + 'static) -> Self {
        Effect::Call(Box::new(f))
    }

    /// Combine effects; they run in iteration order. An empty batch is a no-op.
    pub fn batch(effects: impl IntoIterator<Item = Effect<Msg>>) -> Self {
        Effect::Batch(effects.into_iter().collect())
    }

    /// True when running this effect would invoke nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Batch(effects) => effects.iter().all(Effect::is_noop),
            Effect::Call(_) | Effect::Start { .. } | Effect::Stop { .. } => false,
        }
    }

    /// Flattened issuance plan.
    pub fn steps(&self) -> Vec<EffectStep> {
        let mut steps = Vec::new();
        self.collect_steps(&mut steps);
        steps
    }

    fn collect_steps(&self, steps: &mut Vec<EffectStep>) {
        match self {
            Effect::None => {}
            Effect::Call(_) => steps.push(EffectStep::Call),
            Effect::Start { key, .. } => steps.push(EffectStep::Start(key.clone())),
            Effect::Stop { key, .. } => steps.push(EffectStep::Stop(key.clone())),
            Effect::Batch(effects) => {
                for effect in effects {
                    effect.collect_steps(steps);
                }
            }
        }
    }

    /// Run the plan.
    ///
    /// Steps are issued sequentially on the calling thread. A panic inside
    /// any step propagates and the remaining steps are not issued.
    pub fn run(self, dispatch: &Dispatch<Msg>) {
        match self {
            Effect::None => {}
            Effect::Call(f) => f(dispatch.clone()),
            Effect::Start { key, effect } => {
                tracing::trace!(key = %key, "starting subscription");
                effect(dispatch.clone());
            }
            Effect::Stop { key, cancel } => {
                tracing::trace!(key = %key, "stopping subscription");
                cancel.call();
            }
            Effect::Batch(effects) => {
                for effect in effects {
                    effect.run(dispatch);
                }
            }
        }
    }

    /// Transform every message this effect dispatches.
    ///
    /// Stop steps never dispatch and pass through unchanged.
    pub fn map<B: 'static>(self, f: impl Fn(Msg) -> B + Send + Sync + 'static) -> Effect<B> {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<B: 'static>(self, f: Arc<dyn Fn(Msg) -> B + Send + Sync>) -> Effect<B> {
        match self {
            Effect::None => Effect::None,
            Effect::Call(run) => Effect::Call(map_effect_fn(run, f)),
            Effect::Start { key, effect } => Effect::Start {
                key,
                effect: map_effect_fn(effect, f),
            },
            Effect::Stop { key, cancel } => Effect::Stop { key, cancel },
            Effect::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|effect| effect.map_shared(Arc::clone(&f)))
                    .collect(),
            ),
        }
    }
}

/// Rewrap a dispatch-taking procedure so it dispatches `f(msg)` instead.
pub(crate) fn map_effect_fn<A: 'static, B: 'static>(
    run: EffectFn<A>,
    f: Arc<dyn Fn(A) -> B + Send + Sync>,
) -> EffectFn<B> {
    Box::new(move |dispatch: Dispatch<B>| run(dispatch.contramap(move |msg: A| f(msg))))
}

impl<Msg> fmt::Debug for Effect<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("None"),
            Effect::Call(_) => f.write_str("Call"),
            Effect::Start { key, .. } => f.debug_struct("Start").field("key", key).finish(),
            Effect::Stop { key, .. } => f.debug_struct("Stop").field("key", key).finish(),
            Effect::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
        }
    }
}
