//! Threading subscription reconciliation through a program's lifecycle.

use crate::effect::Effect;
use crate::reconcile::{transition, Transition};
use crate::subscriptions::{CancelSet, SubscriptionSet};
use crate::types::Dispatch;

use super::{Program, Subscriptions};

/// Configuration for a wrapped program.
#[derive(Clone, Debug)]
pub struct SubscriptionsConfig {
    /// Name attached to this loop's log events.
    /// Default: "program"
    pub label: String,
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            label: "program".to_string(),
        }
    }
}

/// Model of a wrapped program: the inner model plus the live cancel handles.
///
/// The wrapped program only ever sees `program_model`.
#[derive(Debug)]
pub struct Model<M> {
    program_model: M,
    cancels: CancelSet,
}

impl<M> Model<M> {
    pub fn program_model(&self) -> &M {
        &self.program_model
    }

    /// Keys of the subscriptions currently running.
    pub fn active_keys(&self) -> impl Iterator<Item = &str> {
        self.cancels.keys()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.cancels.contains(key)
    }

    pub fn active_count(&self) -> usize {
        self.cancels.len()
    }
}

/// A program whose subscriptions are kept in step with its model.
pub struct WithSubscriptions<P> {
    program: P,
    config: SubscriptionsConfig,
}

/// Wrap `program` with the default configuration.
pub fn with_subscriptions<P: Subscriptions>(program: P) -> WithSubscriptions<P> {
    with_subscriptions_config(program, SubscriptionsConfig::default())
}

pub fn with_subscriptions_config<P: Subscriptions>(
    program: P,
    config: SubscriptionsConfig,
) -> WithSubscriptions<P> {
    WithSubscriptions { program, config }
}

impl<P: Subscriptions> WithSubscriptions<P> {
    /// The wrapped program.
    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn config(&self) -> &SubscriptionsConfig {
        &self.config
    }

    fn reconcile(
        &self,
        phase: &'static str,
        cancels: CancelSet,
        requested: SubscriptionSet<P::Msg>,
    ) -> (CancelSet, Effect<P::Msg>) {
        let Transition {
            effect,
            cancels,
            report,
        } = transition(cancels, requested);

        tracing::debug!(
            label = %self.config.label,
            phase,
            started = report.started.len(),
            stopped = report.stopped.len(),
            retained = report.retained.len(),
            "reconciled subscriptions"
        );

        (cancels, effect)
    }
}

impl<P: Subscriptions> Program for WithSubscriptions<P> {
    type Model = Model<P::Model>;
    type Msg = P::Msg;
    type View = P::View;

    fn init(&self) -> (Self::Model, Effect<Self::Msg>) {
        let (program_model, program_effect) = self.program.init();
        let requested = self.program.subscriptions(&program_model);
        let (cancels, effect) = self.reconcile("init", CancelSet::new(), requested);

        let model = Model {
            program_model,
            cancels,
        };
        (model, Effect::batch([program_effect, effect]))
    }

    fn update(&self, msg: Self::Msg, model: Self::Model) -> (Self::Model, Effect<Self::Msg>) {
        let Model {
            program_model,
            cancels,
        } = model;
        let (program_model, program_effect) = self.program.update(msg, program_model);
        let requested = self.program.subscriptions(&program_model);
        let (cancels, effect) = self.reconcile("update", cancels, requested);

        let model = Model {
            program_model,
            cancels,
        };
        (model, Effect::batch([program_effect, effect]))
    }

    fn view(&self, model: &Self::Model, dispatch: &Dispatch<Self::Msg>) -> Self::View {
        self.program.view(&model.program_model, dispatch)
    }

    /// Stop every live subscription, then run the wrapped program's `done`.
    ///
    /// The stop steps run immediately with a dispatch that drops messages.
    fn done(&self, model: Self::Model) {
        let Model {
            program_model,
            cancels,
        } = model;
        let (_, effect) = self.reconcile("done", cancels, SubscriptionSet::new());

        effect.run(&Dispatch::noop());
        self.program.done(program_model);
    }
}
