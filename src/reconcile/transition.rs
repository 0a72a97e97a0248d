//! Diffing live subscriptions against newly requested ones.

use crate::effect::Effect;
use crate::subscriptions::{CancelSet, Request, SubscriptionSet};
use serde::{Deserialize, Serialize};

/// Outcome of one reconciliation.
#[derive(Debug)]
pub struct Transition<Msg> {
    /// Stop steps for dropped keys, then start steps for new keys.
    pub effect: Effect<Msg>,
    /// Live handles after `effect` has run.
    pub cancels: CancelSet,
    /// Which keys fell into which case.
    pub report: TransitionReport,
}

/// Keys touched by a reconciliation, grouped by outcome, in visit order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub retained: Vec<String>,
}

impl TransitionReport {
    /// No subscription starts or stops.
    pub fn is_unchanged(&self) -> bool {
        self.started.is_empty() && self.stopped.is_empty()
    }
}

/// Reconcile the live `cancels` with the `requested` set.
///
/// Keys are visited once each: first the live keys in their order, then
/// the requested keys not seen yet, in theirs.
///
/// - live and no longer requested: its cancel becomes a stop step
/// - requested and not live: its factory runs now, the subscription's
///   effect becomes a start step and its cancel is recorded
/// - live and still requested: the cancel carries over untouched and the
///   factory is dropped without being called
///
/// Factories run during this call; everything else waits for the returned
/// effect to be run. A panicking factory propagates out of `transition`.
pub fn transition<Msg: 'static>(
    cancels: CancelSet,
    requested: SubscriptionSet<Msg>,
) -> Transition<Msg> {
    let (entries, index) = requested.into_parts();
    let (keys, requests): (Vec<String>, Vec<Request<Msg>>) = entries.into_iter().unzip();
    let mut requests: Vec<Option<Request<Msg>>> = requests.into_iter().map(Some).collect();

    let mut effects = Vec::new();
    let mut next = CancelSet::new();
    let mut report = TransitionReport::default();

    for (key, cancel) in cancels.into_entries() {
        let request = index
            .get(key.as_str())
            .and_then(|&i| requests[i].take());

        match request {
            Some(Request::Requested(_)) => {
                report.retained.push(key.clone());
                next.push(key, cancel);
            }
            Some(Request::NotRequested) | None => {
                report.stopped.push(key.clone());
                effects.push(Effect::Stop { key, cancel });
            }
        }
    }

    for (key, request) in keys.into_iter().zip(requests) {
        if let Some(Request::Requested(factory)) = request {
            let (effect, cancel) = factory().into_parts();
            report.started.push(key.clone());
            next.push(key.clone(), cancel);
            effects.push(Effect::Start { key, effect });
        }
    }

    tracing::trace!(
        started = report.started.len(),
        stopped = report.stopped.len(),
        retained = report.retained.len(),
        "computed subscription transition"
    );

    Transition {
        effect: Effect::batch(effects),
        cancels: next,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectStep;
    use crate::subscriptions::Subscription;
    use crate::types::Dispatch;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<String>>>;

    fn factory(log: &Log, name: &'static str) -> impl FnOnce() -> Subscription<()> + 'static {
        let log = Arc::clone(log);
        move || {
            log.lock().push(format!("{name}:created"));
            let (on_begin, on_end) = (Arc::clone(&log), Arc::clone(&log));
            Subscription::new(
                move |_| on_begin.lock().push(format!("{name}:begin")),
                move || on_end.lock().push(format!("{name}:end")),
            )
        }
    }

    fn live(log: &Log, names: &[&'static str]) -> CancelSet {
        let mut set = SubscriptionSet::new();
        for name in names {
            set = set.request(*name, factory(log, *name));
        }
        let Transition { effect, cancels, .. } = transition(CancelSet::new(), set);
        effect.run(&Dispatch::noop());
        log.lock().clear();
        cancels
    }

    #[test]
    fn test_starts_new_keys() {
        let log: Log = Arc::default();
        let set = SubscriptionSet::new()
            .request("a", factory(&log, "a"))
            .not_requested("b");

        let result = transition(CancelSet::new(), set);
        assert_eq!(*log.lock(), vec!["a:created"]);
        assert_eq!(result.effect.steps(), vec![EffectStep::Start("a".into())]);
        assert_eq!(result.cancels.keys().collect::<Vec<_>>(), vec!["a"]);

        result.effect.run(&Dispatch::noop());
        assert_eq!(*log.lock(), vec!["a:created", "a:begin"]);
    }

    #[test]
    fn test_stops_dropped_keys() {
        let log: Log = Arc::default();
        let cancels = live(&log, &["a", "b"]);

        let set = SubscriptionSet::<()>::new().not_requested("a");
        let result = transition(cancels, set);

        assert_eq!(
            result.effect.steps(),
            vec![EffectStep::Stop("a".into()), EffectStep::Stop("b".into())]
        );
        assert!(result.cancels.is_empty());
        assert!(log.lock().is_empty());

        result.effect.run(&Dispatch::noop());
        assert_eq!(*log.lock(), vec!["a:end", "b:end"]);
    }

    #[test]
    fn test_retained_keys_are_not_restarted() {
        let log: Log = Arc::default();
        let cancels = live(&log, &["tick"]);

        let set = SubscriptionSet::new().request("tick", factory(&log, "tick"));
        let result = transition(cancels, set);

        assert!(result.effect.is_noop());
        assert_eq!(result.report.retained, vec!["tick"]);
        assert!(result.report.is_unchanged());
        assert_eq!(result.cancels.keys().collect::<Vec<_>>(), vec!["tick"]);

        result.effect.run(&Dispatch::noop());
        assert!(log.lock().is_empty(), "factory must not run: {:?}", log.lock());
    }

    #[test]
    fn test_stops_before_starts() {
        let log: Log = Arc::default();
        let cancels = live(&log, &["a", "b", "c"]);

        let set = SubscriptionSet::new()
            .request("d", factory(&log, "d"))
            .request("b", factory(&log, "b"))
            .not_requested("c")
            .request("e", factory(&log, "e"));
        let result = transition(cancels, set);

        assert_eq!(
            result.effect.steps(),
            vec![
                EffectStep::Stop("a".into()),
                EffectStep::Stop("c".into()),
                EffectStep::Start("d".into()),
                EffectStep::Start("e".into()),
            ]
        );
        assert_eq!(
            result.cancels.keys().collect::<Vec<_>>(),
            vec!["b", "d", "e"]
        );
        assert_eq!(
            result.report,
            TransitionReport {
                started: vec!["d".into(), "e".into()],
                stopped: vec!["a".into(), "c".into()],
                retained: vec!["b".into()],
            }
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = TransitionReport {
            started: vec!["tick".into()],
            stopped: vec![],
            retained: vec!["socket".into()],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["started"][0], "tick");
        assert_eq!(json["retained"][0], "socket");
    }
}
