//! Property tests for the combinators and the reconciler.

use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use subscription_reconciler::testing::TestSubscription;
use subscription_reconciler::{
    batch_subscriptions, map_subscription, transition, CancelSet, Dispatch, EffectStep, Request,
    Subscription, SubscriptionSet,
};

/// Start `subscription`, emit `msgs` through `source`, return what arrived.
fn collect<T: Send + 'static>(
    source: &TestSubscription<u8>,
    subscription: Subscription<T>,
    msgs: &[u8],
) -> Vec<T> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let cancel = subscription.start(&Dispatch::new(move |msg| sink.lock().push(msg)));
    for msg in msgs {
        source.emit(*msg);
    }
    cancel.call();
    let out = std::mem::take(&mut *seen.lock());
    out
}

fn key(i: u8) -> String {
    format!("k{i}")
}

/// Live cancel set for `keys`, in order.
fn live(keys: &[u8]) -> CancelSet {
    let set = keys
        .iter()
        .fold(SubscriptionSet::<u8>::new(), |set, i| {
            set.request(key(*i), Subscription::none)
        });
    let result = transition(CancelSet::new(), set);
    result.effect.run(&Dispatch::noop());
    result.cancels
}

fn unique(keys: Vec<u8>) -> Vec<u8> {
    let mut seen = BTreeSet::new();
    keys.into_iter().filter(|k| seen.insert(*k)).collect()
}

// --- Functor Laws ---

proptest! {
    #[test]
    fn map_identity(msgs in proptest::collection::vec(any::<u8>(), 0..32)) {
        let plain = TestSubscription::new();
        let mapped = TestSubscription::new();

        let direct = collect(&plain, plain.subscription(), &msgs);
        let through = collect(&mapped, map_subscription(mapped.subscription(), |m| m), &msgs);

        prop_assert_eq!(&direct, &msgs);
        prop_assert_eq!(through, direct);
    }

    #[test]
    fn map_composition(msgs in proptest::collection::vec(any::<u8>(), 0..32)) {
        let f = |m: u8| u16::from(m) * 3;
        let g = |m: u16| format!("<{m}>");

        let nested = TestSubscription::new();
        let composed = TestSubscription::new();

        let a = collect(&nested, map_subscription(map_subscription(nested.subscription(), f), g), &msgs);
        let b = collect(&composed, map_subscription(composed.subscription(), move |m| g(f(m))), &msgs);

        prop_assert_eq!(a, b);
    }
}

// --- Batching ---

proptest! {
    #[test]
    fn batch_starts_and_cancels_in_index_order(n in 0usize..12) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let members = (0..n).map(|i| {
            let (on_begin, on_end) = (Arc::clone(&log), Arc::clone(&log));
            Subscription::<u8>::new(
                move |_| on_begin.lock().push((i, "begin")),
                move || on_end.lock().push((i, "end")),
            )
        });

        let batch = batch_subscriptions(members.collect::<Vec<_>>());
        batch.start(&Dispatch::noop()).call();

        let expected: Vec<_> = (0..n)
            .map(|i| (i, "begin"))
            .chain((0..n).map(|i| (i, "end")))
            .collect();
        prop_assert_eq!(&*log.lock(), &expected);
    }
}

// --- Reconciler ---

proptest! {
    #[test]
    fn transition_keeps_exactly_requested_keys(
        previous in proptest::collection::vec(0u8..12, 0..12),
        requested in proptest::collection::vec((0u8..12, any::<bool>()), 0..16),
    ) {
        let previous = unique(previous);
        let created = Arc::new(AtomicUsize::new(0));

        let set: SubscriptionSet<u8> = requested
            .iter()
            .map(|(i, wanted)| {
                let created = Arc::clone(&created);
                let request = if *wanted {
                    Request::requested(move || {
                        created.fetch_add(1, Ordering::SeqCst);
                        Subscription::none()
                    })
                } else {
                    Request::NotRequested
                };
                (key(*i), request)
            })
            .collect();
        let wanted: Vec<String> = set.requested_keys().map(str::to_string).collect();

        let result = transition(live(&previous), set);

        let kept: BTreeSet<String> = result.cancels.keys().map(str::to_string).collect();
        let expected: BTreeSet<String> = wanted.iter().cloned().collect();
        prop_assert_eq!(kept, expected);

        let was_live: BTreeSet<String> = previous.iter().map(|i| key(*i)).collect();
        let expected_stops: Vec<EffectStep> = previous
            .iter()
            .map(|i| key(*i))
            .filter(|k| !wanted.contains(k))
            .map(EffectStep::Stop)
            .collect();
        let expected_starts: Vec<EffectStep> = wanted
            .iter()
            .filter(|k| !was_live.contains(*k))
            .cloned()
            .map(EffectStep::Start)
            .collect();
        let expected_steps: Vec<EffectStep> =
            expected_stops.into_iter().chain(expected_starts).collect();

        prop_assert_eq!(created.load(Ordering::SeqCst), result.report.started.len());
        prop_assert_eq!(result.effect.steps(), expected_steps);
    }

    #[test]
    fn transition_without_change_is_noop(previous in proptest::collection::vec(0u8..20, 0..20)) {
        let previous = unique(previous);
        let cancels = live(&previous);
        let before: Vec<String> = cancels.keys().map(str::to_string).collect();

        let set = previous
            .iter()
            .fold(SubscriptionSet::<u8>::new(), |set, i| {
                set.request(key(*i), || -> Subscription<u8> { panic!("retained key restarted") })
            });
        let result = transition(cancels, set);

        prop_assert!(result.effect.is_noop());
        prop_assert!(result.report.is_unchanged());
        let after: Vec<String> = result.cancels.keys().map(str::to_string).collect();
        prop_assert_eq!(after, before);
    }
}
