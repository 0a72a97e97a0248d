//! Recording subscriptions for tests.
//!
//! Enabled with the `test-helpers` feature.

use crate::subscriptions::Subscription;
use crate::types::Dispatch;
use parking_lot::Mutex;
use std::sync::Arc;

/// Something a [`TestSubscription`] observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestEvent<Msg> {
    Begin,
    End,
    Emit(Msg),
}

struct Inner<Msg> {
    dispatch: Option<Dispatch<Msg>>,
    events: Vec<TestEvent<Msg>>,
}

/// A subscription whose messages are pushed by hand with [`emit`](Self::emit).
///
/// Every [`subscription`](Self::subscription) it hands out shares one event
/// log, so a test can check how often the subscription was started and
/// stopped. Cloning creates a new handle to the **same** log.
pub struct TestSubscription<Msg> {
    inner: Arc<Mutex<Inner<Msg>>>,
}

impl<Msg> Clone for TestSubscription<Msg> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Msg: Clone + Send + 'static> TestSubscription<Msg> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                dispatch: None,
                events: Vec::new(),
            })),
        }
    }

    /// A subscription value that records `Begin` when started and `End`
    /// when cancelled.
    pub fn subscription(&self) -> Subscription<Msg> {
        let (on_begin, on_end) = (Arc::clone(&self.inner), Arc::clone(&self.inner));
        Subscription::new(
            move |dispatch| {
                let mut inner = on_begin.lock();
                inner.events.push(TestEvent::Begin);
                inner.dispatch = Some(dispatch);
            },
            move || {
                let mut inner = on_end.lock();
                inner.events.push(TestEvent::End);
                inner.dispatch = None;
            },
        )
    }

    /// A factory producing [`subscription`](Self::subscription).
    pub fn factory(&self) -> impl FnOnce() -> Subscription<Msg> + 'static {
        let this = self.clone();
        move || this.subscription()
    }

    /// Deliver `msg` if the subscription is running.
    ///
    /// Returns whether it was delivered. The dispatch runs outside the lock,
    /// so it may re-enter this subscription.
    pub fn emit(&self, msg: Msg) -> bool {
        let dispatch = self.inner.lock().dispatch.clone();
        match dispatch {
            Some(dispatch) => {
                dispatch.dispatch(msg.clone());
                self.inner.lock().events.push(TestEvent::Emit(msg));
                true
            }
            None => false,
        }
    }

    pub fn events(&self) -> Vec<TestEvent<Msg>> {
        self.inner.lock().events.clone()
    }

    pub fn begin_count(&self) -> usize {
        self.count(|event| matches!(event, TestEvent::Begin))
    }

    pub fn end_count(&self) -> usize {
        self.count(|event| matches!(event, TestEvent::End))
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().dispatch.is_some()
    }

    fn count(&self, pred: impl Fn(&TestEvent<Msg>) -> bool) -> usize {
        self.inner.lock().events.iter().filter(|e| pred(e)).count()
    }
}

impl<Msg: Clone + Send + 'static> Default for TestSubscription<Msg> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_only_while_running() {
        let sub = TestSubscription::<u8>::new();
        assert!(!sub.emit(1));

        let cancel = sub.subscription().start(&Dispatch::noop());
        assert!(sub.emit(2));
        cancel.call();
        assert!(!sub.emit(3));

        assert_eq!(
            sub.events(),
            vec![TestEvent::Begin, TestEvent::Emit(2), TestEvent::End]
        );
    }
}
