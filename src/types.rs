//! Core callback types shared by subscriptions and effects.

use crossbeam_channel::{unbounded, Receiver};
use std::fmt;
use std::sync::Arc;

/// Callback that feeds messages back into the host update loop.
///
/// Cloning a `Dispatch` creates a new handle to the **same** callback.
pub struct Dispatch<Msg> {
    callback: Arc<dyn Fn(Msg) + Send + Sync>,
}

impl<Msg> Clone for Dispatch<Msg> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<Msg> fmt::Debug for Dispatch<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").finish_non_exhaustive()
    }
}

impl<Msg: 'static> Dispatch<Msg> {
    /// Wrap a callback.
    pub fn new(callback: impl Fn(Msg) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// A dispatch that drops every message.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Deliver a message.
    pub fn dispatch(&self, msg: Msg) {
        (self.callback)(msg)
    }

    /// Build a dispatch for `A` messages that forwards `f(a)` into this one.
    pub fn contramap<A: 'static>(
        &self,
        f: impl Fn(A) -> Msg + Send + Sync + 'static,
    ) -> Dispatch<A> {
        let inner = self.clone();
        Dispatch::new(move |msg| inner.dispatch(f(msg)))
    }
}

impl<Msg: Send + 'static> Dispatch<Msg> {
    /// Dispatch into an unbounded channel.
    ///
    /// The host loop drains the receiver and feeds each message to `update`.
    /// Messages sent after the receiver is dropped are discarded.
    pub fn channel() -> (Self, Receiver<Msg>) {
        let (sender, receiver) = unbounded();
        let dispatch = Self::new(move |msg| {
            let _ = sender.send(msg);
        });
        (dispatch, receiver)
    }
}

/// One-shot procedure that stops a running subscription.
pub struct Cancel {
    stop: Box<dyn FnOnce() + Send>,
}

impl Cancel {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Box::new(stop),
        }
    }

    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Stop the subscription. Consumes the handle.
    pub fn call(self) {
        (self.stop)()
    }
}

impl fmt::Debug for Cancel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cancel")
    }
}
