//! Subscription values and the keyed sets the reconciler diffs.

use crate::effect::EffectFn;
use crate::error::{Result, SubscriptionError};
use crate::types::{Cancel, Dispatch};
use std::collections::HashMap;
use std::fmt;

/// A startable, stoppable source of messages.
///
/// A `Subscription` is inert until its effect is invoked with a dispatch
/// callback; from then on it may deliver messages at any time until its
/// cancel runs.
pub struct Subscription<Msg> {
    effect: EffectFn<Msg>,
    cancel: Cancel,
}

impl<Msg: 'static> Subscription<Msg> {
    pub fn new(
        effect: impl FnOnce(Dispatch<Msg>) + Send + 'static,
        cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            effect: Box::new(effect),
            cancel: Cancel::new(cancel),
        }
    }

    pub fn from_parts(effect: EffectFn<Msg>, cancel: Cancel) -> Self {
        Self { effect, cancel }
    }

    /// A subscription whose effect and cancel do nothing.
    pub fn none() -> Self {
        Self::new(|_| {}, || {})
    }

    pub fn into_parts(self) -> (EffectFn<Msg>, Cancel) {
        (self.effect, self.cancel)
    }

    /// Invoke the effect now and hand back the cancel handle.
    pub fn start(self, dispatch: &Dispatch<Msg>) -> Cancel {
        (self.effect)(dispatch.clone());
        self.cancel
    }

    /// See [`map_subscription`](super::map_subscription).
    pub fn map<B: 'static>(self, f: impl Fn(Msg) -> B + Send + Sync + 'static) -> Subscription<B> {
        super::map_subscription(self, f)
    }
}

impl<Msg> fmt::Debug for Subscription<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Deferred constructor, invoked only when its key becomes newly requested.
pub type Factory<Msg> = Box<dyn FnOnce() -> Subscription<Msg>>;

/// Whether a key should have a live subscription.
pub enum Request<Msg> {
    Requested(Factory<Msg>),
    NotRequested,
}

impl<Msg: 'static> Request<Msg> {
    pub fn requested(factory: impl FnOnce() -> Subscription<Msg> + 'static) -> Self {
        Request::Requested(Box::new(factory))
    }

    pub fn is_requested(&self) -> bool {
        matches!(self, Request::Requested(_))
    }
}

impl<Msg, F> From<Option<F>> for Request<Msg>
where
    Msg: 'static,
    F: FnOnce() -> Subscription<Msg> + 'static,
{
    fn from(factory: Option<F>) -> Self {
        match factory {
            Some(factory) => Request::Requested(Box::new(factory)),
            None => Request::NotRequested,
        }
    }
}

impl<Msg> fmt::Debug for Request<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Requested(_) => f.write_str("Requested"),
            Request::NotRequested => f.write_str("NotRequested"),
        }
    }
}

/// Keyed requests for one program state, in insertion order.
///
/// Keys are unique. [`insert`](Self::insert) has plain map semantics (the
/// last write wins and keeps the key's original position); callers that
/// assemble sets from lists and want duplicates treated as the bug they
/// are should use [`try_insert`](Self::try_insert) or
/// [`try_from_entries`](Self::try_from_entries).
pub struct SubscriptionSet<Msg> {
    entries: Vec<(String, Request<Msg>)>,
    /// Key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl<Msg: 'static> SubscriptionSet<Msg> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or replace the request for `key`.
    ///
    /// Returns the replaced request, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        request: Request<Msg>,
    ) -> Option<Request<Msg>> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => {
                tracing::warn!(key = %key, "subscription key inserted twice, keeping last request");
                Some(std::mem::replace(&mut self.entries[index].1, request))
            }
            None => {
                self.append(key, request);
                None
            }
        }
    }

    /// Insert a request, rejecting keys already present.
    pub fn try_insert(&mut self, key: impl Into<String>, request: Request<Msg>) -> Result<()> {
        let key = key.into();
        if self.position(&key).is_some() {
            return Err(SubscriptionError::DuplicateKey(key));
        }
        self.append(key, request);
        Ok(())
    }

    /// Build a set from entries, failing on the first duplicate key.
    pub fn try_from_entries<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, Request<Msg>)>,
    ) -> Result<Self> {
        let mut set = Self::new();
        for (key, request) in entries {
            set.try_insert(key, request)?;
        }
        Ok(set)
    }

    /// Builder: request `key`.
    pub fn request(
        mut self,
        key: impl Into<String>,
        factory: impl FnOnce() -> Subscription<Msg> + 'static,
    ) -> Self {
        self.insert(key, Request::requested(factory));
        self
    }

    /// Builder: request `key` only when `condition` holds.
    pub fn request_if(
        mut self,
        condition: bool,
        key: impl Into<String>,
        factory: impl FnOnce() -> Subscription<Msg> + 'static,
    ) -> Self {
        let request = if condition {
            Request::requested(factory)
        } else {
            Request::NotRequested
        };
        self.insert(key, request);
        self
    }

    /// Builder: mention `key` explicitly as not requested.
    pub fn not_requested(mut self, key: impl Into<String>) -> Self {
        self.insert(key, Request::NotRequested);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// All keys, requested or not, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Keys whose request is [`Request::Requested`].
    pub fn requested_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, request)| request.is_requested())
            .map(|(key, _)| key.as_str())
    }

    /// Entries in order plus the key -> position index.
    pub(crate) fn into_parts(self) -> (Vec<(String, Request<Msg>)>, HashMap<String, usize>) {
        (self.entries, self.index)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn append(&mut self, key: String, request: Request<Msg>) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, request));
    }
}

impl<Msg: 'static> Default for SubscriptionSet<Msg> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Msg: 'static, K: Into<String>> FromIterator<(K, Request<Msg>)> for SubscriptionSet<Msg> {
    fn from_iter<I: IntoIterator<Item = (K, Request<Msg>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, request) in iter {
            set.insert(key, request);
        }
        set
    }
}

impl<Msg> fmt::Debug for SubscriptionSet<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, request)| (key, request)))
            .finish()
    }
}

/// Cancel handles of the subscriptions currently running, keyed like the
/// [`SubscriptionSet`] that started them.
///
/// Only [`transition`](crate::transition) produces a populated set, and it
/// consumes the previous one, so each handle is owned by exactly one set.
#[derive(Default)]
pub struct CancelSet {
    entries: Vec<(String, Cancel)>,
    /// Key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl CancelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub(crate) fn push(&mut self, key: String, cancel: Cancel) {
        debug_assert!(!self.contains(&key), "cancel set already holds {key}");
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, cancel));
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Cancel)> {
        self.entries
    }
}

impl fmt::Debug for CancelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
