//! Error types for subscription sets.

use thiserror::Error;

/// Errors raised while assembling a [`SubscriptionSet`](crate::SubscriptionSet).
///
/// Reconciliation itself never fails: panics raised by factories, effects
/// or cancels travel straight to whoever runs the combined effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Duplicate subscription key: {0}")]
    DuplicateKey(String),
}

/// Result type for subscription set construction.
pub type Result<T> = std::result::Result<T, SubscriptionError>;
