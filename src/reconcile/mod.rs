//! Reconciliation of running subscriptions against requested ones.
//!
//! Stable keys are what let a state update keep a subscription running
//! instead of tearing it down and starting it again: a timer keyed
//! `"clock"` survives every update that still requests `"clock"`, no matter
//! what else in the model changed.
//!
//! # Invariants
//!
//! 1. A key is in the resulting [`CancelSet`](crate::CancelSet) iff it is
//!    requested by the new set.
//! 2. A factory runs only for keys that were not live.
//! 3. Every dropped handle appears in exactly one stop step.
//! 4. Stop steps precede start steps, each in key visit order.

mod transition;

pub use transition::{transition, Transition, TransitionReport};
