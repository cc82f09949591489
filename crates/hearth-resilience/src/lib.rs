//! # Hearth Resilience
//!
//! Timeouts for every call that can suspend on a backing store.

pub mod timeout;

pub use timeout::*;
