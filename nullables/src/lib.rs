//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The outside world (block production, wall-clock time, contracts reached by
//! the timelock) sits behind traits in `gavel-types`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what was asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod target;

pub use clock::NullChain;
pub use target::{RecordedCall, RecordingTarget};
