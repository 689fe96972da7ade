//! Timelocked execution for gavel.
//!
//! Authorized actions wait in the [`DelayQueue`] for at least the configured
//! delay and must then be executed within the grace period or they go stale.

pub mod error;
pub mod params;
pub mod queue;

pub use error::TimelockError;
pub use params::{
    TimelockParams, DEFAULT_DELAY, DEFAULT_GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY,
};
pub use queue::{signatures, DelayQueue, SharedTarget};
