//! Queue construction parameters and their bounds.

use crate::error::TimelockError;
use gavel_types::Address;

const DAY: u64 = 24 * 60 * 60;

/// Shortest allowed delay between queueing and execution.
pub const MINIMUM_DELAY: u64 = 2 * DAY;
/// Longest allowed delay.
pub const MAXIMUM_DELAY: u64 = 30 * DAY;
/// Default delay of a freshly deployed queue (3 days).
pub const DEFAULT_DELAY: u64 = 3 * DAY;
/// How long after its eta a queued action stays executable.
pub const DEFAULT_GRACE_PERIOD: u64 = 14 * DAY;

#[derive(Clone, Debug)]
pub struct TimelockParams {
    /// The queue's own address. Actions targeting it are self-administration.
    pub address: Address,
    /// The only account allowed to schedule, execute and cancel.
    pub admin: Address,
    pub delay: u64,
    pub grace_period: u64,
}

pub fn check_delay(delay: u64) -> Result<(), TimelockError> {
    if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&delay) {
        return Err(TimelockError::DelayOutOfRange {
            delay,
            min: MINIMUM_DELAY,
            max: MAXIMUM_DELAY,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_bounds_are_inclusive() {
        assert!(check_delay(MINIMUM_DELAY).is_ok());
        assert!(check_delay(MAXIMUM_DELAY).is_ok());
        assert!(check_delay(DEFAULT_DELAY).is_ok());
        assert!(check_delay(MINIMUM_DELAY - 1).is_err());
        assert!(check_delay(MAXIMUM_DELAY + 1).is_err());
    }
}
