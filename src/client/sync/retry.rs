//! # Backoff Strategies
//!
//! Delay schedules for the sync session's two retry loops:
//!
//! - **Resubmission**: a commit whose request failed in transit is sent again,
//!   unchanged, after a growing delay. The server drops the duplicate if the
//!   first attempt landed.
//! - **Pulling**: a failed fetch is retried the same way.
//!
//! Neither loop gives up; a session ends only on a fatal error or detach.

use std::time::Duration;

/// Backoff strategy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Fixed interval between retries
    Fixed { interval: Duration },
    /// Doubling interval, capped at `max`
    Exponential { base: Duration, max: Duration },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            max: Duration::from_secs(5),
        }
    }
}

impl BackoffStrategy {
    /// Delay before retry number `attempt`, counting from zero
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed { interval } => interval,
            Self::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}
