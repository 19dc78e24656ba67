#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use std::time::Duration;

/// Repeating gravity tick. Once cancelled it never reports another tick.
#[derive(Resource, Debug, Clone)]
pub struct GravityTimer {
    period: Duration,
    elapsed: Duration,
    cancelled: bool,
}

impl GravityTimer {
    /// A zero period is clamped to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.elapsed = Duration::ZERO;
    }

    /// Accumulates `delta` and reports whether a tick came due. At most one
    /// tick fires per call; time built up beyond the next period is dropped
    /// so a stalled frame does not replay a burst of ticks.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.cancelled {
            return false;
        }

        self.elapsed += delta;
        if self.elapsed < self.period {
            return false;
        }

        self.elapsed -= self.period;
        if self.elapsed >= self.period {
            self.elapsed = Duration::ZERO;
        }
        true
    }
}
