use rand::Rng;

use std::time::Duration;

/// Source of the time a flight keeps the runway once it is granted.
///
/// A new duration is drawn for every grant. Any `Fn() -> Duration` closure
/// that is `Send + Sync` is a hold time, which makes deterministic sources
/// trivial to plug in:
///
/// ```rust,ignore
/// let flight = Flight::new("Flight-0", runway, latch)
///     .hold_time(|| Duration::from_millis(20));
/// ```
pub trait HoldTime: Send + Sync {
    /// Returns the duration of the next hold.
    fn next_hold(&self) -> Duration;
}

impl<F> HoldTime for F
where
    F: Fn() -> Duration + Send + Sync,
{
    fn next_hold(&self) -> Duration {
        self()
    }
}

/// Hold times drawn uniformly from `[0, upper)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformHold {
    upper: Duration,
}

impl UniformHold {
    /// Creates a source bounded by `upper` (exclusive).
    pub const fn new(upper: Duration) -> Self {
        Self { upper }
    }

    /// The exclusive upper bound.
    pub const fn upper(&self) -> Duration {
        self.upper
    }
}

impl Default for UniformHold {
    /// Up to five seconds, as a landing takes.
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

impl HoldTime for UniformHold {
    /// Draws a duration; always zero when the range is empty.
    fn next_hold(&self) -> Duration {
        if self.upper.is_zero() {
            return Duration::ZERO;
        }

        rand::rng().random_range(Duration::ZERO..self.upper)
    }
}
