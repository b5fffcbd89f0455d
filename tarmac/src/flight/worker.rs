use super::hold::{HoldTime, UniformHold};
use crate::sync::{CancellationToken, CountDownLatch, Runway};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

/// How a flight's single run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightOutcome {
    /// The flight held the runway for the full `hold` and released it.
    Landed { hold: Duration },

    /// The flight was granted the runway but its hold was cancelled part way.
    /// The runway was still released.
    Interrupted { hold: Duration },

    /// The flight was cancelled while waiting and never held the runway.
    Diverted,
}

impl FlightOutcome {
    /// Returns `true` if the flight completed its hold.
    pub fn is_landed(&self) -> bool {
        matches!(self, FlightOutcome::Landed { .. })
    }

    /// Returns `true` if the flight was ever granted the runway.
    pub fn was_granted(&self) -> bool {
        !matches!(self, FlightOutcome::Diverted)
    }
}

/// One contender for the runway.
///
/// A `Flight` runs exactly once:
/// 1. Wait for the runway (cancellable)
/// 2. Hold it for a duration drawn from its [`HoldTime`]
/// 3. Release it
/// 4. Count down the completion latch
///
/// Steps 3 and 4 are tied to drop guards, so they happen on every path out of
/// [`run`](Self::run): a diverted flight still counts down, and an
/// interrupted hold still releases.
pub struct Flight {
    /// Label used as the runway owner.
    id: String,

    /// Shared runway handle.
    runway: Runway,

    /// Completion latch shared with the driver.
    latch: CountDownLatch,

    /// Source of the hold duration.
    hold: Arc<dyn HoldTime>,

    /// Cancels the wait and the hold.
    token: CancellationToken,
}

impl Flight {
    /// Creates a flight with a uniform `[0, 5000 ms)` hold and a token of its
    /// own.
    pub fn new(id: impl Into<String>, runway: Runway, latch: CountDownLatch) -> Self {
        Self {
            id: id.into(),
            runway,
            latch,
            hold: Arc::new(UniformHold::default()),
            token: CancellationToken::new(),
        }
    }

    /// Sets the hold-time source.
    pub fn hold_time(self, hold: impl HoldTime + 'static) -> Self {
        self.shared_hold_time(Arc::new(hold))
    }

    /// Sets a hold-time source shared with other flights.
    pub(crate) fn shared_hold_time(mut self, hold: Arc<dyn HoldTime>) -> Self {
        self.hold = hold;
        self
    }

    /// Replaces the flight's cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// The flight's label.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a clone of the token that cancels this flight.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs the flight to completion.
    ///
    /// Blocks the calling thread while waiting for the runway and during the
    /// hold.
    pub fn run(self) -> FlightOutcome {
        let _completion = self.latch.signal_on_drop();

        let clearance = match self.runway.clearance(&self.id, &self.token) {
            Ok(clearance) => clearance,
            Err(err) => {
                warn!(flight = %self.id, %err, "diverted before getting the runway");
                return FlightOutcome::Diverted;
            }
        };

        info!(flight = %self.id, "got the permission to use the runway");

        let hold = self.hold.next_hold();
        info!(flight = %self.id, hold_ms = hold.as_millis() as u64, "using the runway");

        let outcome = match self.token.sleep(hold) {
            Ok(()) => FlightOutcome::Landed { hold },
            Err(err) => {
                warn!(flight = %self.id, %err, "hold interrupted");
                FlightOutcome::Interrupted { hold }
            }
        };

        drop(clearance);
        info!(flight = %self.id, ?outcome, "runway released");

        outcome
    }
}

impl fmt::Debug for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flight")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
