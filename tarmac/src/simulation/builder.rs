use super::driver::Simulation;
use super::report::Report;
use crate::error::Result;
use crate::flight::{HoldTime, UniformHold};
use crate::sync::ReleasePolicy;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring and starting a simulation.
///
/// # Examples
///
/// ```rust,ignore
/// let report = SimulationBuilder::new()
///     .flights(10)
///     .max_hold(Duration::from_millis(5000))
///     .run()?;
///
/// assert!(report.alternates());
/// ```
pub struct SimulationBuilder {
    /// Number of flights contending for the runway.
    pub(super) flights: usize,

    /// Hold-time source shared by every flight.
    pub(super) hold: Arc<dyn HoldTime>,

    /// Release policy of the runway.
    pub(super) policy: ReleasePolicy,

    /// Upper bound on the time [`Simulation::wait`] blocks.
    pub(super) deadline: Option<Duration>,

    /// Flight ids are `{id_prefix}-{index}`.
    pub(super) id_prefix: String,
}

impl SimulationBuilder {
    /// Creates a builder with the default configuration.
    ///
    /// By default ten flights contend for a lenient runway, each holding it
    /// for up to five seconds, and the driver waits without a deadline.
    pub fn new() -> Self {
        Self {
            flights: 10,
            hold: Arc::new(UniformHold::default()),
            policy: ReleasePolicy::Lenient,
            deadline: None,
            id_prefix: String::from("Flight"),
        }
    }

    /// Sets the number of flights.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn flights(mut self, n: usize) -> Self {
        assert!(n > 0, "flights must be > 0");

        self.flights = n;
        self
    }

    /// Draws hold times uniformly from `[0, upper)`.
    pub fn max_hold(self, upper: Duration) -> Self {
        self.hold_time(UniformHold::new(upper))
    }

    /// Sets a custom hold-time source shared by every flight.
    pub fn hold_time(mut self, hold: impl HoldTime + 'static) -> Self {
        self.hold = Arc::new(hold);
        self
    }

    /// Sets the runway's release policy.
    pub fn release_policy(mut self, policy: ReleasePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bounds how long [`Simulation::wait`] blocks for the flights.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the prefix of the flight ids.
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Creates the runway and starts one thread per flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`](crate::Error::Spawn) if a flight thread
    /// cannot be spawned. Flights started before the failure are cancelled
    /// and joined.
    pub fn build(self) -> Result<Simulation> {
        Simulation::start(self)
    }

    /// Starts the simulation and waits for it to finish.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build) and [`Simulation::wait`].
    pub fn run(self) -> Result<Report> {
        self.build()?.wait()
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimulationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationBuilder")
            .field("flights", &self.flights)
            .field("policy", &self.policy)
            .field("deadline", &self.deadline)
            .field("id_prefix", &self.id_prefix)
            .finish()
    }
}
