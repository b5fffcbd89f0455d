use super::builder::SimulationBuilder;
use super::report::Report;
use crate::error::{Error, Result};
use crate::flight::{Flight, FlightOutcome};
use crate::sync::{CancellationToken, CountDownLatch, Runway, RunwayOptions};

use std::panic;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, info_span, warn};

/// A running simulation.
///
/// `Simulation` owns:
/// - the runway every flight contends for,
/// - the completion latch counting flights down,
/// - the cancellation token shared by every flight,
/// - the join handles of the flight threads.
///
/// Dropping a simulation that has not finished cancels its flights and
/// joins their threads.
pub struct Simulation {
    /// The contended runway.
    runway: Runway,

    /// Opens once every flight has signalled completion.
    latch: CountDownLatch,

    /// Cancels every flight at once.
    token: CancellationToken,

    /// Flight ids and their thread handles, in spawn order.
    flights: Vec<(String, JoinHandle<FlightOutcome>)>,

    /// Upper bound on [`wait`](Self::wait).
    deadline: Option<Duration>,

    /// When the first flight was spawned.
    started: Instant,
}

impl Simulation {
    /// Creates the runway and spawns the flights described by `config`.
    pub(super) fn start(config: SimulationBuilder) -> Result<Self> {
        let runway = Runway::with_options(RunwayOptions {
            policy: config.policy,
            record_history: true,
        });

        let mut simulation = Self {
            runway,
            latch: CountDownLatch::new(config.flights),
            token: CancellationToken::new(),
            flights: Vec::with_capacity(config.flights),
            deadline: config.deadline,
            started: Instant::now(),
        };

        for index in 0..config.flights {
            let id = format!("{}-{}", config.id_prefix, index);

            let flight = Flight::new(
                id.clone(),
                simulation.runway.clone(),
                simulation.latch.clone(),
            )
            .shared_hold_time(config.hold.clone())
            .cancellation(simulation.token.clone());

            let handle = thread::Builder::new().name(id.clone()).spawn(move || {
                let span = info_span!("flight", id = %flight.id());
                let _entered = span.enter();

                flight.run()
            })?;

            simulation.flights.push((id, handle));
        }

        info!(
            flights = config.flights,
            policy = ?config.policy,
            "simulation started"
        );

        Ok(simulation)
    }

    /// The runway the flights contend for.
    pub fn runway(&self) -> &Runway {
        &self.runway
    }

    /// Returns a clone of the token that cancels every flight.
    pub fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancels every flight that has not finished yet.
    ///
    /// Waiting flights are diverted and holding flights are interrupted;
    /// all of them still release the runway and count the latch down.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Number of flights that have not signalled completion yet.
    pub fn pending(&self) -> usize {
        self.latch.count()
    }

    /// Blocks until every flight has signalled completion, then joins the
    /// flight threads and summarises the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CompletionTimedOut`] if a deadline was configured and
    /// it expired first. The remaining flights are then cancelled and joined.
    ///
    /// # Panics
    ///
    /// Resumes the panic of a flight thread that panicked.
    pub fn wait(mut self) -> Result<Report> {
        let opened = match self.deadline {
            Some(deadline) => self.latch.wait_timeout(deadline),
            None => {
                self.latch.wait();
                true
            }
        };

        if !opened {
            let pending = self.latch.count();
            warn!(pending, "deadline expired before every flight landed");

            return Err(Error::CompletionTimedOut { pending });
        }

        let elapsed = self.started.elapsed();

        let mut outcomes = Vec::with_capacity(self.flights.len());
        for (id, handle) in self.flights.drain(..) {
            match handle.join() {
                Ok(outcome) => outcomes.push((id, outcome)),
                Err(payload) => panic::resume_unwind(payload),
            }
        }

        let report = Report {
            outcomes,
            transitions: self.runway.history(),
            elapsed,
        };

        info!(
            landed = report.landed(),
            interrupted = report.interrupted(),
            diverted = report.diverted(),
            elapsed_ms = elapsed.as_millis() as u64,
            "mission completed, all flights done with the runway"
        );

        Ok(report)
    }
}

impl Drop for Simulation {
    /// Shuts the simulation down.
    ///
    /// 1. Cancels every flight still waiting or holding
    /// 2. Joins all flight threads
    fn drop(&mut self) {
        if self.flights.is_empty() {
            return;
        }

        self.token.cancel();

        for (_, handle) in self.flights.drain(..) {
            let _ = handle.join();
        }
    }
}
