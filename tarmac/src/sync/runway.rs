use super::cancel::CancellationToken;
use super::monitor::Monitor;
use super::waker::monitor_waker;
use crate::error::{Error, Result};

use std::fmt;
use std::sync::{Arc, MutexGuard};

use tracing::{debug, warn};

/// What a runway does when a flight releases it without holding it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Any caller may release the runway, whoever holds it.
    ///
    /// The mismatch is logged but the release goes through.
    #[default]
    Lenient,

    /// Only the current holder may release the runway.
    ///
    /// A release from anyone else fails with [`Error::OwnershipMismatch`]
    /// and leaves the runway untouched.
    Strict,
}

/// Construction options for a [`Runway`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RunwayOptions {
    /// Release policy, lenient by default.
    pub policy: ReleasePolicy,

    /// Whether every grant and release is appended to the runway journal.
    pub record_history: bool,
}

/// Kind of state change recorded in the runway journal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// The runway went from free to held.
    Granted,

    /// The runway went from held to free.
    Released,
}

/// One entry of the runway journal.
///
/// Entries are appended while the runway lock is held, so their order is the
/// order in which the state actually changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Position in the journal, starting at zero.
    pub seq: u64,

    /// What happened.
    pub kind: TransitionKind,

    /// The flight that was granted the runway, or whose hold ended.
    pub flight: String,
}

/// State guarded by the runway monitor.
struct RunwayState {
    /// Current holder; `None` means the runway is free.
    owner: Option<String>,

    /// Number of threads parked waiting for the runway.
    waiting: usize,

    /// Successful acquisitions so far.
    grants: u64,

    /// Effective releases so far (no-op releases are not counted).
    releases: u64,

    /// Journal of transitions, when recording is enabled.
    history: Option<Vec<Transition>>,
}

impl RunwayState {
    fn record(&mut self, kind: TransitionKind, flight: &str) {
        if let Some(history) = self.history.as_mut() {
            history.push(Transition {
                seq: history.len() as u64,
                kind,
                flight: flight.to_owned(),
            });
        }
    }

    fn grant(&mut self, flight: &str) {
        self.owner = Some(flight.to_owned());
        self.grants += 1;
        self.record(TransitionKind::Granted, flight);
    }
}

/// An exclusive resource that admits one holder at a time.
///
/// A `Runway` is a FREE/HELD state machine guarded by a single mutex and a
/// condition variable:
/// - [`acquire`](Self::acquire) blocks while the runway is held, re-checking
///   the state after every wakeup, then records the caller as owner;
/// - [`release`](Self::release) frees the runway and wakes **all** waiters.
///   Exactly one of them wins the re-check and the others park again.
///
/// Waiters are not queued. Which one wins after a release is decided by the
/// OS scheduler; there is no FIFO or priority order.
///
/// Only the owner bookkeeping happens under the lock. Whatever the holder
/// does with the runway happens outside of it.
///
/// `Runway` is a cheap handle: clones share the same underlying state.
#[derive(Clone)]
pub struct Runway {
    shared: Arc<Monitor<RunwayState>>,
    policy: ReleasePolicy,
}

impl Runway {
    /// Creates a free runway with a lenient release policy and no journal.
    pub fn new() -> Self {
        Self::with_options(RunwayOptions::default())
    }

    /// Creates a free runway with the given options.
    pub fn with_options(options: RunwayOptions) -> Self {
        let state = RunwayState {
            owner: None,
            waiting: 0,
            grants: 0,
            releases: 0,
            history: options.record_history.then(Vec::new),
        };

        Self {
            shared: Arc::new(Monitor::new(state)),
            policy: options.policy,
        }
    }

    /// Blocks until the runway is free, then takes it on behalf of `flight`.
    ///
    /// There is no timeout and no failure path: if the runway is never
    /// released, this call never returns. Always returns `true`.
    pub fn acquire(&self, flight: &str) -> bool {
        let mut state = self.shared.lock();

        while state.owner.is_some() {
            debug!(flight, holder = ?state.owner, "runway busy, waiting");
            state = self.park(state);
        }

        state.grant(flight);
        true
    }

    /// Like [`acquire`](Self::acquire), but gives up if `token` is cancelled
    /// while waiting.
    ///
    /// Cancellation is checked before every grant, so a token that is
    /// already cancelled never obtains the runway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitCancelled`] if the wait was cancelled. The
    /// runway state is left exactly as it was.
    pub fn acquire_until_cancelled(
        &self,
        flight: &str,
        token: &CancellationToken,
    ) -> Result<()> {
        // Registered before locking: an already-cancelled token wakes the
        // monitor on the spot, which takes the runway lock.
        let _registration = token.register(monitor_waker(&self.shared));

        let mut state = self.shared.lock();

        loop {
            if token.is_cancelled() {
                drop(state);
                warn!(flight, "wait for the runway cancelled");
                return Err(Error::WaitCancelled);
            }

            if state.owner.is_none() {
                state.grant(flight);
                return Ok(());
            }

            debug!(flight, holder = ?state.owner, "runway busy, waiting");
            state = self.park(state);
        }
    }

    /// Acquires the runway and returns a guard that releases it on drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitCancelled`] if `token` is cancelled before the
    /// runway is granted.
    pub fn clearance(&self, flight: &str, token: &CancellationToken) -> Result<Clearance> {
        self.acquire_until_cancelled(flight, token)?;

        Ok(Clearance {
            runway: self.clone(),
            holder: flight.to_owned(),
            released: false,
        })
    }

    /// Releases the runway on behalf of `flight`.
    ///
    /// Returns `Ok(true)` if the runway went from held to free, in which case
    /// every waiter is woken. Releasing a free runway is a no-op that returns
    /// `Ok(false)` and wakes nobody.
    ///
    /// # Errors
    ///
    /// Under [`ReleasePolicy::Strict`], returns [`Error::OwnershipMismatch`]
    /// if `flight` is not the current holder. Lenient runways never fail.
    pub fn release(&self, flight: &str) -> Result<bool> {
        let mut state = self.shared.lock();

        let Some(holder) = state.owner.take() else {
            debug!(flight, "release of a free runway ignored");
            return Ok(false);
        };

        if holder != flight {
            if self.policy == ReleasePolicy::Strict {
                state.owner = Some(holder.clone());

                return Err(Error::OwnershipMismatch {
                    holder,
                    requester: flight.to_owned(),
                });
            }

            warn!(
                holder = %holder,
                requester = flight,
                "runway released by a flight that does not hold it"
            );
        }

        state.releases += 1;
        state.record(TransitionKind::Released, &holder);
        self.shared.notify_all();

        Ok(true)
    }

    /// Returns `true` if nobody holds the runway.
    pub fn is_free(&self) -> bool {
        self.shared.lock().owner.is_none()
    }

    /// Returns the current holder, if any.
    pub fn owner(&self) -> Option<String> {
        self.shared.lock().owner.clone()
    }

    /// Number of flights currently parked waiting for the runway.
    pub fn waiting(&self) -> usize {
        self.shared.lock().waiting
    }

    /// Number of grants since the runway was created.
    pub fn grants(&self) -> u64 {
        self.shared.lock().grants
    }

    /// Number of effective releases since the runway was created.
    pub fn releases(&self) -> u64 {
        self.shared.lock().releases
    }

    /// Returns a copy of the journal, empty unless recording was enabled.
    pub fn history(&self) -> Vec<Transition> {
        self.shared.lock().history.clone().unwrap_or_default()
    }

    /// Returns the release policy.
    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Parks on the condvar, keeping the waiter count accurate.
    fn park<'a>(&self, mut state: MutexGuard<'a, RunwayState>) -> MutexGuard<'a, RunwayState> {
        state.waiting += 1;
        let mut state = self.shared.wait(state);
        state.waiting -= 1;

        state
    }
}

impl Default for Runway {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();

        f.debug_struct("Runway")
            .field("owner", &state.owner)
            .field("waiting", &state.waiting)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Proof that a flight holds the runway.
///
/// Returned by [`Runway::clearance`]. Dropping the clearance releases the
/// runway, so the runway cannot stay held because its holder bailed out
/// early or unwound.
#[must_use = "the runway is released as soon as the clearance is dropped"]
pub struct Clearance {
    runway: Runway,
    holder: String,
    released: bool,
}

impl Clearance {
    /// The flight this clearance was granted to.
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Releases the runway now and reports the outcome.
    ///
    /// # Errors
    ///
    /// See [`Runway::release`].
    pub fn release(mut self) -> Result<bool> {
        self.released = true;
        self.runway.release(&self.holder)
    }
}

impl Drop for Clearance {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(err) = self.runway.release(&self.holder) {
            warn!(flight = %self.holder, %err, "failed to release the runway");
        }
    }
}

impl fmt::Debug for Clearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clearance")
            .field("holder", &self.holder)
            .finish()
    }
}
