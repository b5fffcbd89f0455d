use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A mutex paired with the condition variable that waits on it.
///
/// Every blocking primitive in this crate is a `Monitor` over its own state:
/// the runway over its owner, the latch over its count, the cancellation
/// token over its flag. Waiters check their predicate while holding the
/// lock and park on the condvar; state changes broadcast with
/// [`notify_all`](Self::notify_all).
///
/// Poisoning is ignored. The protected state is only ever mutated by plain
/// assignments, so a panic on another thread cannot leave it half-updated.
pub(crate) struct Monitor<T> {
    /// The protected state.
    state: Mutex<T>,

    /// Condition variable associated with `state`.
    cond: Condvar,
}

impl<T> Monitor<T> {
    /// Creates a monitor around `value`.
    pub(crate) const fn new(value: T) -> Self {
        Self {
            state: Mutex::new(value),
            cond: Condvar::new(),
        }
    }

    /// Locks the state, recovering the guard if the mutex is poisoned.
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Releases `guard` and parks until the condvar is signalled.
    ///
    /// Spurious wakeups are possible; callers must re-check their predicate.
    pub(crate) fn wait<'a>(&self, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        self.cond
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    pub(crate) fn wait_timeout<'a>(
        &self,
        guard: MutexGuard<'a, T>,
        timeout: Duration,
    ) -> MutexGuard<'a, T> {
        let (guard, _) = self
            .cond
            .wait_timeout(guard, timeout)
            .unwrap_or_else(PoisonError::into_inner);

        guard
    }

    /// Wakes every thread parked on this monitor.
    pub(crate) fn notify_all(&self) {
        self.cond.notify_all();
    }
}
