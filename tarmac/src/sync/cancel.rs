use super::monitor::Monitor;
use crate::error::{Error, Result};
use crate::utils::Slab;

use std::fmt;
use std::sync::Arc;
use std::task::Waker;
use std::time::{Duration, Instant};

/// A cloneable signal that tells blocked flights to stop waiting.
///
/// Cancelling a token:
/// - wakes every thread sleeping in [`sleep`](Self::sleep),
/// - wakes every waker registered by a blocked primitive (for example a
///   flight parked in
///   [`Runway::acquire_until_cancelled`](super::Runway::acquire_until_cancelled)),
/// - is permanent; a cancelled token never resets.
///
/// All clones observe the same cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Monitor<TokenState>>,
}

/// State guarded by the token's monitor.
struct TokenState {
    /// Whether [`CancellationToken::cancel`] has been called.
    cancelled: bool,

    /// Wakers of primitives currently blocked on behalf of this token.
    wakers: Slab<Waker>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Monitor::new(TokenState {
                cancelled: false,
                wakers: Slab::new(),
            })),
        }
    }

    /// Cancels the token.
    ///
    /// Registered wakers are drained under the lock and woken after it is
    /// released, so a waker is free to take other locks. Calling `cancel`
    /// more than once has no further effect.
    pub fn cancel(&self) {
        let wakers = {
            let mut state = self.inner.lock();

            if state.cancelled {
                return;
            }

            state.cancelled = true;
            self.inner.notify_all();
            state.wakers.drain()
        };

        for waker in wakers {
            waker.wake();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().cancelled
    }

    /// Suspends the current thread for `duration`, or until the token is
    /// cancelled, whichever comes first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitCancelled`] if the token is (or becomes)
    /// cancelled before the duration elapses.
    pub fn sleep(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        let mut state = self.inner.lock();

        loop {
            if state.cancelled {
                return Err(Error::WaitCancelled);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }

            state = self.inner.wait_timeout(state, deadline - now);
        }
    }

    /// Registers `waker` to be woken when the token is cancelled.
    ///
    /// If the token is already cancelled the waker fires immediately.
    /// The registration is withdrawn when the returned guard is dropped.
    pub(crate) fn register(&self, waker: Waker) -> Registration<'_> {
        let mut state = self.inner.lock();

        if state.cancelled {
            drop(state);
            waker.wake();

            return Registration {
                token: self,
                key: None,
            };
        }

        let key = state.wakers.insert(waker);

        Registration {
            token: self,
            key: Some(key),
        }
    }

    /// Number of wakers currently registered.
    #[cfg(test)]
    pub(crate) fn registered(&self) -> usize {
        self.inner.lock().wakers.len()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Guard returned by [`CancellationToken::register`].
///
/// Removes the waker from the token when dropped.
pub(crate) struct Registration<'a> {
    token: &'a CancellationToken,
    key: Option<usize>,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let Some(key) = self.key else {
            return;
        };

        let mut state = self.token.inner.lock();

        // After cancellation the slab has been drained and its keys are stale.
        if !state.cancelled {
            state.wakers.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Wake, Waker};

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_registration_is_withdrawn_on_drop() {
        let token = CancellationToken::new();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));

        {
            let _registration = token.register(Waker::from(counter.clone()));
            assert_eq!(token.registered(), 1);
        }

        assert_eq!(token.registered(), 0);

        token.cancel();
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_wakes_each_registration_once() {
        let token = CancellationToken::new();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));

        let _a = token.register(Waker::from(counter.clone()));
        let _b = token.register(Waker::from(counter.clone()));

        token.cancel();
        token.cancel();

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        assert_eq!(token.registered(), 0);
    }

    #[test]
    fn test_register_after_cancel_wakes_immediately() {
        let token = CancellationToken::new();
        token.cancel();

        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let _registration = token.register(Waker::from(counter.clone()));

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(token.registered(), 0);
    }
}
