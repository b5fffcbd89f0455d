use super::monitor::Monitor;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A one-shot completion barrier.
///
/// The latch starts at a fixed count. Each participant calls
/// [`count_down`](Self::count_down) once when it finishes, and any number of
/// observers can block in [`wait`](Self::wait) until the count reaches zero.
///
/// The latch is cloneable; all clones share the same counter.
#[derive(Clone)]
pub struct CountDownLatch {
    inner: Arc<Monitor<usize>>,
}

impl CountDownLatch {
    /// Creates a latch that opens after `count` signals.
    ///
    /// A latch created with a count of zero is already open.
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(Monitor::new(count)),
        }
    }

    /// Decrements the count, waking all waiters when it reaches zero.
    ///
    /// Signals beyond the initial count are ignored.
    pub fn count_down(&self) {
        let mut count = self.inner.lock();

        if *count == 0 {
            return;
        }

        *count -= 1;

        if *count == 0 {
            self.inner.notify_all();
        }
    }

    /// Returns the number of signals still expected.
    pub fn count(&self) -> usize {
        *self.inner.lock()
    }

    /// Blocks until the count reaches zero.
    pub fn wait(&self) {
        let mut count = self.inner.lock();

        while *count > 0 {
            count = self.inner.wait(count);
        }
    }

    /// Blocks until the count reaches zero or `timeout` elapses.
    ///
    /// Returns `true` if the latch opened, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.inner.lock();

        while *count > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            count = self.inner.wait_timeout(count, deadline - now);
        }

        true
    }

    /// Returns a guard that counts the latch down once when dropped.
    ///
    /// Arming the guard first thing in a unit of work guarantees that its
    /// completion is signalled on every exit path, including unwinding.
    pub fn signal_on_drop(&self) -> CountDownOnDrop {
        CountDownOnDrop {
            latch: self.clone(),
        }
    }
}

impl fmt::Debug for CountDownLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountDownLatch")
            .field("count", &self.count())
            .finish()
    }
}

/// Guard returned by [`CountDownLatch::signal_on_drop`].
#[must_use = "the latch is counted down as soon as the guard is dropped"]
pub struct CountDownOnDrop {
    latch: CountDownLatch,
}

impl Drop for CountDownOnDrop {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
