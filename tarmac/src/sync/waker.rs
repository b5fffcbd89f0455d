use super::monitor::Monitor;

use std::sync::Arc;
use std::task::{Wake, Waker};

/// Waking a monitor broadcasts on its condvar.
///
/// The lock is taken before broadcasting. A waiter that has already checked
/// its predicate under the lock is therefore guaranteed to be parked by the
/// time the broadcast fires, so the wakeup cannot slip between its check and
/// its wait.
impl<T: Send + 'static> Wake for Monitor<T> {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let _guard = self.lock();
        self.notify_all();
    }
}

/// Creates a [`Waker`] that broadcasts on `monitor` when woken.
///
/// This lets a thread blocked on any monitor be interrupted by a
/// [`CancellationToken`](super::CancellationToken).
pub(crate) fn monitor_waker<T: Send + 'static>(monitor: &Arc<Monitor<T>>) -> Waker {
    Waker::from(Arc::clone(monitor))
}
