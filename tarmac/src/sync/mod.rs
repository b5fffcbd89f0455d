//! Blocking synchronization primitives for Tarmac.
//!
//! This module provides the thread-blocking tools the simulation is built on:
//! - [`Runway`] — an exclusive resource with blocking acquire and
//!   broadcast-on-release,
//! - [`CountDownLatch`] — a completion barrier that opens after a fixed
//!   number of signals,
//! - [`CancellationToken`] — a signal that interrupts blocked waits.
//!
//! ## Design notes
//!
//! - Every primitive is a mutex paired with a condition variable. Waiters
//!   always re-check their condition in a loop, so spurious wakeups and
//!   competing waiters are harmless.
//! - No primitive spawns threads or keeps process-wide state; each one is
//!   constructed explicitly and shared by cloning its handle.
//! - A blocked wait is interrupted by registering a waker with the
//!   cancellation token; cancelling the token broadcasts on the waiter's own
//!   condition variable.

mod cancel;
mod latch;
mod monitor;
mod runway;
mod waker;

pub use cancel::CancellationToken;
pub use latch::{CountDownLatch, CountDownOnDrop};
pub use runway::{Clearance, ReleasePolicy, Runway, RunwayOptions, Transition, TransitionKind};
