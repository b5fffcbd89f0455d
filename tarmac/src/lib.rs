//! # Tarmac
//!
//! **Tarmac** simulates flights landing on a single runway. Its core is
//! [`Runway`](sync::Runway), an exclusive resource that admits exactly one
//! holder at a time and blocks every other contender until it is released.
//!
//! The runway is a plain mutex + condition variable state machine:
//!
//! - **Blocking acquire** re-checks the runway state after every wakeup, so
//!   spurious wakeups and competing waiters never produce a double grant
//! - **Broadcast release** wakes every waiter; the OS scheduler decides which
//!   one wins, with no FIFO or priority ordering
//! - **Cancellable waits** let a flight give up waiting, or cut its hold
//!   short, without corrupting the runway or leaving it held
//! - **Guaranteed cleanup** via drop guards: a flight always releases the
//!   runway and always signals the completion latch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tarmac::SimulationBuilder;
//! use std::time::Duration;
//!
//! fn main() -> tarmac::Result<()> {
//!     let report = SimulationBuilder::new()
//!         .flights(10)
//!         .max_hold(Duration::from_millis(5000))
//!         .run()?;
//!
//!     assert_eq!(report.landed(), 10);
//!     assert!(report.alternates());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`sync`] — The runway, the completion latch and the cancellation token
//! - [`flight`] — Flights and their hold-time sources
//! - [`simulation`] — The driver that spawns flights and waits for them

mod error;
mod utils;

pub mod flight;
pub mod simulation;
pub mod sync;

pub use error::{Error, Result};
pub use simulation::{Report, Simulation, SimulationBuilder};
