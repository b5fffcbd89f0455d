//! Flights: the contenders for the runway.
//!
//! A [`Flight`] acquires the shared [`Runway`](crate::sync::Runway), holds it
//! for a duration drawn from a [`HoldTime`] source, releases it, and signals
//! the completion latch. The hold happens outside the runway lock; only the
//! owner bookkeeping is done under it.

mod hold;
mod worker;

pub use hold::{HoldTime, UniformHold};
pub use worker::{Flight, FlightOutcome};
