//! The simulation driver.
//!
//! A simulation creates one [`Runway`](crate::sync::Runway) and one
//! [`CountDownLatch`](crate::sync::CountDownLatch), spawns one thread per
//! [`Flight`](crate::flight::Flight), and blocks on the latch until every
//! flight has released the runway. The run is summarised as a [`Report`].

mod builder;
mod driver;
mod report;

pub use builder::SimulationBuilder;
pub use driver::Simulation;
pub use report::Report;
