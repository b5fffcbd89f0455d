//! Error type shared by every Tarmac primitive.
//!
//! Acquiring the runway never fails on its own: it either grants or blocks.
//! The only abnormal condition a flight can observe is a cancelled wait.
//! The remaining variants belong to the strict release policy and to the
//! simulation driver.

use std::io;

/// Errors produced by the runway, its cancellation token, and the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A blocked acquire or a timed hold was interrupted by its
    /// [`CancellationToken`](crate::sync::CancellationToken).
    #[error("wait cancelled")]
    WaitCancelled,

    /// A strict runway refused a release from a flight that does not hold it.
    #[error("runway is held by {holder}, release requested by {requester}")]
    OwnershipMismatch { holder: String, requester: String },

    /// The driver's deadline expired before every flight signalled completion.
    #[error("simulation deadline expired with {pending} flight(s) still pending")]
    CompletionTimedOut { pending: usize },

    /// A flight thread could not be spawned.
    #[error("failed to spawn flight thread: {0}")]
    Spawn(#[from] io::Error),
}

impl Error {
    /// Returns `true` if this error is a cancelled wait.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::WaitCancelled)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
