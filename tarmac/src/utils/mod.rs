//! Internal data structures.
//!
//! This module exposes the [`Slab`] arena used by the cancellation token to
//! keep track of registered wakers with cheap key reuse.

mod slab;

pub(crate) use slab::Slab;
