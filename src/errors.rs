//! Error types reported by container operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error when growing a [`Vector`](crate::Vector) fails because the
/// allocator could not provide the requested capacity.
#[derive(Debug, PartialEq)]
pub struct ReserveError {}

impl Display for ReserveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to reserve capacity")
    }
}

impl Error for ReserveError {}
