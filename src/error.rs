//! Declare the error type shared by every container in this crate.

use thiserror::Error;

/// The ways an operation on a bounded table or set can fail.
///
/// Every failure is local: the container that reported it is left exactly as
/// it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// A container was requested with a capacity of zero.
    #[error("capacity must be greater than zero")]
    InvalidCapacity,
    /// The operation would take the container past its fixed capacity.
    #[error("capacity exceeded")]
    Full,
    /// The probe sequence cycled back to its start without finding a vacant
    /// or matching slot.
    #[error("probe sequence exhausted without resolving the collision")]
    CollisionUnresolved,
    /// The requested key or value is not present.
    #[error("no such entry")]
    NotFound,
}
