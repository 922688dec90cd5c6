use thiserror::Error;

/// Errors that can occur when building or operating on a TsMap, or when
/// driving a workload against one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested capacity is zero.
    #[error("capacity must be greater than 0")]
    InvalidCapacity,
    /// A command-line argument could not be accepted.
    #[error("{0}")]
    InvalidArgument(String),
    /// The requested key was not found in the map.
    #[error("key not found")]
    KeyNotFound,
    /// A new key was offered to a map whose load factor has reached 1.0.
    #[error("map is at capacity ({capacity} entries), new key rejected")]
    CapacityExceeded {
        /// The fixed capacity of the map that refused the key.
        capacity: usize,
    },
    /// A worker thread could not be spawned or joined.
    #[error("{0}")]
    ThreadFailure(String),
    /// A structural invariant of the table does not hold.
    #[error("map corrupted: {0}")]
    Corrupted(String),
}
