/*!
# Unified Error Type

All fallible operations in `ratwalk` return `Result<T, RatwalkError>`. The four
variants mirror the error kinds a worker can hit: malformed input files,
allocation failure while building per-zone state, an invariant a worker
discovers it cannot satisfy, and a non-recoverable transport fault.

Per the crate's error policy, every error is fatal to the worker that raises
it: there is no retry and no partial-state recovery.
*/

use std::error::Error;
use std::fmt;

/// Unified error type for all `ratwalk` operations.
#[derive(Debug)]
pub enum RatwalkError {
    /// Header parse failures, unexpected node/edge/region ordering,
    /// out-of-range ids, mismatched node counts between files.
    MalformedInput(String),

    /// Zone setup or simulation state allocation unable to secure memory.
    AllocationFailure(String),

    /// A structural invariant (e.g. a zone id outside `[0, Z)`) was violated.
    InvariantViolation(String),

    /// A message send/receive reported a non-recoverable transport error.
    TransportFailure(String),
}

impl RatwalkError {
    pub fn malformed_input(message: impl Into<String>) -> Self {
        RatwalkError::MalformedInput(message.into())
    }

    pub fn allocation_failure(message: impl Into<String>) -> Self {
        RatwalkError::AllocationFailure(message.into())
    }

    pub fn invariant_violation(message: impl Into<String>) -> Self {
        RatwalkError::InvariantViolation(message.into())
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        RatwalkError::TransportFailure(message.into())
    }
}

impl fmt::Display for RatwalkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RatwalkError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
            RatwalkError::AllocationFailure(msg) => write!(f, "allocation failure: {}", msg),
            RatwalkError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
            RatwalkError::TransportFailure(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

impl Error for RatwalkError {}

impl From<std::io::Error> for RatwalkError {
    fn from(e: std::io::Error) -> Self {
        RatwalkError::MalformedInput(e.to_string())
    }
}

impl From<std::num::ParseIntError> for RatwalkError {
    fn from(e: std::num::ParseIntError) -> Self {
        RatwalkError::MalformedInput(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for RatwalkError {
    fn from(e: std::num::ParseFloatError) -> Self {
        RatwalkError::MalformedInput(e.to_string())
    }
}
