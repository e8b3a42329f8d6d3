use std::collections::TryReserveError;

use thiserror::Error;

//=====================================================================
// Errors raised while building the resident nuclear data.
//
// Construction errors are fatal to the single aggregate being built.
// Everything already owned by the failing constructor has been dropped
// by the time one of these reaches the caller.
//
// Releasing an aggregate twice, or releasing one still under
// construction, has no variant. A published aggregate is released by
// `Drop`, which consumes it, and a builder is never an aggregate.
//=====================================================================
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AceError {
    // Malformed dimensions or ordering
    #[error("invalid shape for {what}: {reason}")]
    InvalidShape { what: &'static str, reason: String },

    // Resource exhaustion while reserving a construction buffer
    #[error("failed to allocate {requested} elements for {what}")]
    AllocationFailure { what: &'static str, requested: usize },

    // An integer flag with no known meaning
    #[error("unknown {what} code: {code}")]
    UnknownCode { what: &'static str, code: i64 },

    // Query-time conditions, surfaced by the sampling layer
    #[error("no energy distribution law is applicable at {energy} MeV")]
    NoApplicableLaw { energy: f64 },

    #[error("{what} value {value} is outside [{min}, {max}]")]
    OutOfRange { what: &'static str, value: f64, min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, AceError>;

impl AceError {
    pub(crate) fn shape(what: &'static str, reason: impl Into<String>) -> Self {
        AceError::InvalidShape { what, reason: reason.into() }
    }
}

// Copy a slice into a freshly reserved buffer, reporting exhaustion
// instead of aborting.
pub(crate) fn try_copy<T: Clone>(what: &'static str, values: &[T]) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(values.len())
        .map_err(|_: TryReserveError| AceError::AllocationFailure { what, requested: values.len() })?;
    buffer.extend_from_slice(values);
    Ok(buffer)
}

// Reserve a zero-filled buffer of the given length.
pub(crate) fn try_zeroed(what: &'static str, len: usize) -> Result<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_: TryReserveError| AceError::AllocationFailure { what, requested: len })?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}
