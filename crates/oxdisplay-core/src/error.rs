//! Error types for oxdisplay

use thiserror::Error;

/// Result type for oxdisplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxdisplay operations
///
/// Note that a misconfigured filter is not an error: a filter whose profile
/// is missing or unreadable degrades to identity and stays in the chain.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to parse ICC profile data
    #[error("Profile parse error: {0}")]
    ProfileParse(String),

    /// Transform creation or execution failed
    #[error("Transform error: {0}")]
    Transform(String),

    /// Buffer too small for the described region
    #[error("Buffer size mismatch: expected at least {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Region geometry is inconsistent (stride shorter than a row, etc.)
    #[error("Invalid region geometry: {0}")]
    Geometry(String),

    /// A parameter field does not exist on the target kernel
    #[error("Parameter {field:?} does not apply to a {kind:?} filter")]
    Parameter { kind: crate::FilterKind, field: crate::ParamField },

    /// A parameter set of one kernel was pushed onto a filter of another
    #[error("Parameter set for {actual:?} does not fit a {expected:?} filter")]
    KindMismatch {
        expected: crate::FilterKind,
        actual: crate::FilterKind,
    },

    /// Persisted filter state could not be decoded
    #[error("State decode error: {0}")]
    State(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
