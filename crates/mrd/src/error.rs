//! Error types for MRD record operations.

use thiserror::Error;

/// Errors that can occur when building, mutating, or (de)serializing records.
#[derive(Debug, Error)]
pub enum MrdError {
    /// Element kind code not in the supported numeric set.
    #[error("unsupported data type code: {code}")]
    UnsupportedKind { code: u16 },

    /// Type or arity mismatch on a header field assignment, or an attempt
    /// to override a derived field at construction.
    #[error("invalid value for field {field}: {message}")]
    InvalidFieldValue {
        field: &'static str,
        message: String,
    },

    /// Write attempt on a protected field.
    #[error("field {field} is read-only")]
    ReadOnlyField { field: &'static str },

    /// Attribute string length disagrees with the header length field, or
    /// two buffers disagree on a shared dimension.
    #[error("inconsistent length: expected {expected}, got {actual}")]
    InconsistentLength { expected: usize, actual: usize },

    /// Byte source exhausted before the expected length was satisfied.
    #[error("byte source exhausted while reading {section} ({needed} bytes expected)")]
    TruncatedInput {
        section: &'static str,
        needed: usize,
    },

    /// I/O error from the caller-supplied sink or source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for MRD operations.
pub type Result<T> = std::result::Result<T, MrdError>;
