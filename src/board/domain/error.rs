//! Error types for board domain validation and payload decoding.

use thiserror::Error;

/// Errors returned while constructing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// An identifier was empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),
}

/// Error returned while parsing canonical column names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column state: {0}")]
pub struct ParseColumnStateError(pub String);

/// A remote payload that does not decode into task records.
///
/// Read paths treat this exactly like a transport failure: the next fallback
/// tier is tried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedDataError {
    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    /// The payload is neither a record list nor a recognised envelope.
    #[error("expected a list of task records, found {found}")]
    NotARecordList {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A list element is not a JSON object.
    #[error("record at index {index} is {found}, expected an object")]
    RecordNotObject {
        /// Position of the element in the payload.
        index: usize,
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A record carries no usable identifier.
    #[error("record at index {index} has no usable id")]
    MissingId {
        /// Position of the record in the payload.
        index: usize,
    },
}
