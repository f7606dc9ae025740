//! Errors for query translation.

use stratadb_query_metadata::metadata::DataType;

/// A type for translation errors.
///
/// `MalformedNodeSequence` signals a defect in the parsing pipeline rather
/// than bad caller input; it is surfaced like the rest so it is never
/// silently swallowed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Queries containing {0} are not supported.")]
    NotSupported(String),

    #[error("Member '{path}' is not indexed for structure '{structure}'.")]
    MemberNotFound { path: String, structure: String },

    #[error("Member '{path}' is referenced as {declared} but indexed as {indexed}.")]
    SchemaMismatch {
        path: String,
        declared: DataType,
        indexed: DataType,
    },

    #[error("Take count must be greater than zero, got {0}.")]
    InvalidTakeCount(usize),

    #[error("Page size must be greater than zero, got {0}.")]
    InvalidPageSize(usize),

    #[error("Malformed node sequence: {0}.")]
    MalformedNodeSequence(String),
}
