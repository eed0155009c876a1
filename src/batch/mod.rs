//! Batch production: document records in, Arrow record batches out.
//!
//! [`DocumentBatchReader`] owns a cursor and fills one `RecordBatch` per
//! call, coercing every present field into its bound column and filling
//! every absent field with a default. The per-kind coercion and default
//! rules live in the column writers.

mod column;
mod reader;

pub use reader::{DocumentBatchReader, ReadStats, ReaderOptions, DEFAULT_MAX_BATCH_SIZE};

use arrow::datatypes::DataType;
use thiserror::Error;

use crate::source::SourceError;

/// Errors that can occur while binding a schema or producing batches.
///
/// Nothing here is recoverable: every variant is terminal for the stream
/// that raised it.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The target schema contains a descriptor with no scalar-kind mapping.
    #[error("unsupported type {0}")]
    UnsupportedType(DataType),

    /// A present field's runtime tag does not match its column's kind.
    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A configured default names a field the schema does not have.
    #[error("default value for unknown field '{0}'")]
    UnknownField(String),

    #[error("max batch size must be nonzero")]
    ZeroBatchSize,

    /// A cursor failure, passed through unchanged.
    #[error("source error: {0}")]
    Source(SourceError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
