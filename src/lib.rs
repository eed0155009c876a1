//! Stream document-store query results as Arrow record batches.
//!
//! Document stores hand back rows one at a time, each field carrying its
//! own runtime type; columnar engines want fixed-schema, fixed-size
//! batches. This crate is the bridge: bind an Arrow schema to scalar kinds
//! once, then pull records through a [`Cursor`], coercing every present
//! field and default-filling every absent one, one `RecordBatch` per call.
//!
//! The stream is a single forward pass with no buffering beyond the batch
//! being assembled. Validation is strict: a field whose runtime tag does
//! not match its column's kind kills the stream rather than corrupting a
//! column silently.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::datatypes::{DataType, Field, Schema};
//! use docbatch::{Document, DocumentBatchReader, MemoryCursor, Value};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("id", DataType::UInt32, false),
//!     Field::new("name", DataType::Utf8, false),
//! ]));
//! let records: Vec<Document> = vec![
//!     [("id", Value::Int32(1)), ("name", Value::String("a".to_string()))]
//!         .into_iter()
//!         .collect(),
//!     [("id", Value::Int32(2))].into_iter().collect(),
//! ];
//!
//! let cursor = MemoryCursor::new(records);
//! let mut reader = DocumentBatchReader::new(cursor, schema, 1024)?;
//! while let Some(batch) = reader.next_batch()? {
//!     assert_eq!(batch.num_columns(), 2);
//! }
//! assert_eq!(reader.stats().rows_read, 2);
//! # Ok::<(), docbatch::ReadError>(())
//! ```

pub mod batch;
pub mod schema;
pub mod source;
pub mod value;

pub use batch::{
    DocumentBatchReader, ReadError, ReadStats, ReaderOptions, DEFAULT_MAX_BATCH_SIZE,
};
pub use schema::ScalarKind;
pub use source::{Cursor, Document, MemoryCursor, Record, SourceError};
pub use value::Value;
