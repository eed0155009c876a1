//! The batch-producing stream over a document cursor.

use std::collections::HashMap;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use tracing::debug;

use super::column::{kind_accepts, ColumnWriter};
use super::ReadError;
use crate::schema::ScalarKind;
use crate::source::{Cursor, Record};
use crate::value::Value;

/// Batch size used by [`ReaderOptions::default`].
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1024;

/// Stream configuration.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Upper bound on rows per produced batch.
    pub max_batch_size: usize,
    /// Per-field values used when a record lacks the field, overriding the
    /// kind's zero value. Validated against the bound kinds at
    /// construction.
    pub defaults: HashMap<String, Value>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            defaults: HashMap::new(),
        }
    }
}

/// Counters over the stream's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Source records consumed so far.
    pub rows_read: u64,
    /// Non-empty batches handed to the caller.
    pub batches_produced: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unstarted,
    Active,
    Exhausted,
}

/// One bound output column: schema name, scalar kind, and the configured
/// default for absent fields, if any.
struct BoundField {
    name: String,
    kind: ScalarKind,
    default: Option<Value>,
}

/// Streams the records behind a document cursor as fixed-schema Arrow
/// record batches.
///
/// Construction binds every schema field to a scalar kind up front, so an
/// unsupported descriptor fails before anything is read. `next_batch` then
/// pulls records until the batch is full or the cursor runs dry. The
/// stream is forward-only and single-use: every error is terminal, and
/// after exhaustion further calls return `Ok(None)` without touching the
/// cursor.
pub struct DocumentBatchReader<C: Cursor> {
    cursor: C,
    schema: SchemaRef,
    fields: Vec<BoundField>,
    max_batch_size: usize,
    state: State,
    stats: ReadStats,
}

impl<C: Cursor> DocumentBatchReader<C> {
    /// Bind `schema` against `cursor` with zero-value defaults.
    pub fn new(cursor: C, schema: SchemaRef, max_batch_size: usize) -> Result<Self, ReadError> {
        Self::with_options(
            cursor,
            schema,
            ReaderOptions {
                max_batch_size,
                ..ReaderOptions::default()
            },
        )
    }

    pub fn with_options(
        mut cursor: C,
        schema: SchemaRef,
        mut options: ReaderOptions,
    ) -> Result<Self, ReadError> {
        if options.max_batch_size == 0 {
            return Err(ReadError::ZeroBatchSize);
        }

        let mut fields = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let kind = ScalarKind::of(field.data_type())
                .ok_or_else(|| ReadError::UnsupportedType(field.data_type().clone()))?;
            let default = options.defaults.remove(field.name());
            if let Some(value) = &default {
                if !kind_accepts(kind, value) {
                    return Err(ReadError::TypeMismatch {
                        field: field.name().clone(),
                        expected: kind.expected(),
                        got: value.tag(),
                    });
                }
            }
            fields.push(BoundField {
                name: field.name().clone(),
                kind,
                default,
            });
        }
        if let Some(name) = options.defaults.into_keys().next() {
            return Err(ReadError::UnknownField(name));
        }

        // An empty source never allocates a first batch.
        let state = if cursor.has_more().map_err(ReadError::Source)? {
            State::Unstarted
        } else {
            State::Exhausted
        };

        debug!(
            source = cursor.kind(),
            fields = fields.len(),
            max_batch_size = options.max_batch_size,
            "bound document schema"
        );

        Ok(Self {
            cursor,
            schema,
            fields,
            max_batch_size: options.max_batch_size,
            state,
            stats: ReadStats::default(),
        })
    }

    /// Produce the next batch, or `None` once the source is exhausted.
    ///
    /// A returned batch holds between 1 and `max_batch_size` rows; the
    /// final batch of a stream is usually short. Exhaustion is idempotent:
    /// once `None` is returned, every later call returns `None` without
    /// I/O. Any error here poisons the stream the same way.
    pub fn next_batch(&mut self) -> Result<Option<RecordBatch>, ReadError> {
        if self.state == State::Exhausted {
            return Ok(None);
        }
        self.state = State::Active;

        let mut writers: Vec<ColumnWriter> = self
            .fields
            .iter()
            .map(|f| ColumnWriter::for_kind(f.kind))
            .collect();

        let rows = match self.fill(&mut writers) {
            Ok(rows) => rows,
            Err(e) => {
                self.state = State::Exhausted;
                return Err(e);
            }
        };
        self.stats.rows_read += rows as u64;

        let batch = if rows == 0 {
            None
        } else {
            let columns: Vec<_> = writers.iter_mut().map(|w| w.finish()).collect();
            // A zero-field schema still needs its row count carried.
            let batch = if columns.is_empty() {
                let options = RecordBatchOptions::new().with_row_count(Some(rows));
                RecordBatch::try_new_with_options(self.schema.clone(), columns, &options)?
            } else {
                RecordBatch::try_new(self.schema.clone(), columns)?
            };
            self.stats.batches_produced += 1;
            Some(batch)
        };

        if self.state == State::Exhausted {
            debug!(
                rows_read = self.stats.rows_read,
                batches_produced = self.stats.batches_produced,
                "document source exhausted"
            );
        }

        Ok(batch)
    }

    /// Pull records into `writers` until the batch is full or the cursor
    /// is exhausted, whichever comes first.
    fn fill(&mut self, writers: &mut [ColumnWriter]) -> Result<usize, ReadError> {
        let mut rows = 0;
        while rows < self.max_batch_size {
            if !self.cursor.has_more().map_err(ReadError::Source)? {
                self.state = State::Exhausted;
                break;
            }
            let record = self.cursor.next().map_err(ReadError::Source)?;

            for (field, writer) in self.fields.iter().zip(writers.iter_mut()) {
                match record.lookup(&field.name) {
                    Some(value) => writer.write(&field.name, value)?,
                    None => match &field.default {
                        Some(value) => writer.write(&field.name, value)?,
                        None => writer.write_default(),
                    },
                }
            }
            rows += 1;
        }
        Ok(rows)
    }

    /// The bound target schema.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Short name of the underlying source.
    pub fn name(&self) -> &'static str {
        self.cursor.kind()
    }

    /// Diagnostic identity of the form `"<kind>(@<cursor address>)"`.
    ///
    /// Only as unique as the cursor's address for its lifetime; never use
    /// it as a correctness-bearing key.
    pub fn id(&self) -> String {
        let cursor: *const C = &self.cursor;
        format!("{}(@{:p})", self.cursor.kind(), cursor)
    }

    /// Lifetime counters for this stream.
    pub fn stats(&self) -> ReadStats {
        self.stats
    }
}
