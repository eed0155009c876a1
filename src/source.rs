//! Source traits for pulling records out of a document store.
//!
//! [`Cursor`] and [`Record`] are the seam between this crate and a concrete
//! driver: the driver owns the wire protocol, connection handling and any
//! network retry policy, and this crate only pulls. [`MemoryCursor`] is the
//! in-process implementation used by tests and by callers that already hold
//! their records.

use std::collections::{HashMap, VecDeque};

use crate::value::Value;

/// Errors raised by a cursor implementation. They pass through this crate
/// unchanged; no retry, backoff or suppression is added.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One document-like entity with named, optionally-absent fields.
pub trait Record {
    /// Look up a field by name. `None` means the field is absent from this
    /// record, which is distinct from a present [`Value::Null`].
    fn lookup(&self, field: &str) -> Option<&Value>;
}

/// A forward-only, blocking record source.
///
/// `has_more` may perform I/O (typically a round-trip for the next result
/// chunk) and must be idempotent between `next` calls.
pub trait Cursor {
    type Record: Record;

    /// Whether another record can be pulled.
    fn has_more(&mut self) -> Result<bool, SourceError>;

    /// Pull the next record. Only valid after `has_more` returned true.
    fn next(&mut self) -> Result<Self::Record, SourceError>;

    /// Short source name used in diagnostics, e.g. `"Mongo"`.
    fn kind(&self) -> &'static str {
        "Document"
    }
}

/// An owned record backed by a field map.
///
/// Field order is not preserved; records promise lookup by name only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: HashMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

impl Record for Document {
    fn lookup(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Cursor over records already in memory.
pub struct MemoryCursor {
    records: VecDeque<Document>,
}

impl MemoryCursor {
    pub fn new(records: impl IntoIterator<Item = Document>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

impl Cursor for MemoryCursor {
    type Record = Document;

    fn has_more(&mut self) -> Result<bool, SourceError> {
        Ok(!self.records.is_empty())
    }

    fn next(&mut self) -> Result<Document, SourceError> {
        self.records
            .pop_front()
            .ok_or_else(|| SourceError::from("next() called on an exhausted cursor"))
    }

    fn kind(&self) -> &'static str {
        "Memory"
    }
}
