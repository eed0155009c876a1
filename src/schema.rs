//! Scalar kind binding for target schemas.
//!
//! The host engine describes its target shape with Arrow types; the batch
//! producer works over a fixed enumeration of scalar kinds. Binding happens
//! once at stream construction, before any row is read, so an unsupported
//! descriptor fails the stream before it touches the source.

use arrow::datatypes::{DataType, TimeUnit};

/// The closed set of column element types the batch producer can fill.
///
/// Every kind pairs a descriptor mapping rule (here) with a coercion rule
/// in `batch::column`; extending the set means extending both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Date,
    DateTime,
}

impl ScalarKind {
    /// Map an Arrow type descriptor to its scalar kind.
    ///
    /// Date columns are day-granularity `Date32`; date-time columns are
    /// second-granularity zoneless timestamps. Everything else (nested
    /// types, zoned timestamps and the other primitive widths) has no
    /// mapping.
    pub fn of(data_type: &DataType) -> Option<ScalarKind> {
        match data_type {
            DataType::UInt8 => Some(ScalarKind::UInt8),
            DataType::UInt16 => Some(ScalarKind::UInt16),
            DataType::UInt32 => Some(ScalarKind::UInt32),
            DataType::UInt64 => Some(ScalarKind::UInt64),
            DataType::Int8 => Some(ScalarKind::Int8),
            DataType::Int16 => Some(ScalarKind::Int16),
            DataType::Int32 => Some(ScalarKind::Int32),
            DataType::Int64 => Some(ScalarKind::Int64),
            DataType::Float32 => Some(ScalarKind::Float32),
            DataType::Float64 => Some(ScalarKind::Float64),
            DataType::Utf8 => Some(ScalarKind::String),
            DataType::Date32 => Some(ScalarKind::Date),
            DataType::Timestamp(TimeUnit::Second, None) => Some(ScalarKind::DateTime),
            _ => None,
        }
    }

    /// The source representation this kind expects, for mismatch errors.
    ///
    /// UInt8 expects Bool: a UInt8 column is a boolean flag, not a small
    /// integer. The asymmetry with the other unsigned kinds is kept for
    /// compatibility with the sources this crate fronts.
    pub fn expected(self) -> &'static str {
        match self {
            ScalarKind::UInt8 => "Bool",
            ScalarKind::UInt16
            | ScalarKind::UInt32
            | ScalarKind::UInt64
            | ScalarKind::Int8
            | ScalarKind::Int16
            | ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::Float32
            | ScalarKind::Float64 => "a number",
            ScalarKind::String => "String",
            ScalarKind::Date | ScalarKind::DateTime => "Timestamp",
        }
    }
}
