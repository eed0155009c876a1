//! Dynamic value model for document fields.
//!
//! Document stores are schema-less: each field of a record carries its own
//! runtime type. [`Value`] is the closed set of scalar shapes this crate
//! understands; the column writers match these tags against the bound
//! scalar kinds. Arrays and nested documents are deliberately absent.

/// A dynamically-typed scalar read from a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    /// Milliseconds since the Unix epoch, the wire resolution of
    /// document-store date values.
    Timestamp(i64),
    /// An explicit null. Present in the record, but never coercible.
    Null,
}

impl Value {
    /// The value's runtime tag, as reported in mismatch errors.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Null => "Null",
        }
    }

    /// Whether this value carries a numeric tag (Int32, Int64 or Double).
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Int64(_) | Value::Double(_))
    }

    /// Try to get this value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value truncated to i32. Doubles lose their fractional part,
    /// wider integers their high bits.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::Int64(v) => Some(*v as i32),
            Value::Double(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Numeric value truncated to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::Double(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Numeric value widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(*v as f64),
            Value::Int64(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Epoch-milliseconds for date-like values.
    pub fn as_timestamp_millis(&self) -> Option<i64> {
        match self {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}
