//! Column writers: per-kind validation, coercion and default filling.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Builder, Float32Builder, Float64Builder, Int16Builder, Int32Builder,
    Int64Builder, Int8Builder, StringBuilder, TimestampSecondBuilder, UInt16Builder, UInt32Builder,
    UInt64Builder, UInt8Builder,
};

use super::ReadError;
use crate::schema::ScalarKind;
use crate::value::Value;

const MILLIS_PER_DAY: i64 = 86_400_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// A typed Arrow builder for one output column.
///
/// One variant per scalar kind. `write` performs the validated coercion,
/// `write_default` the zero-value fill.
pub(crate) enum ColumnWriter {
    UInt8(UInt8Builder),
    UInt16(UInt16Builder),
    UInt32(UInt32Builder),
    UInt64(UInt64Builder),
    Int8(Int8Builder),
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    String(StringBuilder),
    Date(Date32Builder),
    DateTime(TimestampSecondBuilder),
}

impl ColumnWriter {
    pub(crate) fn for_kind(kind: ScalarKind) -> ColumnWriter {
        match kind {
            ScalarKind::UInt8 => ColumnWriter::UInt8(UInt8Builder::new()),
            ScalarKind::UInt16 => ColumnWriter::UInt16(UInt16Builder::new()),
            ScalarKind::UInt32 => ColumnWriter::UInt32(UInt32Builder::new()),
            ScalarKind::UInt64 => ColumnWriter::UInt64(UInt64Builder::new()),
            ScalarKind::Int8 => ColumnWriter::Int8(Int8Builder::new()),
            ScalarKind::Int16 => ColumnWriter::Int16(Int16Builder::new()),
            ScalarKind::Int32 => ColumnWriter::Int32(Int32Builder::new()),
            ScalarKind::Int64 => ColumnWriter::Int64(Int64Builder::new()),
            ScalarKind::Float32 => ColumnWriter::Float32(Float32Builder::new()),
            ScalarKind::Float64 => ColumnWriter::Float64(Float64Builder::new()),
            ScalarKind::String => ColumnWriter::String(StringBuilder::new()),
            ScalarKind::Date => ColumnWriter::Date(Date32Builder::new()),
            ScalarKind::DateTime => ColumnWriter::DateTime(TimestampSecondBuilder::new()),
        }
    }

    /// Append `value` after validating its runtime tag against this
    /// column's kind.
    ///
    /// Numeric coercions truncate; the 16/32-bit and 8-bit integer kinds go
    /// through i32 first and are then narrowed, the 64-bit kinds through
    /// i64. No cross-tag fallback is attempted: a String is never parsed
    /// into a number, and a mismatch is fatal to the whole stream.
    pub(crate) fn write(&mut self, field: &str, value: &Value) -> Result<(), ReadError> {
        match self {
            // A UInt8 column is a boolean flag: only Bool coerces, as 0/1.
            ColumnWriter::UInt8(b) => {
                let v = value
                    .as_bool()
                    .ok_or_else(|| mismatch(field, ScalarKind::UInt8, value))?;
                b.append_value(v as u8);
            }
            ColumnWriter::UInt16(b) => {
                let v = value
                    .as_i32()
                    .ok_or_else(|| mismatch(field, ScalarKind::UInt16, value))?;
                b.append_value(v as u16);
            }
            ColumnWriter::UInt32(b) => {
                let v = value
                    .as_i32()
                    .ok_or_else(|| mismatch(field, ScalarKind::UInt32, value))?;
                b.append_value(v as u32);
            }
            ColumnWriter::UInt64(b) => {
                let v = value
                    .as_i64()
                    .ok_or_else(|| mismatch(field, ScalarKind::UInt64, value))?;
                b.append_value(v as u64);
            }
            ColumnWriter::Int8(b) => {
                let v = value
                    .as_i32()
                    .ok_or_else(|| mismatch(field, ScalarKind::Int8, value))?;
                b.append_value(v as i8);
            }
            ColumnWriter::Int16(b) => {
                let v = value
                    .as_i32()
                    .ok_or_else(|| mismatch(field, ScalarKind::Int16, value))?;
                b.append_value(v as i16);
            }
            ColumnWriter::Int32(b) => {
                let v = value
                    .as_i32()
                    .ok_or_else(|| mismatch(field, ScalarKind::Int32, value))?;
                b.append_value(v);
            }
            ColumnWriter::Int64(b) => {
                let v = value
                    .as_i64()
                    .ok_or_else(|| mismatch(field, ScalarKind::Int64, value))?;
                b.append_value(v);
            }
            ColumnWriter::Float32(b) => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| mismatch(field, ScalarKind::Float32, value))?;
                b.append_value(v as f32);
            }
            ColumnWriter::Float64(b) => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| mismatch(field, ScalarKind::Float64, value))?;
                b.append_value(v);
            }
            ColumnWriter::String(b) => {
                let v = value
                    .as_str()
                    .ok_or_else(|| mismatch(field, ScalarKind::String, value))?;
                b.append_value(v);
            }
            // Epoch-millis floored to a day number since the epoch.
            ColumnWriter::Date(b) => {
                let millis = value
                    .as_timestamp_millis()
                    .ok_or_else(|| mismatch(field, ScalarKind::Date, value))?;
                b.append_value(millis.div_euclid(MILLIS_PER_DAY) as i32);
            }
            // Epoch-millis floored to whole seconds.
            ColumnWriter::DateTime(b) => {
                let millis = value
                    .as_timestamp_millis()
                    .ok_or_else(|| mismatch(field, ScalarKind::DateTime, value))?;
                b.append_value(millis.div_euclid(MILLIS_PER_SECOND));
            }
        }
        Ok(())
    }

    /// Append the kind's zero value: numeric 0, empty string, day 0, or
    /// epoch-zero seconds.
    pub(crate) fn write_default(&mut self) {
        match self {
            ColumnWriter::UInt8(b) => b.append_value(0),
            ColumnWriter::UInt16(b) => b.append_value(0),
            ColumnWriter::UInt32(b) => b.append_value(0),
            ColumnWriter::UInt64(b) => b.append_value(0),
            ColumnWriter::Int8(b) => b.append_value(0),
            ColumnWriter::Int16(b) => b.append_value(0),
            ColumnWriter::Int32(b) => b.append_value(0),
            ColumnWriter::Int64(b) => b.append_value(0),
            ColumnWriter::Float32(b) => b.append_value(0.0),
            ColumnWriter::Float64(b) => b.append_value(0.0),
            ColumnWriter::String(b) => b.append_value(""),
            ColumnWriter::Date(b) => b.append_value(0),
            ColumnWriter::DateTime(b) => b.append_value(0),
        }
    }

    /// Finish building and return the column.
    pub(crate) fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnWriter::UInt8(b) => Arc::new(b.finish()),
            ColumnWriter::UInt16(b) => Arc::new(b.finish()),
            ColumnWriter::UInt32(b) => Arc::new(b.finish()),
            ColumnWriter::UInt64(b) => Arc::new(b.finish()),
            ColumnWriter::Int8(b) => Arc::new(b.finish()),
            ColumnWriter::Int16(b) => Arc::new(b.finish()),
            ColumnWriter::Int32(b) => Arc::new(b.finish()),
            ColumnWriter::Int64(b) => Arc::new(b.finish()),
            ColumnWriter::Float32(b) => Arc::new(b.finish()),
            ColumnWriter::Float64(b) => Arc::new(b.finish()),
            ColumnWriter::String(b) => Arc::new(b.finish()),
            ColumnWriter::Date(b) => Arc::new(b.finish()),
            ColumnWriter::DateTime(b) => Arc::new(b.finish()),
        }
    }
}

/// Whether `value`'s runtime tag would pass [`ColumnWriter::write`] for
/// `kind`. Used to validate configured defaults at bind time, so a bad
/// default fails construction instead of an arbitrary later batch.
pub(crate) fn kind_accepts(kind: ScalarKind, value: &Value) -> bool {
    match kind {
        ScalarKind::UInt8 => matches!(value, Value::Bool(_)),
        ScalarKind::UInt16
        | ScalarKind::UInt32
        | ScalarKind::UInt64
        | ScalarKind::Int8
        | ScalarKind::Int16
        | ScalarKind::Int32
        | ScalarKind::Int64
        | ScalarKind::Float32
        | ScalarKind::Float64 => value.is_number(),
        ScalarKind::String => matches!(value, Value::String(_)),
        ScalarKind::Date | ScalarKind::DateTime => matches!(value, Value::Timestamp(_)),
    }
}

fn mismatch(field: &str, kind: ScalarKind, value: &Value) -> ReadError {
    ReadError::TypeMismatch {
        field: field.to_string(),
        expected: kind.expected(),
        got: value.tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        Array, Date32Array, Float32Array, Float64Array, Int16Array, Int8Array, StringArray,
        TimestampSecondArray, UInt16Array, UInt64Array, UInt8Array,
    };

    fn write_one(kind: ScalarKind, value: &Value) -> Result<ArrayRef, ReadError> {
        let mut writer = ColumnWriter::for_kind(kind);
        writer.write("f", value)?;
        Ok(writer.finish())
    }

    mod boolean_flag {
        use super::*;

        #[test]
        fn test_bool_coerces_to_zero_one() {
            let col = write_one(ScalarKind::UInt8, &Value::Bool(true)).unwrap();
            let col = col.as_any().downcast_ref::<UInt8Array>().unwrap();
            assert_eq!(col.value(0), 1);

            let col = write_one(ScalarKind::UInt8, &Value::Bool(false)).unwrap();
            let col = col.as_any().downcast_ref::<UInt8Array>().unwrap();
            assert_eq!(col.value(0), 0);
        }

        #[test]
        fn test_number_is_not_a_flag() {
            let err = write_one(ScalarKind::UInt8, &Value::Int32(1)).unwrap_err();
            match err {
                ReadError::TypeMismatch {
                    field,
                    expected,
                    got,
                } => {
                    assert_eq!(field, "f");
                    assert_eq!(expected, "Bool");
                    assert_eq!(got, "Int32");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_string_is_not_a_flag() {
            let err = write_one(ScalarKind::UInt8, &Value::String("true".to_string()));
            assert!(matches!(err, Err(ReadError::TypeMismatch { .. })));
        }
    }

    mod numeric {
        use super::*;

        #[test]
        fn test_all_number_tags_accepted() {
            for value in [Value::Int32(40), Value::Int64(40), Value::Double(40.9)] {
                let col = write_one(ScalarKind::Int16, &value).unwrap();
                let col = col.as_any().downcast_ref::<Int16Array>().unwrap();
                assert_eq!(col.value(0), 40, "{value:?}");
            }
        }

        #[test]
        fn test_narrowing_wraps() {
            // 0x1_0002 narrows to 2 in a u16 column.
            let col = write_one(ScalarKind::UInt16, &Value::Int32(0x1_0002)).unwrap();
            let col = col.as_any().downcast_ref::<UInt16Array>().unwrap();
            assert_eq!(col.value(0), 2);

            let col = write_one(ScalarKind::Int8, &Value::Int32(300)).unwrap();
            let col = col.as_any().downcast_ref::<Int8Array>().unwrap();
            assert_eq!(col.value(0), 44);
        }

        #[test]
        fn test_sixty_four_bit_kinds_keep_width() {
            let col = write_one(ScalarKind::UInt64, &Value::Int64(1 << 40)).unwrap();
            let col = col.as_any().downcast_ref::<UInt64Array>().unwrap();
            assert_eq!(col.value(0), 1 << 40);
        }

        #[test]
        fn test_floats_round_trip_through_f64() {
            let col = write_one(ScalarKind::Float32, &Value::Double(1.5)).unwrap();
            let col = col.as_any().downcast_ref::<Float32Array>().unwrap();
            assert_eq!(col.value(0), 1.5);

            let col = write_one(ScalarKind::Float64, &Value::Int64(3)).unwrap();
            let col = col.as_any().downcast_ref::<Float64Array>().unwrap();
            assert_eq!(col.value(0), 3.0);
        }

        #[test]
        fn test_string_never_parsed_as_number() {
            let err = write_one(ScalarKind::Int32, &Value::String("42".to_string()));
            assert!(matches!(err, Err(ReadError::TypeMismatch { .. })));
        }

        #[test]
        fn test_null_is_a_mismatch() {
            let err = write_one(ScalarKind::Float64, &Value::Null).unwrap_err();
            match err {
                ReadError::TypeMismatch { expected, got, .. } => {
                    assert_eq!(expected, "a number");
                    assert_eq!(got, "Null");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    mod strings {
        use super::*;

        #[test]
        fn test_string_bytes_copied() {
            let col = write_one(ScalarKind::String, &Value::String("héllo".to_string())).unwrap();
            let col = col.as_any().downcast_ref::<StringArray>().unwrap();
            assert_eq!(col.value(0), "héllo");
        }

        #[test]
        fn test_number_is_not_a_string() {
            let err = write_one(ScalarKind::String, &Value::Double(1.0));
            assert!(matches!(err, Err(ReadError::TypeMismatch { .. })));
        }
    }

    mod dates {
        use super::*;

        #[test]
        fn test_date_floors_to_day_number() {
            // Day 100 plus an hour still lands on day 100.
            let millis = 100 * MILLIS_PER_DAY + 3_600_000;
            let col = write_one(ScalarKind::Date, &Value::Timestamp(millis)).unwrap();
            let col = col.as_any().downcast_ref::<Date32Array>().unwrap();
            assert_eq!(col.value(0), 100);
        }

        #[test]
        fn test_date_floors_before_epoch() {
            let col = write_one(ScalarKind::Date, &Value::Timestamp(-1)).unwrap();
            let col = col.as_any().downcast_ref::<Date32Array>().unwrap();
            assert_eq!(col.value(0), -1);
        }

        #[test]
        fn test_datetime_floors_to_seconds() {
            let col =
                write_one(ScalarKind::DateTime, &Value::Timestamp(1_234_567_890_123)).unwrap();
            let col = col.as_any().downcast_ref::<TimestampSecondArray>().unwrap();
            assert_eq!(col.value(0), 1_234_567_890);
        }

        #[test]
        fn test_non_timestamp_is_a_mismatch() {
            let err = write_one(ScalarKind::Date, &Value::Int64(100)).unwrap_err();
            match err {
                ReadError::TypeMismatch { expected, got, .. } => {
                    assert_eq!(expected, "Timestamp");
                    assert_eq!(got, "Int64");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    mod defaults {
        use super::*;

        #[test]
        fn test_zero_values_per_kind() {
            let kinds = [
                ScalarKind::UInt8,
                ScalarKind::UInt16,
                ScalarKind::UInt32,
                ScalarKind::UInt64,
                ScalarKind::Int8,
                ScalarKind::Int16,
                ScalarKind::Int32,
                ScalarKind::Int64,
                ScalarKind::Float32,
                ScalarKind::Float64,
                ScalarKind::String,
                ScalarKind::Date,
                ScalarKind::DateTime,
            ];
            for kind in kinds {
                let mut writer = ColumnWriter::for_kind(kind);
                writer.write_default();
                let col = writer.finish();
                assert_eq!(col.len(), 1, "{kind:?}");
                assert_eq!(col.null_count(), 0, "{kind:?}");
            }

            let mut writer = ColumnWriter::for_kind(ScalarKind::String);
            writer.write_default();
            let col = writer.finish();
            let col = col.as_any().downcast_ref::<StringArray>().unwrap();
            assert_eq!(col.value(0), "");

            let mut writer = ColumnWriter::for_kind(ScalarKind::DateTime);
            writer.write_default();
            let col = writer.finish();
            let col = col.as_any().downcast_ref::<TimestampSecondArray>().unwrap();
            assert_eq!(col.value(0), 0);
        }
    }

    mod acceptance {
        use super::*;

        #[test]
        fn test_kind_accepts_matches_write() {
            let values = [
                Value::Bool(true),
                Value::Int32(1),
                Value::Int64(1),
                Value::Double(1.0),
                Value::String("x".to_string()),
                Value::Timestamp(1),
                Value::Null,
            ];
            let kinds = [
                ScalarKind::UInt8,
                ScalarKind::UInt16,
                ScalarKind::Int64,
                ScalarKind::Float64,
                ScalarKind::String,
                ScalarKind::Date,
                ScalarKind::DateTime,
            ];
            for kind in kinds {
                for value in &values {
                    let accepted = kind_accepts(kind, value);
                    let wrote = write_one(kind, value).is_ok();
                    assert_eq!(accepted, wrote, "{kind:?} vs {value:?}");
                }
            }
        }
    }
}
