//! Conversion between [`SqlValue`] and rusqlite's value types, keyed by
//! each column's declared [`DataType`].
//!
//! Dates and datetimes are stored as text and serialized objects as
//! JSON-encoded blobs, matching the literal forms the codecs in
//! `slate-sql-core` render.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{Value, ValueRef};
use slate_sql_core::{DataType, DecodeError, EncodeError, SqlValue};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const DATETIME_READ_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Converts a value into a bindable SQLite value.
///
/// # Errors
///
/// [`EncodeError::TypeMismatch`] when the value variant does not match
/// the column type; [`EncodeError::Serialize`] for unserializable
/// payloads.
pub(crate) fn bind_value(value: &SqlValue, data_type: DataType) -> Result<Value, EncodeError> {
    match (data_type, value) {
        (_, SqlValue::Null) => Ok(Value::Null),
        (DataType::Text, SqlValue::Text(s)) => Ok(Value::Text(s.clone())),
        (DataType::Integer, SqlValue::Integer(i)) => Ok(Value::Integer(*i)),
        (DataType::Real, SqlValue::Real(f)) => Ok(Value::Real(*f)),
        (DataType::Blob, SqlValue::Blob(b)) => Ok(Value::Blob(b.clone())),
        (DataType::Date, SqlValue::Date(d)) => {
            Ok(Value::Text(d.format(DATE_FORMAT).to_string()))
        }
        (DataType::DateTime, SqlValue::DateTime(t)) => {
            Ok(Value::Text(t.format(DATETIME_FORMAT).to_string()))
        }
        (DataType::Serialized, SqlValue::Json(v)) => Ok(Value::Blob(serde_json::to_vec(v)?)),
        (_, other) => Err(EncodeError::TypeMismatch {
            data_type: data_type.declared_type(),
            value_kind: other.kind(),
        }),
    }
}

fn mismatch(data_type: DataType, raw: &ValueRef<'_>) -> DecodeError {
    DecodeError::Malformed {
        data_type: data_type.declared_type(),
        literal: format!("{raw:?}"),
    }
}

/// Converts a fetched SQLite value back under the expected column type.
///
/// # Errors
///
/// [`DecodeError::Malformed`] when the stored value does not match the
/// column type; [`DecodeError::Corrupt`] for undeserializable payloads.
pub(crate) fn read_value(raw: ValueRef<'_>, data_type: DataType) -> Result<SqlValue, DecodeError> {
    match (data_type, raw) {
        (_, ValueRef::Null) => Ok(SqlValue::Null),
        (DataType::Text, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .map(|s| SqlValue::Text(String::from(s)))
            .map_err(|_| mismatch(data_type, &raw)),
        (DataType::Integer, ValueRef::Integer(i)) => Ok(SqlValue::Integer(i)),
        (DataType::Real, ValueRef::Real(f)) => Ok(SqlValue::Real(f)),
        // Aggregates may report INTEGER for a REAL projection.
        #[allow(clippy::cast_precision_loss)]
        (DataType::Real, ValueRef::Integer(i)) => Ok(SqlValue::Real(i as f64)),
        (DataType::Blob, ValueRef::Blob(bytes)) => Ok(SqlValue::Blob(bytes.to_vec())),
        (DataType::Date, ValueRef::Text(bytes)) => {
            let text = std::str::from_utf8(bytes).map_err(|_| mismatch(data_type, &raw))?;
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(SqlValue::Date)
                .map_err(|_| mismatch(data_type, &raw))
        }
        (DataType::DateTime, ValueRef::Text(bytes)) => {
            let text = std::str::from_utf8(bytes).map_err(|_| mismatch(data_type, &raw))?;
            DATETIME_READ_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(SqlValue::DateTime)
                .ok_or_else(|| mismatch(data_type, &raw))
        }
        (DataType::Serialized, ValueRef::Blob(bytes)) => serde_json::from_slice(bytes)
            .map(SqlValue::Json)
            .map_err(DecodeError::Corrupt),
        (_, other) => Err(mismatch(data_type, &other)),
    }
}
