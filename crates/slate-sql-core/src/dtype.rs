//! Logical data types and their value codecs.
//!
//! Each [`DataType`] knows how to render a [`SqlValue`] as a SQL literal
//! and how to parse one back. The round trip is lossless for every value a
//! type accepts, with one documented exception: `DateTime` truncates below
//! microsecond precision.
//!
//! SQLite only stores four physical classes (TEXT, INTEGER, REAL, BLOB);
//! the richer logical types here map onto those. `Date` and `DateTime`
//! columns are declared as `DATE`/`TIMESTAMP` so reflection can recover the
//! logical type, but physically they are TEXT. `Serialized` holds an
//! arbitrary JSON-serializable object as a BLOB.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as Json;

use crate::error::{DecodeError, EncodeError};

/// The closed set of logical column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// UTF-8 string.
    Text,
    /// 64-bit signed integer. SQLite has no boolean; use 0 and 1.
    Integer,
    /// 64-bit float.
    Real,
    /// Raw bytes.
    Blob,
    /// Calendar date, stored as `'YYYY-MM-DD'` text.
    Date,
    /// Date and time, stored as `'YYYY-MM-DD HH:MM:SS.ffffff'` text.
    DateTime,
    /// Arbitrary serializable object, stored as a JSON-encoded blob.
    Serialized,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Real => "Real",
            Self::Blob => "Blob",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Serialized => "Serialized",
        })
    }
}

impl DataType {
    /// The column type name written into `CREATE TABLE` and read back from
    /// `PRAGMA table_info` by reflection.
    #[must_use]
    pub const fn declared_type(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Blob | Self::Serialized => "BLOB",
            Self::Date => "DATE",
            Self::DateTime => "TIMESTAMP",
        }
    }

    /// The physical SQLite storage class this type maps onto.
    #[must_use]
    pub const fn storage_class(self) -> &'static str {
        match self {
            Self::Text | Self::Date | Self::DateTime => "TEXT",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Blob | Self::Serialized => "BLOB",
        }
    }

    /// Maps a declared type name from the catalog back to a data type.
    ///
    /// `Serialized` cannot be recovered here: it is declared as `BLOB` and
    /// only a caller-supplied promotion list can tell the two apart.
    #[must_use]
    pub fn from_declared_type(name: &str) -> Option<Self> {
        match name {
            "TEXT" => Some(Self::Text),
            "INTEGER" => Some(Self::Integer),
            "REAL" => Some(Self::Real),
            "BLOB" => Some(Self::Blob),
            "DATE" => Some(Self::Date),
            "TIMESTAMP" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Renders a value as a SQL literal of this type.
    ///
    /// `SqlValue::Null` encodes as `NULL` for every type.
    ///
    /// # Errors
    ///
    /// [`EncodeError::TypeMismatch`] when the value variant does not match
    /// this type; [`EncodeError::Serialize`] when a `Serialized` payload
    /// fails to serialize.
    pub fn encode(self, value: &SqlValue) -> Result<String, EncodeError> {
        match (self, value) {
            (_, SqlValue::Null) => Ok(String::from("NULL")),
            (Self::Text, SqlValue::Text(s)) => Ok(quote_text(s)),
            (Self::Integer, SqlValue::Integer(i)) => Ok(i.to_string()),
            // Debug formatting keeps a trailing ".0" on whole floats, so
            // the literal stays unambiguously REAL.
            (Self::Real, SqlValue::Real(f)) if f.is_finite() => Ok(format!("{f:?}")),
            (Self::Real, SqlValue::Real(f)) => Err(EncodeError::NonFiniteReal(*f)),
            (Self::Blob, SqlValue::Blob(b)) => Ok(blob_literal(b)),
            (Self::Date, SqlValue::Date(d)) => Ok(format!("'{}'", d.format("%Y-%m-%d"))),
            (Self::DateTime, SqlValue::DateTime(t)) => {
                Ok(format!("'{}'", t.format("%Y-%m-%d %H:%M:%S%.6f")))
            }
            (Self::Serialized, SqlValue::Json(v)) => {
                let bytes = serde_json::to_vec(v)?;
                Ok(blob_literal(&bytes))
            }
            (_, other) => Err(EncodeError::TypeMismatch {
                data_type: self.declared_type(),
                value_kind: other.kind(),
            }),
        }
    }

    /// Parses a SQL literal back into a value of this type.
    ///
    /// `None` and the literal `NULL` both decode to [`SqlValue::Null`]; an
    /// empty quoted string stays a distinct, empty `Text` value.
    ///
    /// # Errors
    ///
    /// Any malformed literal is a [`DecodeError`]; decoding never
    /// substitutes a default value.
    pub fn decode(self, literal: Option<&str>) -> Result<SqlValue, DecodeError> {
        let Some(text) = literal else {
            return Ok(SqlValue::Null);
        };
        if text == "NULL" {
            return Ok(SqlValue::Null);
        }
        match self {
            Self::Text => Ok(SqlValue::Text(unquote_text(text).ok_or_else(|| {
                self.malformed(text)
            })?)),
            Self::Integer => text
                .parse::<i64>()
                .map(SqlValue::Integer)
                .map_err(|_| self.malformed(text)),
            Self::Real => text
                .parse::<f64>()
                .map(SqlValue::Real)
                .map_err(|_| self.malformed(text)),
            Self::Blob => Ok(SqlValue::Blob(parse_blob_literal(text)?)),
            Self::Date => {
                let inner = unquote_text(text).ok_or_else(|| self.malformed(text))?;
                NaiveDate::parse_from_str(&inner, "%Y-%m-%d")
                    .map(SqlValue::Date)
                    .map_err(|_| self.malformed(text))
            }
            Self::DateTime => {
                let inner = unquote_text(text).ok_or_else(|| self.malformed(text))?;
                // Fractional seconds are optional on input; both accepted
                // forms are tried in order.
                NaiveDateTime::parse_from_str(&inner, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(&inner, "%Y-%m-%d %H:%M:%S"))
                    .map(SqlValue::DateTime)
                    .map_err(|_| self.malformed(text))
            }
            Self::Serialized => {
                let bytes = parse_blob_literal(text)?;
                serde_json::from_slice(&bytes)
                    .map(SqlValue::Json)
                    .map_err(DecodeError::Corrupt)
            }
        }
    }

    fn malformed(self, literal: &str) -> DecodeError {
        DecodeError::Malformed {
            data_type: self.declared_type(),
            literal: literal.to_string(),
        }
    }
}

/// A value passing through the codec layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Float value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time, microsecond precision.
    DateTime(NaiveDateTime),
    /// Arbitrary object payload for `Serialized` columns.
    Json(Json),
}

impl SqlValue {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Json(_) => "json",
        }
    }

    /// Whether this is the NULL value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(String::from(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Json> for SqlValue {
    fn from(v: Json) -> Self {
        Self::Json(v)
    }
}

pub(crate) fn quote_text(s: &str) -> String {
    // Single quotes are escaped by doubling.
    format!("'{}'", s.replace('\'', "''"))
}

fn unquote_text(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

fn blob_literal(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2 + 3);
    hex.push_str("X'");
    for byte in bytes {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex.push('\'');
    hex
}

fn parse_blob_literal(literal: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = literal
        .strip_prefix("X'")
        .or_else(|| literal.strip_prefix("x'"))
        .and_then(|r| r.strip_suffix('\''))
        .ok_or(DecodeError::BadBlobLiteral)?;
    if rest.len() % 2 != 0 {
        return Err(DecodeError::BadHex);
    }
    let digits = rest.as_bytes();
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let hi = hex_digit(pair[0]).ok_or(DecodeError::BadHex)?;
        let lo = hex_digit(pair[1]).ok_or(DecodeError::BadHex)?;
        bytes.push(hi << 4 | lo);
    }
    Ok(bytes)
}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(dt: DataType, value: SqlValue) {
        let literal = dt.encode(&value).unwrap();
        assert_eq!(dt.decode(Some(&literal)).unwrap(), value);
    }

    #[test]
    fn test_declared_and_storage_names() {
        assert_eq!(DataType::Text.declared_type(), "TEXT");
        assert_eq!(DataType::Integer.declared_type(), "INTEGER");
        assert_eq!(DataType::Real.declared_type(), "REAL");
        assert_eq!(DataType::Blob.declared_type(), "BLOB");
        assert_eq!(DataType::Date.declared_type(), "DATE");
        assert_eq!(DataType::DateTime.declared_type(), "TIMESTAMP");
        assert_eq!(DataType::Serialized.declared_type(), "BLOB");

        assert_eq!(DataType::Date.storage_class(), "TEXT");
        assert_eq!(DataType::DateTime.storage_class(), "TEXT");
        assert_eq!(DataType::Serialized.storage_class(), "BLOB");
    }

    #[test]
    fn test_text_encoding_and_escaping() {
        assert_eq!(
            DataType::Text.encode(&SqlValue::from("hello")).unwrap(),
            "'hello'"
        );
        assert_eq!(
            DataType::Text.encode(&SqlValue::from("it's")).unwrap(),
            "'it''s'"
        );
        // Injection attempts stay inside the quoted literal.
        assert_eq!(
            DataType::Text
                .encode(&SqlValue::from("'; DROP TABLE users; --"))
                .unwrap(),
            "'''; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_blob_literal_form() {
        assert_eq!(
            DataType::Blob.encode(&SqlValue::from(&b"ab"[..])).unwrap(),
            "X'6162'"
        );
        assert_eq!(
            DataType::Blob.decode(Some("X'6162'")).unwrap(),
            SqlValue::Blob(b"ab".to_vec())
        );
        // Upper-case hex and lower-case marker are accepted on decode.
        assert_eq!(
            DataType::Blob.decode(Some("x'6162'")).unwrap(),
            SqlValue::Blob(b"ab".to_vec())
        );
        assert_eq!(
            DataType::Blob.decode(Some("X'6A6B'")).unwrap(),
            SqlValue::Blob(b"jk".to_vec())
        );
    }

    #[test]
    fn test_real_keeps_decimal_point() {
        assert_eq!(DataType::Real.encode(&SqlValue::Real(1.0)).unwrap(), "1.0");
        assert_eq!(
            DataType::Real.encode(&SqlValue::Real(3.14)).unwrap(),
            "3.14"
        );
    }

    #[test]
    fn test_non_finite_real_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                DataType::Real.encode(&SqlValue::Real(bad)),
                Err(EncodeError::NonFiniteReal(_))
            ));
        }
    }

    #[test]
    fn test_round_trip_all_types() {
        roundtrip(DataType::Text, SqlValue::from("hello 'world'"));
        roundtrip(DataType::Text, SqlValue::from(""));
        roundtrip(DataType::Integer, SqlValue::Integer(-42));
        roundtrip(DataType::Real, SqlValue::Real(2.5));
        roundtrip(DataType::Blob, SqlValue::Blob(vec![0x00, 0xff, 0x80]));
        roundtrip(
            DataType::Date,
            SqlValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
        );
        roundtrip(
            DataType::DateTime,
            SqlValue::DateTime(
                NaiveDate::from_ymd_opt(2015, 12, 31)
                    .unwrap()
                    .and_hms_micro_opt(8, 30, 17, 123)
                    .unwrap(),
            ),
        );
        roundtrip(
            DataType::Serialized,
            SqlValue::Json(json!({"role": [], "department": null})),
        );
    }

    #[test]
    fn test_null_round_trip() {
        for dt in [
            DataType::Text,
            DataType::Integer,
            DataType::Real,
            DataType::Blob,
            DataType::Date,
            DataType::DateTime,
            DataType::Serialized,
        ] {
            assert_eq!(dt.encode(&SqlValue::Null).unwrap(), "NULL");
            assert_eq!(dt.decode(None).unwrap(), SqlValue::Null);
            assert_eq!(dt.decode(Some("NULL")).unwrap(), SqlValue::Null);
        }
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let literal = DataType::Text.encode(&SqlValue::from("")).unwrap();
        assert_eq!(literal, "''");
        assert_eq!(
            DataType::Text.decode(Some(&literal)).unwrap(),
            SqlValue::Text(String::new())
        );
    }

    #[test]
    fn test_datetime_accepts_both_forms() {
        let whole = DataType::DateTime
            .decode(Some("'2015-12-31 08:30:17'"))
            .unwrap();
        let frac = DataType::DateTime
            .decode(Some("'2015-12-31 08:30:17.000123'"))
            .unwrap();
        let SqlValue::DateTime(whole) = whole else {
            panic!("expected datetime")
        };
        let SqlValue::DateTime(frac) = frac else {
            panic!("expected datetime")
        };
        assert_eq!(whole.and_utc().timestamp_subsec_micros(), 0);
        assert_eq!(frac.and_utc().timestamp_subsec_micros(), 123);
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            DataType::Integer.encode(&SqlValue::from("nope")),
            Err(EncodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_literals_rejected() {
        assert!(DataType::Integer.decode(Some("abc")).is_err());
        assert!(DataType::Blob.decode(Some("6162")).is_err());
        assert!(DataType::Blob.decode(Some("X'61zz'")).is_err());
        assert!(DataType::Date.decode(Some("'2000-13-01'")).is_err());
        assert!(DataType::Text.decode(Some("unquoted")).is_err());
    }

    #[test]
    fn test_serialized_corruption_is_an_error() {
        // Valid blob literal, but the payload is not valid JSON.
        let err = DataType::Serialized.decode(Some("X'ff00'"));
        assert!(matches!(err, Err(DecodeError::Corrupt(_))));
    }
}
