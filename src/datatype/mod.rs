//! Semantic data types and their equality rules.
//!
//! Catalogs report vendor-specific native types; the core only ever reasons
//! about the closed [`DataType`] set. Each type knows how to interpret a
//! loosely typed [`Value`] (`type_cast`) and how two values compare once
//! interpreted (`compare`), which is what assertions rely on instead of raw
//! representation equality.
//!
//! # Structure
//!
//! - `sql_types`: native type codes as reported by catalogs
//! - `factory`: dialect-aware resolution of native types

pub mod factory;
pub mod sql_types;

pub use factory::{
    DataTypeFactory, DefaultDataTypeFactory, Dialect, LobBinding, MySqlDataTypeFactory,
    OracleDataTypeFactory, PostgresDataTypeFactory,
};

use crate::error::DataSetError;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// Semantic data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Integer,
    Numeric,
    Double,
    Char,
    Clob,
    Date,
    Time,
    Timestamp,
    Blob,
    /// Other/unsupported; values are compared as-is
    Unknown,
}

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl DataType {
    pub fn is_textual(self) -> bool {
        matches!(self, DataType::Char | DataType::Clob)
    }

    /// Whether substring replacement may rewrite values of this type.
    ///
    /// `Unknown` columns come from untyped fixtures where every value is text.
    pub fn accepts_text_substitution(self) -> bool {
        self.is_textual() || self == DataType::Unknown
    }

    /// Interpret `value` as this type.
    ///
    /// `Null` always stays `Null`.
    ///
    /// # Errors
    ///
    /// Returns `DataSetError::TypeCast` when the value has no meaning for
    /// this type (e.g. `"abc"` as a number).
    pub fn type_cast(self, value: &Value) -> Result<Value, DataSetError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self {
            DataType::Boolean => cast_boolean(value),
            DataType::Integer => cast_integer(value),
            DataType::Numeric => cast_numeric(value).map(Value::Decimal),
            DataType::Double => cast_double(value),
            DataType::Char | DataType::Clob => cast_text(self, value),
            DataType::Date => cast_date(value),
            DataType::Time => cast_time(value),
            DataType::Timestamp => cast_timestamp(value),
            DataType::Blob => match value {
                Value::Bytes(_) => Ok(value.clone()),
                Value::String(s) => Ok(Value::Bytes(s.as_bytes().to_vec())),
                _ => Err(DataSetError::type_cast(value, self, "not binary")),
            },
            DataType::Unknown => Ok(value.clone()),
        }
    }

    /// Compare two values under this type's rules. Nulls sort first.
    ///
    /// # Errors
    ///
    /// Propagates `type_cast` failures of either side.
    pub fn compare(self, left: &Value, right: &Value) -> Result<Ordering, DataSetError> {
        let left = self.type_cast(left)?;
        let right = self.type_cast(right)?;
        let ordering = match (&left, &right) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
            // Only reachable for Unknown; fall back to the printed form.
            (a, b) if a == b => Ordering::Equal,
            (a, b) => a.to_string().cmp(&b.to_string()),
        };
        Ok(ordering)
    }

    /// `true` when both values are equal under this type's rules.
    ///
    /// # Errors
    ///
    /// Propagates `type_cast` failures of either side.
    pub fn matches(self, left: &Value, right: &Value) -> Result<bool, DataSetError> {
        Ok(self.compare(left, right)? == Ordering::Equal)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Integer => "INTEGER",
            DataType::Numeric => "NUMERIC",
            DataType::Double => "DOUBLE",
            DataType::Char => "CHAR",
            DataType::Clob => "CLOB",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Blob => "BLOB",
            DataType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

fn parse_decimal(value: &Value, data_type: DataType, text: &str) -> Result<Decimal, DataSetError> {
    let text = text.trim();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| DataSetError::type_cast(value, data_type, e.to_string()))
}

fn cast_boolean(value: &Value) -> Result<Value, DataSetError> {
    let b = match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Decimal(d) => !d.is_zero(),
        Value::Double(d) => *d != 0.0,
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(DataSetError::type_cast(value, DataType::Boolean, "not a boolean")),
        },
        _ => return Err(DataSetError::type_cast(value, DataType::Boolean, "not a boolean")),
    };
    Ok(Value::Bool(b))
}

fn cast_integer(value: &Value) -> Result<Value, DataSetError> {
    let truncate = |d: Decimal| {
        d.trunc()
            .to_i64()
            .map(Value::Int)
            .ok_or_else(|| DataSetError::type_cast(value, DataType::Integer, "out of range"))
    };
    match value {
        Value::Int(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Decimal(d) => truncate(*d),
        Value::Double(d) if d.is_finite() => Ok(Value::Int(d.trunc() as i64)),
        Value::String(s) => truncate(parse_decimal(value, DataType::Integer, s)?),
        _ => Err(DataSetError::type_cast(value, DataType::Integer, "not an integer")),
    }
}

fn cast_numeric(value: &Value) -> Result<Decimal, DataSetError> {
    match value {
        Value::Int(i) => Ok(Decimal::from(*i)),
        Value::Decimal(d) => Ok(*d),
        Value::Double(d) => Decimal::try_from(*d)
            .map_err(|e| DataSetError::type_cast(value, DataType::Numeric, e.to_string())),
        Value::Bool(b) => Ok(Decimal::from(i64::from(*b))),
        Value::String(s) => parse_decimal(value, DataType::Numeric, s),
        _ => Err(DataSetError::type_cast(value, DataType::Numeric, "not a number")),
    }
}

fn cast_double(value: &Value) -> Result<Value, DataSetError> {
    let d = match value {
        Value::Double(d) => *d,
        Value::Int(i) => *i as f64,
        Value::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| DataSetError::type_cast(value, DataType::Double, "out of range"))?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| DataSetError::type_cast(value, DataType::Double, e.to_string()))?,
        _ => return Err(DataSetError::type_cast(value, DataType::Double, "not a number")),
    };
    Ok(Value::Double(d))
}

fn cast_text(data_type: DataType, value: &Value) -> Result<Value, DataSetError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Bytes(b) => String::from_utf8(b.clone())
            .map(Value::String)
            .map_err(|e| DataSetError::type_cast(value, data_type, e.to_string())),
        other => Ok(Value::String(other.to_string())),
    }
}

fn cast_date(value: &Value) -> Result<Value, DataSetError> {
    match value {
        Value::Date(_) => Ok(value.clone()),
        Value::Timestamp(ts) => Ok(Value::Date(ts.date())),
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| parse_timestamp(s).map(|ts| ts.date()))
                .map(Value::Date)
                .map_err(|e| DataSetError::type_cast(value, DataType::Date, e.to_string()))
        }
        _ => Err(DataSetError::type_cast(value, DataType::Date, "not a date")),
    }
}

fn cast_time(value: &Value) -> Result<Value, DataSetError> {
    match value {
        Value::Time(_) => Ok(value.clone()),
        Value::Timestamp(ts) => Ok(Value::Time(ts.time())),
        Value::String(s) => s
            .trim()
            .parse::<NaiveTime>()
            .map(Value::Time)
            .map_err(|e| DataSetError::type_cast(value, DataType::Time, e.to_string())),
        _ => Err(DataSetError::type_cast(value, DataType::Time, "not a time")),
    }
}

fn cast_timestamp(value: &Value) -> Result<Value, DataSetError> {
    match value {
        Value::Timestamp(_) => Ok(value.clone()),
        Value::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .map(Value::Timestamp)
            .ok_or_else(|| DataSetError::type_cast(value, DataType::Timestamp, "invalid date")),
        Value::Int(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .ok_or_else(|| DataSetError::type_cast(value, DataType::Timestamp, "out of range")),
        Value::String(s) => parse_timestamp(s.trim())
            .map(Value::Timestamp)
            .map_err(|e| DataSetError::type_cast(value, DataType::Timestamp, e.to_string())),
        _ => Err(DataSetError::type_cast(value, DataType::Timestamp, "not a timestamp")),
    }
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let mut last_error = None;
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(ts) => return Ok(ts),
            Err(e) => last_error = Some(e),
        }
    }
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN)),
        Err(e) => Err(last_error.unwrap_or(e)),
    }
}
