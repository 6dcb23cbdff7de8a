//! Native application-level values.
//!
//! [`Value`] is what callers hand to the builder (WHERE operands, mutation payloads) and what
//! they get back from row extraction when auto-conversion is enabled.

use crate::error::{CqlError, CqlResult};
use crate::types::CqlValue;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};

/// A native value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    /// A typed cell left unconverted (auto-conversion disabled).
    Typed(CqlValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::Typed(_) => "typed",
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<CqlValue> for Value {
    fn from(v: CqlValue) -> Self {
        Value::Typed(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::Timestamp(v) => serializer.serialize_str(&v.to_rfc3339()),
            Value::Typed(v) => serializer.serialize_str(&format!("{v:?}")),
        }
    }
}

/// Conversion from a row [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self>;
}

fn mismatch(column: &str, expected: &str, value: &Value) -> CqlError {
    CqlError::decode(column, format!("expected {expected}, got {}", value.kind()))
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        value.as_i64().ok_or_else(|| mismatch(column, "int", value))
    }
}

impl FromValue for i32 {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        let v = i64::from_value(column, value)?;
        i32::try_from(v).map_err(|_| CqlError::decode(column, format!("{v} out of range for i32")))
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        value.as_f64().ok_or_else(|| mismatch(column, "double", value))
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(column, "text", value))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        match value {
            Value::Bytes(v) => Ok(v.clone()),
            other => Err(mismatch(column, "bytes", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            other => Err(mismatch(column, "timestamp", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> CqlResult<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> CqlResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(column, value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(3i32), Value::Int(3));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(1.5f64)), Value::Double(1.5));
    }

    #[test]
    fn from_value_reports_column() {
        let err = i64::from_value("age", &Value::Text("x".into())).unwrap_err();
        assert_eq!(err.to_string(), "Decode error on column 'age': expected int, got text");
        assert_eq!(Option::<i64>::from_value("age", &Value::Null).unwrap(), None);
        assert!(i32::from_value("n", &Value::Int(i64::MAX)).is_err());
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(Value::Text("x".into())).unwrap();
        assert_eq!(json, serde_json::json!("x"));
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    }
}
