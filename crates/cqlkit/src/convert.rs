//! Bidirectional conversion between native [`Value`]s and typed [`CqlValue`]s.
//!
//! Native → typed conversion is driven by the column type from the table schema.
//! Typed → native conversion is driven by the variant of the returned cell.

use crate::error::{CqlError, CqlResult};
use crate::schema::TableSchema;
use crate::types::{ColumnType, CqlValue};
use crate::value::Value;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

/// What to do with values written to `uuid` / `timeuuid` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UuidWrites {
    /// Discard the supplied value and mint a fresh one (v4 for `uuid`, v1 for `timeuuid`).
    #[default]
    Generate,
    /// Parse and validate the supplied value.
    Honor,
}

/// Schema-driven value converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeConverter {
    uuid_writes: UuidWrites,
}

impl TypeConverter {
    pub fn new(uuid_writes: UuidWrites) -> Self {
        Self { uuid_writes }
    }

    pub fn uuid_writes(&self) -> UuidWrites {
        self.uuid_writes
    }

    /// Convert a value bound to `column` using the column's type in `schema`.
    ///
    /// Fails with [`CqlError::SchemaLookup`] if the schema has no such column.
    pub fn to_cql(&self, schema: &TableSchema, column: &str, value: Value) -> CqlResult<CqlValue> {
        let ty = schema
            .column_type(column)
            .ok_or_else(|| CqlError::schema_lookup(schema.table(), column))?;
        self.to_cql_typed(column, ty, value)
    }

    /// Convert a value into the representation of `ty`.
    pub fn to_cql_typed(&self, column: &str, ty: ColumnType, value: Value) -> CqlResult<CqlValue> {
        if let Value::Typed(typed) = value {
            return Ok(typed);
        }

        match ty {
            ColumnType::Int => match value {
                Value::Int(v) => i32::try_from(v).map(CqlValue::Int).map_err(|_| {
                    CqlError::conversion(column, format!("{v} is out of range for int"))
                }),
                other => Ok(infer_cql(other)),
            },
            ColumnType::Varchar | ColumnType::Double => Ok(infer_cql(value)),
            ColumnType::Uuid | ColumnType::Timeuuid => self.uuid(column, ty, value),
            _ if value.is_null() => Ok(CqlValue::Null),
            ColumnType::Timestamp => parse_timestamp(column, value).map(CqlValue::Timestamp),
            ColumnType::Bigint => match value {
                Value::Int(v) => Ok(CqlValue::Bigint(v)),
                Value::Text(s) => s.trim().parse().map(CqlValue::Bigint).map_err(|e| {
                    CqlError::conversion(column, format!("invalid bigint '{s}': {e}"))
                }),
                other => Err(unsupported(column, ty, &other)),
            },
            ColumnType::Varint => match value {
                Value::Int(v) => Ok(CqlValue::Varint(BigInt::from(v))),
                Value::Text(s) => BigInt::from_str(s.trim()).map(CqlValue::Varint).map_err(|e| {
                    CqlError::conversion(column, format!("invalid varint '{s}': {e}"))
                }),
                other => Err(unsupported(column, ty, &other)),
            },
            ColumnType::Decimal => match value {
                Value::Int(v) => Ok(CqlValue::Decimal(Decimal::from(v))),
                Value::Double(v) => Decimal::try_from(v)
                    .map(CqlValue::Decimal)
                    .map_err(|e| CqlError::conversion(column, format!("invalid decimal {v}: {e}"))),
                Value::Text(s) => Decimal::from_str(s.trim()).map(CqlValue::Decimal).map_err(|e| {
                    CqlError::conversion(column, format!("invalid decimal '{s}': {e}"))
                }),
                other => Err(unsupported(column, ty, &other)),
            },
            ColumnType::Float => match value {
                Value::Double(v) => narrow_float(column, v),
                Value::Int(v) => Ok(CqlValue::Float(v as f32)),
                Value::Text(s) => match s.trim().parse::<f64>() {
                    Ok(v) => narrow_float(column, v),
                    Err(e) => Err(CqlError::conversion(
                        column,
                        format!("invalid float '{s}': {e}"),
                    )),
                },
                other => Err(unsupported(column, ty, &other)),
            },
            ColumnType::Blob => match value {
                Value::Bytes(v) => Ok(CqlValue::Blob(Bytes::from(v))),
                Value::Text(s) => Ok(CqlValue::Blob(Bytes::from(s.into_bytes()))),
                other => Err(unsupported(column, ty, &other)),
            },
            ColumnType::Inet => match value {
                Value::Text(s) => IpAddr::from_str(s.trim()).map(CqlValue::Inet).map_err(|e| {
                    CqlError::conversion(column, format!("invalid inet '{s}': {e}"))
                }),
                other => Err(unsupported(column, ty, &other)),
            },
        }
    }

    fn uuid(&self, column: &str, ty: ColumnType, value: Value) -> CqlResult<CqlValue> {
        let wrap = |u: Uuid| match ty {
            ColumnType::Timeuuid => CqlValue::Timeuuid(u),
            _ => CqlValue::Uuid(u),
        };

        match self.uuid_writes {
            UuidWrites::Generate => Ok(wrap(fresh_uuid(ty))),
            UuidWrites::Honor => {
                let parsed = match value {
                    Value::Null => return Ok(CqlValue::Null),
                    Value::Text(s) => Uuid::parse_str(s.trim()).map_err(|e| {
                        CqlError::conversion(column, format!("invalid uuid '{s}': {e}"))
                    })?,
                    Value::Bytes(b) => Uuid::from_slice(&b).map_err(|e| {
                        CqlError::conversion(column, format!("invalid uuid bytes: {e}"))
                    })?,
                    other => return Err(unsupported(column, ty, &other)),
                };
                if ty == ColumnType::Timeuuid && parsed.get_version_num() != 1 {
                    return Err(CqlError::conversion(
                        column,
                        format!("{parsed} is not a time-based (v1) uuid"),
                    ));
                }
                Ok(wrap(parsed))
            }
        }
    }
}

fn unsupported(column: &str, ty: ColumnType, value: &Value) -> CqlError {
    CqlError::conversion(column, format!("cannot convert {} to {ty}", value.kind()))
}

/// Narrow to `f32`, rejecting finite values that overflow.
fn narrow_float(column: &str, v: f64) -> CqlResult<CqlValue> {
    let narrowed = v as f32;
    if v.is_finite() && narrowed.is_infinite() {
        return Err(CqlError::conversion(column, format!("{v} is out of range for float")));
    }
    Ok(CqlValue::Float(narrowed))
}

fn fresh_uuid(ty: ColumnType) -> Uuid {
    match ty {
        ColumnType::Timeuuid => {
            let seed = Uuid::new_v4();
            let mut node = [0u8; 6];
            node.copy_from_slice(&seed.as_bytes()[..6]);
            Uuid::now_v1(&node)
        }
        _ => Uuid::new_v4(),
    }
}

fn parse_timestamp(column: &str, value: Value) -> CqlResult<DateTime<Utc>> {
    match value {
        Value::Timestamp(t) => Ok(t),
        Value::Int(millis) => DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            CqlError::conversion(column, format!("timestamp {millis} out of range"))
        }),
        Value::Text(s) => {
            let s = s.trim();
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Ok(t.with_timezone(&Utc));
            }
            for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Ok(t.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| t.and_utc())
                .ok_or_else(|| CqlError::conversion(column, format!("invalid timestamp '{s}'")))
        }
        other => Err(unsupported(column, ColumnType::Timestamp, &other)),
    }
}

/// Map a native value to its natural typed representation, without a schema.
///
/// Used for primitive-typed columns and for WHERE operands on tables whose schema
/// has not been loaded.
pub fn infer_cql(value: Value) -> CqlValue {
    match value {
        Value::Null => CqlValue::Null,
        Value::Int(v) => i32::try_from(v).map_or(CqlValue::Bigint(v), CqlValue::Int),
        Value::Double(v) => CqlValue::Double(v),
        Value::Text(v) => CqlValue::Text(v),
        Value::Bytes(v) => CqlValue::Blob(Bytes::from(v)),
        Value::Timestamp(v) => CqlValue::Timestamp(v),
        Value::Typed(v) => v,
    }
}

/// Convert a returned cell into the closest native value.
pub fn to_native(value: CqlValue) -> Value {
    match value {
        CqlValue::Null => Value::Null,
        CqlValue::Int(v) => Value::Int(i64::from(v)),
        CqlValue::Text(v) => Value::Text(v),
        CqlValue::Double(v) => Value::Double(v),
        CqlValue::Timestamp(v) => Value::Timestamp(v),
        CqlValue::Bigint(v) => Value::Int(v),
        CqlValue::Decimal(v) => v
            .to_f64()
            .map_or_else(|| Value::Text(v.to_string()), Value::Double),
        CqlValue::Float(v) => Value::Double(f64::from(v)),
        CqlValue::Varint(v) => {
            i64::try_from(&v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
        }
        CqlValue::Blob(v) => Value::Bytes(v.to_vec()),
        CqlValue::Uuid(v) | CqlValue::Timeuuid(v) => Value::Text(v.to_string()),
        CqlValue::Inet(v) => Value::Text(v.to_string()),
    }
}
