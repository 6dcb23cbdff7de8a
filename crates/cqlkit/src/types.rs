//! Database-native column types and typed cell values.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

/// A CQL primitive column type as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Varchar,
    Double,
    Bigint,
    Decimal,
    Float,
    Varint,
    Blob,
    Uuid,
    Timeuuid,
    Inet,
    Timestamp,
}

impl ColumnType {
    /// The CQL name of this type.
    pub fn cql_name(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Varchar => "varchar",
            ColumnType::Double => "double",
            ColumnType::Bigint => "bigint",
            ColumnType::Decimal => "decimal",
            ColumnType::Float => "float",
            ColumnType::Varint => "varint",
            ColumnType::Blob => "blob",
            ColumnType::Uuid => "uuid",
            ColumnType::Timeuuid => "timeuuid",
            ColumnType::Inet => "inet",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cql_name())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    /// Parse a catalog type name. `text` and `ascii` share the varchar representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "int" => ColumnType::Int,
            "varchar" | "text" | "ascii" => ColumnType::Varchar,
            "double" => ColumnType::Double,
            "bigint" | "counter" => ColumnType::Bigint,
            "decimal" => ColumnType::Decimal,
            "float" => ColumnType::Float,
            "varint" => ColumnType::Varint,
            "blob" => ColumnType::Blob,
            "uuid" => ColumnType::Uuid,
            "timeuuid" => ColumnType::Timeuuid,
            "inet" => ColumnType::Inet,
            "timestamp" => ColumnType::Timestamp,
            other => return Err(format!("unsupported column type '{other}'")),
        };
        Ok(ty)
    }
}

/// A typed cell value, as bound to a statement or returned in a result set.
///
/// `Int`, `Text` and `Double` are the primitive cells; everything else carries a
/// database-native representation that needs conversion before it is handed to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum CqlValue {
    Null,
    Int(i32),
    Text(String),
    Double(f64),
    Bigint(i64),
    Decimal(Decimal),
    Float(f32),
    Varint(BigInt),
    Blob(Bytes),
    Uuid(Uuid),
    Timeuuid(Uuid),
    Inet(IpAddr),
    Timestamp(DateTime<Utc>),
}

impl CqlValue {
    /// The column type this value belongs to, or `None` for `Null`.
    pub fn column_type(&self) -> Option<ColumnType> {
        let ty = match self {
            CqlValue::Null => return None,
            CqlValue::Int(_) => ColumnType::Int,
            CqlValue::Text(_) => ColumnType::Varchar,
            CqlValue::Double(_) => ColumnType::Double,
            CqlValue::Bigint(_) => ColumnType::Bigint,
            CqlValue::Decimal(_) => ColumnType::Decimal,
            CqlValue::Float(_) => ColumnType::Float,
            CqlValue::Varint(_) => ColumnType::Varint,
            CqlValue::Blob(_) => ColumnType::Blob,
            CqlValue::Uuid(_) => ColumnType::Uuid,
            CqlValue::Timeuuid(_) => ColumnType::Timeuuid,
            CqlValue::Inet(_) => ColumnType::Inet,
            CqlValue::Timestamp(_) => ColumnType::Timestamp,
        };
        Some(ty)
    }

    /// Primitive cells (and null) are handed to callers unchanged.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            CqlValue::Null | CqlValue::Int(_) | CqlValue::Text(_) | CqlValue::Double(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_type_names() {
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Int);
        assert_eq!("TEXT".parse::<ColumnType>().unwrap(), ColumnType::Varchar);
        assert_eq!(" timeuuid ".parse::<ColumnType>().unwrap(), ColumnType::Timeuuid);
        assert!("map<int, text>".parse::<ColumnType>().is_err());
    }

    #[test]
    fn primitive_cells() {
        assert!(CqlValue::Int(1).is_primitive());
        assert!(CqlValue::Null.is_primitive());
        assert!(!CqlValue::Bigint(1).is_primitive());
        assert!(!CqlValue::Uuid(Uuid::nil()).is_primitive());
    }

    #[test]
    fn column_type_of_value() {
        assert_eq!(CqlValue::Timeuuid(Uuid::nil()).column_type(), Some(ColumnType::Timeuuid));
        assert_eq!(CqlValue::Null.column_type(), None);
        assert_eq!(ColumnType::Varint.to_string(), "varint");
    }
}
