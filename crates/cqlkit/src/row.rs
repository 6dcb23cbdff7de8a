//! Row extraction and mapping.

use crate::convert::to_native;
use crate::error::{CqlError, CqlResult};
use crate::session::ResultSet;
use crate::value::{FromValue, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// One returned row, keyed by column name in result order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Get a typed value by column name.
    pub fn try_get<T: FromValue>(&self, column: &str) -> CqlResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| CqlError::decode(column, "column not found in row"))?;
        T::from_value(column, value)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the row as a JSON object.
    pub fn to_json(&self) -> CqlResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Map a [`Row`] into a Rust type.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> CqlResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> CqlResult<Self> {
        Ok(row.clone())
    }
}

/// Turn a result set into rows.
///
/// With `auto_convert` every cell becomes a native value. Without it, primitive cells are
/// still native but other typed cells are kept as [`Value::Typed`].
pub fn extract_rows(result: ResultSet, auto_convert: bool) -> Vec<Row> {
    let columns: Arc<[String]> = result.columns.into();
    result
        .rows
        .into_iter()
        .map(|cells| {
            let values = cells
                .into_iter()
                .map(|cell| {
                    if auto_convert || cell.is_primitive() {
                        to_native(cell)
                    } else {
                        Value::Typed(cell)
                    }
                })
                .collect();
            Row::new(Arc::clone(&columns), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CqlValue;
    use uuid::Uuid;

    fn result() -> ResultSet {
        ResultSet::new(["id", "name", "big"])
            .with_row(vec![
                CqlValue::Uuid(Uuid::nil()),
                CqlValue::Text("Ann".into()),
                CqlValue::Bigint(5),
            ])
            .with_row(vec![CqlValue::Null, CqlValue::Null, CqlValue::Null])
    }

    #[test]
    fn converts_cells_when_enabled() {
        let rows = extract_rows(result(), true);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&Value::Text(Uuid::nil().to_string())));
        assert_eq!(rows[0].try_get::<String>("name").unwrap(), "Ann");
        assert_eq!(rows[0].try_get::<i64>("big").unwrap(), 5);
        assert_eq!(rows[1].try_get::<Option<i64>>("big").unwrap(), None);
    }

    #[test]
    fn keeps_typed_cells_when_disabled() {
        let rows = extract_rows(result(), false);
        assert_eq!(rows[0].get("id"), Some(&Value::Typed(CqlValue::Uuid(Uuid::nil()))));
        assert_eq!(rows[0].get("name"), Some(&Value::Text("Ann".into())));
        assert_eq!(rows[0].get("big"), Some(&Value::Typed(CqlValue::Bigint(5))));
    }

    #[test]
    fn missing_column_is_a_decode_error() {
        let rows = extract_rows(result(), true);
        let err = rows[0].try_get::<i64>("nope").unwrap_err();
        assert!(matches!(err, CqlError::Decode { .. }));
    }

    #[test]
    fn row_to_json() {
        let rows = extract_rows(result(), true);
        assert_eq!(
            rows[0].to_json().unwrap(),
            serde_json::json!({"id": Uuid::nil().to_string(), "name": "Ann", "big": 5})
        );
    }
}
