//! Named, ordered bind parameters.

use crate::convert::{TypeConverter, UuidWrites, infer_cql};
use crate::error::{CqlError, CqlResult};
use crate::schema::TableSchema;
use crate::types::CqlValue;
use crate::value::Value;

/// One bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParam {
    /// Unique parameter name (`column`, then `column_2`, `column_3`, ...).
    pub key: String,
    /// Column the value is compared against or written to.
    pub column: String,
    pub value: Value,
    /// Payload values must match a schema column; WHERE operands may fall back to inference.
    pub(crate) schema_required: bool,
}

/// Bind parameters in placeholder order.
///
/// Parameters are only ever appended while the statement text is emitted, so the
/// n-th parameter always belongs to the n-th `?`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindParams {
    params: Vec<BindParam>,
}

impl BindParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a WHERE operand and return its key.
    pub fn push(&mut self, column: &str, value: Value) -> &str {
        self.push_inner(column, value, false)
    }

    /// Bind a mutation payload value and return its key.
    pub fn push_payload(&mut self, column: &str, value: Value) -> &str {
        self.push_inner(column, value, true)
    }

    fn push_inner(&mut self, column: &str, value: Value, schema_required: bool) -> &str {
        let mut key = column.to_string();
        let mut suffix = 1;
        while self.params.iter().any(|p| p.key == key) {
            suffix += 1;
            key = format!("{column}_{suffix}");
        }
        self.params.push(BindParam {
            key,
            column: column.to_string(),
            value,
            schema_required,
        });
        &self.params[self.params.len() - 1].key
    }

    /// Look up a value by parameter key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindParam> {
        self.params.iter()
    }

    /// Values in placeholder order.
    pub fn values(&self) -> Vec<&Value> {
        self.params.iter().map(|p| &p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Convert every parameter into its typed form.
    ///
    /// Payload values go through `schema` with the converter's uuid policy. WHERE operands
    /// use the schema when it knows the column (always parsing uuids, never minting them)
    /// and are inferred from the native value otherwise.
    pub fn into_cql(
        self,
        schema: Option<&TableSchema>,
        converter: &TypeConverter,
    ) -> CqlResult<Vec<CqlValue>> {
        let lookup = TypeConverter::new(UuidWrites::Honor);
        self.params
            .into_iter()
            .map(|p| match schema {
                Some(schema) if p.schema_required => converter.to_cql(schema, &p.column, p.value),
                Some(schema) if schema.has_column(&p.column) => {
                    lookup.to_cql(schema, &p.column, p.value)
                }
                None if p.schema_required => Err(CqlError::schema_lookup("<unknown>", &p.column)),
                _ => Ok(infer_cql(p.value)),
            })
            .collect()
    }
}
