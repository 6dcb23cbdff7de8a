//! Per-table column type metadata.

use crate::types::ColumnType;
use std::collections::HashMap;

/// Column name → column type for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    columns: HashMap<String, ColumnType>,
}

impl TableSchema {
    /// Create an empty schema for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: HashMap::new(),
        }
    }

    /// Build a schema from a catalog lookup result.
    pub fn from_columns(
        table: impl Into<String>,
        columns: impl IntoIterator<Item = (String, ColumnType)>,
    ) -> Self {
        Self {
            table: table.into(),
            columns: columns.into_iter().collect(),
        }
    }

    /// Add a column (builder form).
    pub fn with_column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.insert(name.into(), ty);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).copied()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Holds the schema of the most recently targeted table.
///
/// The cache is keyed on the table name only: it is replaced whenever a
/// different table is targeted and kept as long as the same table is reused.
#[derive(Debug, Default)]
pub struct SchemaCache {
    current: Option<TableSchema>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached schema, if it belongs to `table`.
    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.current.as_ref().filter(|s| s.table == table)
    }

    /// Whether a lookup is needed before `table` can be used.
    pub fn needs_refresh(&self, table: &str) -> bool {
        self.get(table).is_none()
    }

    /// Replace the cached schema.
    pub fn replace(&mut self, schema: TableSchema) -> &TableSchema {
        self.current.insert(schema)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refreshes_only_on_table_change() {
        let mut cache = SchemaCache::new();
        assert!(cache.needs_refresh("users"));

        cache.replace(TableSchema::new("users").with_column("id", ColumnType::Int));
        assert!(!cache.needs_refresh("users"));
        assert!(cache.needs_refresh("orders"));
        assert_eq!(cache.get("users").unwrap().column_type("id"), Some(ColumnType::Int));

        cache.replace(TableSchema::new("orders"));
        assert!(cache.needs_refresh("users"));

        cache.clear();
        assert!(cache.needs_refresh("orders"));
    }
}
