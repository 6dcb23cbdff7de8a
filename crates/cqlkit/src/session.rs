//! The database boundary.
//!
//! cqlkit does not speak the wire protocol. A driver adapter implements [`Connector`] and
//! [`Session`]; the client calls into them to connect, fetch table schemas, prepare and
//! execute statements.

use crate::error::CqlResult;
use crate::types::{ColumnType, CqlValue};

/// Raw result of an executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CqlValue>>,
}

impl ResultSet {
    /// A result with column names and no rows yet.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row (builder form).
    pub fn with_row(mut self, row: Vec<CqlValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Whether the statement returned no result columns at all (e.g. a write).
    pub fn is_void(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A live session able to prepare and execute statements.
///
/// Implementations should report prepare failures as [`crate::CqlError::Prepare`] and
/// execution failures as [`crate::CqlError::Execution`]; other error kinds are wrapped.
pub trait Session: Send + Sync {
    /// Prepared statement handle. Cloned out of the statement cache.
    type Statement: Clone + Send + Sync;

    /// Prepare a statement with positional `?` placeholders.
    fn prepare(
        &self,
        cql: &str,
    ) -> impl std::future::Future<Output = CqlResult<Self::Statement>> + Send;

    /// Execute a prepared statement with values in placeholder order.
    fn execute(
        &self,
        statement: &Self::Statement,
        values: &[CqlValue],
    ) -> impl std::future::Future<Output = CqlResult<ResultSet>> + Send;

    /// Column name → column type for a table, read from the catalog.
    fn table_schema(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = CqlResult<Vec<(String, ColumnType)>>> + Send;
}

/// Opens sessions. The client calls [`Connector::connect`] at most once.
pub trait Connector: Send + Sync {
    type Session: Session;

    fn connect(&self) -> impl std::future::Future<Output = CqlResult<Self::Session>> + Send;
}
