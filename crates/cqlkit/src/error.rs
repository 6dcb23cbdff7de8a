//! Error types for cqlkit

use thiserror::Error;

/// Result type alias for cqlkit operations
pub type CqlResult<T> = Result<T, CqlError>;

/// Error types for query building, conversion and execution
#[derive(Debug, Error)]
pub enum CqlError {
    /// The session could not be established. Fatal for the client that raised it.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The session refused to prepare the compiled statement
    #[error("Prepare error: {message} (cql: {cql})")]
    Prepare { cql: String, message: String },

    /// The session failed while executing a prepared statement
    #[error("Execution error: {message} (cql: {cql})")]
    Execution { cql: String, message: String },

    /// A value was supplied for a column the cached schema does not know
    #[error("Column '{column}' not found in schema of table '{table}'")]
    SchemaLookup { table: String, column: String },

    /// The catalog returned no columns for a table
    #[error("No schema available for table '{0}'")]
    SchemaUnavailable(String),

    /// A mutation payload used a tag this crate does not understand
    #[error("Unsupported mutation tag: {0}")]
    UnsupportedMutation(String),

    /// A WHERE condition was built with an operand that does not fit its operator
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// A native value could not be turned into the column's database type
    #[error("Conversion error on column '{column}': {message}")]
    Conversion { column: String, message: String },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CqlError {
    /// Create a prepare error for a statement
    pub fn prepare(cql: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Prepare {
            cql: cql.into(),
            message: message.into(),
        }
    }

    /// Create an execution error for a statement
    pub fn execution(cql: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            cql: cql.into(),
            message: message.into(),
        }
    }

    /// Create a schema lookup error
    pub fn schema_lookup(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::SchemaLookup {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a conversion error for a specific column
    pub fn conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Whether the client that produced this error can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connect(_))
    }

    /// Whether this error came from the session (prepare or execute).
    ///
    /// Builder state is kept when these happen.
    pub fn is_session_error(&self) -> bool {
        matches!(self, Self::Prepare { .. } | Self::Execution { .. })
    }

    /// Check if this is a schema lookup error
    pub fn is_schema_lookup(&self) -> bool {
        matches!(self, Self::SchemaLookup { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for CqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.to_string())
    }
}
