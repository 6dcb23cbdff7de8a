//! # cqlkit
//!
//! A fluent CQL query builder and value-conversion layer for wide-column databases.
//!
//! ## Features
//!
//! - **Fluent WHERE chains**: equality, comparison, `IN`, `BETWEEN` and raw fragments
//! - **Positional binds**: every value goes through a `?` placeholder, in emission order
//! - **Schema-driven conversion**: payload values are converted to the column's CQL type
//! - **Special mutations**: increments, raw expressions and coalescing markers in `UPDATE`/`INSERT`
//! - **Driver agnostic**: plug a driver in through the [`Connector`] and [`Session`] traits
//! - **Observability**: `tracing` events under the `cqlkit.cql` target and [`QueryStats`]
//!
//! ## Usage
//!
//! ```ignore
//! use cqlkit::{CqlClient, Limit, Payload};
//!
//! let mut db = CqlClient::new(connector);
//!
//! // SELECT name FROM users WHERE  age BETWEEN ? AND ? LIMIT 10
//! let rows = db
//!     .where_between("age", 18, 65)
//!     .get("users", Some(Limit::Count(10)), &["name"])
//!     .await?;
//!
//! // UPDATE users SET visits = visits + 1 WHERE  id = ?
//! db.where_eq("id", 3)
//!     .update("users", Payload::new().increment("visits", 1))
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod qb;
pub mod row;
pub mod schema;
pub mod session;
pub mod types;
pub mod value;

pub use client::{CqlClient, QueryStats, RawOutcome};
pub use config::{ClientConfig, StatementCacheConfig};
pub use convert::{TypeConverter, UuidWrites};
pub use error::{CqlError, CqlResult};
pub use row::{FromRow, Row, extract_rows};
pub use schema::{SchemaCache, TableSchema};
pub use session::{Connector, ResultSet, Session};
pub use types::{ColumnType, CqlValue};
pub use value::{FromValue, Value};

pub use qb::{
    Assignment, BindParam, BindParams, BoolOp, CompiledQuery, Condition, Limit, Operand,
    Operation, Payload, Predicate, QueryParts, compile,
};
