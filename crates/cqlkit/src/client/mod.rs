//! The execution façade.
//!
//! `CqlClient` owns one builder chain at a time: WHERE calls accumulate predicates,
//! and a terminal call (`get`, `insert`, `update`, `delete`) compiles, binds and executes
//! them, then clears the chain.
//!
//! # Example
//!
//! ```ignore
//! use cqlkit::{ClientConfig, CqlClient, Limit, Payload};
//!
//! let mut db = CqlClient::with_config(connector, ClientConfig::new().honor_uuids());
//!
//! db.insert("users", Payload::new().set("id", 3).set("name", "Ann")).await?;
//!
//! let rows = db
//!     .where_eq("id", 3)
//!     .get("users", Some(Limit::Count(10)), &["id", "name"])
//!     .await?;
//!
//! db.where_eq("id", 3)
//!     .update("users", Payload::new().increment("visits", 1))
//!     .await?;
//! ```
//!
//! Chains are not shared: every builder method takes `&mut self`, so a client can only
//! serve one chain at a time. Use one client per task.

mod statement_cache;
mod stats;

pub use stats::QueryStats;

use crate::config::ClientConfig;
use crate::convert::TypeConverter;
use crate::error::{CqlError, CqlResult};
use crate::qb::{
    BuilderState, CompiledQuery, Condition, Limit, Operand, Operation, Payload, Predicate,
    QueryParts, compile,
};
use crate::row::{FromRow, Row, extract_rows};
use crate::schema::{SchemaCache, TableSchema};
use crate::session::{Connector, ResultSet, Session};
use crate::types::CqlValue;
use crate::value::Value;
use statement_cache::StatementCache;

type StatementOf<C> = <<C as Connector>::Session as Session>::Statement;

/// Outcome of a hand-written statement.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// The statement returned a result set.
    Rows(Vec<Row>),
    /// The statement succeeded without returning columns.
    Applied,
}

/// Fluent CQL client over a lazily connected session.
pub struct CqlClient<C: Connector> {
    connector: C,
    session: Option<C::Session>,
    connect_error: Option<String>,
    config: ClientConfig,
    converter: TypeConverter,
    schema: SchemaCache,
    state: BuilderState,
    statements: Option<StatementCache<StatementOf<C>>>,
    stats: QueryStats,
}

impl<C: Connector> CqlClient<C> {
    /// Create a client with default configuration. Nothing connects until the first operation.
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(connector: C, config: ClientConfig) -> Self {
        let statements = config
            .statement_cache
            .enabled
            .then(|| StatementCache::new(config.statement_cache.capacity));

        Self {
            connector,
            session: None,
            connect_error: None,
            converter: TypeConverter::new(config.uuid_writes),
            config,
            schema: SchemaCache::new(),
            state: BuilderState::new(),
            statements,
            stats: QueryStats::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of query statistics.
    pub fn stats(&self) -> QueryStats {
        self.stats.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Number of prepared statements currently cached.
    pub fn cached_statements(&self) -> usize {
        self.statements.as_ref().map_or(0, StatementCache::len)
    }

    /// The cached schema, if it belongs to `table`.
    pub fn cached_schema(&self, table: &str) -> Option<&TableSchema> {
        self.schema.get(table)
    }

    // ==================== WHERE chaining ====================

    /// Add `field = ?`. A null value adds `field` as a raw clause.
    pub fn where_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.where_cond(field, Condition::eq(value))
    }

    /// Add a condition from an operator string (`>`, `IN`, `not between`, `CONTAINS`, ...).
    ///
    /// An operand that does not fit the operator fails the next terminal call with
    /// [`CqlError::InvalidCondition`].
    pub fn where_op(&mut self, field: &str, op: &str, operand: impl Into<Operand>) -> &mut Self {
        self.state.push_operator(field, op, operand.into());
        self
    }

    /// Add `field IN (?, ...)`.
    pub fn where_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_cond(field, Condition::In { negated: false, values })
    }

    /// Add `field NOT IN (?, ...)`.
    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.where_cond(field, Condition::In { negated: true, values })
    }

    /// Add `field BETWEEN ? AND ?`.
    pub fn where_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.where_cond(
            field,
            Condition::Between {
                negated: false,
                from: from.into(),
                to: to.into(),
            },
        )
    }

    /// Add `field NOT BETWEEN ? AND ?`.
    pub fn where_not_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.where_cond(
            field,
            Condition::Between {
                negated: true,
                from: from.into(),
                to: to.into(),
            },
        )
    }

    /// Add a hand-written fragment without binds.
    ///
    /// The fragment is emitted verbatim. Never build it from untrusted input.
    pub fn where_raw(&mut self, fragment: &str) -> &mut Self {
        self.where_cond(fragment, Condition::Raw)
    }

    /// Add a prepared condition joined with `AND`.
    pub fn where_cond(&mut self, field: &str, condition: Condition) -> &mut Self {
        self.state.push(Predicate::and(field, condition));
        self
    }

    /// Predicates waiting for the next terminal call.
    pub fn pending_predicates(&self) -> &[Predicate] {
        self.state.predicates()
    }

    /// Discard the current chain.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    // ==================== Compilation (no execution) ====================

    /// Compile the SELECT the next `get` would run.
    pub fn compile_select(
        &self,
        table: &str,
        limit: Option<Limit>,
        columns: &[&str],
    ) -> CqlResult<CompiledQuery> {
        self.check_state()?;
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        Ok(compile(
            QueryParts::new(Operation::Select, table)
                .columns(&columns)
                .predicates(self.state.predicates())
                .limit(limit),
        ))
    }

    /// Compile the INSERT the next `insert` would run.
    pub fn compile_insert(&self, table: &str, payload: &Payload) -> CqlResult<CompiledQuery> {
        self.check_state()?;
        if payload.is_empty() {
            return Err(CqlError::Other(format!("INSERT INTO {table} without values")));
        }
        Ok(compile(QueryParts::new(Operation::Insert, table).payload(payload)))
    }

    /// Compile the UPDATE the next `update` would run.
    pub fn compile_update(&self, table: &str, payload: &Payload) -> CqlResult<CompiledQuery> {
        self.check_state()?;
        if payload.is_empty() {
            return Err(CqlError::Other(format!("UPDATE {table} without assignments")));
        }
        Ok(compile(
            QueryParts::new(Operation::Update, table)
                .payload(payload)
                .predicates(self.state.predicates()),
        ))
    }

    /// Compile the DELETE the next `delete` would run.
    pub fn compile_delete(&self, table: &str, limit: Option<Limit>) -> CqlResult<CompiledQuery> {
        self.check_state()?;
        Ok(compile(
            QueryParts::new(Operation::Delete, table)
                .predicates(self.state.predicates())
                .limit(limit),
        ))
    }

    fn check_state(&self) -> CqlResult<()> {
        match self.state.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ==================== Terminal operations ====================

    /// Run a hand-written statement verbatim. The builder chain is left untouched.
    pub async fn raw_query(&mut self, cql: &str) -> CqlResult<RawOutcome> {
        self.connect().await?;
        let result = self.run(None, cql, &[]).await?;
        if result.is_void() {
            Ok(RawOutcome::Applied)
        } else {
            Ok(RawOutcome::Rows(extract_rows(result, self.config.auto_convert)))
        }
    }

    /// SELECT rows from `table` matching the pending predicates.
    ///
    /// An empty `columns` slice selects `*`. When the chain binds values, the table schema is
    /// loaded first so operands are converted to their column types.
    pub async fn get(
        &mut self,
        table: &str,
        limit: Option<Limit>,
        columns: &[&str],
    ) -> CqlResult<Vec<Row>> {
        let result = self.get_inner(table, limit, columns).await;
        self.settle(result)
    }

    /// SELECT at most one row.
    pub async fn get_one(&mut self, table: &str, columns: &[&str]) -> CqlResult<Option<Row>> {
        let rows = self.get(table, Some(Limit::Count(1)), columns).await?;
        Ok(rows.into_iter().next())
    }

    /// SELECT exactly one row, failing with [`CqlError::NotFound`] when there is none.
    pub async fn get_one_strict(&mut self, table: &str, columns: &[&str]) -> CqlResult<Row> {
        self.get_one(table, columns)
            .await?
            .ok_or_else(|| CqlError::not_found(format!("no row in {table}")))
    }

    /// SELECT rows and map them into `T`.
    pub async fn get_as<T: FromRow>(
        &mut self,
        table: &str,
        limit: Option<Limit>,
        columns: &[&str],
    ) -> CqlResult<Vec<T>> {
        let rows = self.get(table, limit, columns).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// INSERT one row. Values are converted through the table schema.
    pub async fn insert(&mut self, table: &str, payload: Payload) -> CqlResult<()> {
        let result = self
            .write(table, |client| client.compile_insert(table, &payload))
            .await;
        self.settle(result)
    }

    /// UPDATE rows matching the pending predicates.
    pub async fn update(&mut self, table: &str, payload: Payload) -> CqlResult<()> {
        let result = self
            .write(table, |client| client.compile_update(table, &payload))
            .await;
        self.settle(result)
    }

    /// DELETE rows matching the pending predicates.
    pub async fn delete(&mut self, table: &str, limit: Option<Limit>) -> CqlResult<()> {
        let result = self
            .write(table, |client| client.compile_delete(table, limit))
            .await;
        self.settle(result)
    }

    async fn get_inner(
        &mut self,
        table: &str,
        limit: Option<Limit>,
        columns: &[&str],
    ) -> CqlResult<Vec<Row>> {
        self.connect().await?;
        let query = self.compile_select(table, limit, columns)?;
        if !query.params.is_empty() {
            self.refresh_schema(table).await?;
        }
        let values = query
            .params
            .into_cql(self.schema.get(table), &self.converter)?;
        let result = self.run(Some(Operation::Select), &query.cql, &values).await?;
        Ok(extract_rows(result, self.config.auto_convert))
    }

    async fn write(
        &mut self,
        table: &str,
        build: impl FnOnce(&Self) -> CqlResult<CompiledQuery>,
    ) -> CqlResult<()> {
        self.connect().await?;
        self.refresh_schema(table).await?;

        let query = build(self)?;
        let values = query
            .params
            .into_cql(self.schema.get(table), &self.converter)?;
        self.run(Some(query.operation), &query.cql, &values).await?;
        Ok(())
    }

    /// Reset the chain unless the failure came from the session or the connection.
    fn settle<T>(&mut self, result: CqlResult<T>) -> CqlResult<T> {
        match &result {
            Ok(_) => self.state.reset(),
            Err(err) if err.is_fatal() || err.is_session_error() => {
                tracing::debug!(target: "cqlkit", error = %err, "builder state kept");
            }
            Err(_) => self.state.reset(),
        }
        result
    }

    // ==================== Session plumbing ====================

    async fn connect(&mut self) -> CqlResult<()> {
        if let Some(message) = &self.connect_error {
            return Err(CqlError::Connect(message.clone()));
        }
        if self.session.is_some() {
            return Ok(());
        }

        match self.connector.connect().await {
            Ok(session) => {
                tracing::info!(target: "cqlkit", "session established");
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                let message = match err {
                    CqlError::Connect(message) => message,
                    other => other.to_string(),
                };
                tracing::error!(
                    target: "cqlkit",
                    error = %message,
                    "connect failed; client disabled"
                );
                self.connect_error = Some(message.clone());
                Err(CqlError::Connect(message))
            }
        }
    }

    async fn refresh_schema(&mut self, table: &str) -> CqlResult<()> {
        if !self.schema.needs_refresh(table) {
            return Ok(());
        }
        let Some(session) = self.session.as_ref() else {
            return Err(CqlError::Connect("not connected".to_string()));
        };

        let columns = session.table_schema(table).await?;
        self.stats.schema_refreshes += 1;
        if columns.is_empty() {
            return Err(CqlError::SchemaUnavailable(table.to_string()));
        }
        tracing::info!(target: "cqlkit", table, columns = columns.len(), "schema cache refreshed");
        self.schema.replace(TableSchema::from_columns(table, columns));
        Ok(())
    }

    async fn run(
        &mut self,
        operation: Option<Operation>,
        cql: &str,
        values: &[CqlValue],
    ) -> CqlResult<ResultSet> {
        let Some(session) = self.session.as_ref() else {
            return Err(CqlError::Connect("not connected".to_string()));
        };

        tracing::debug!(
            target: "cqlkit.cql",
            operation = %operation.map_or("RAW".to_string(), |op| op.to_string()),
            param_count = values.len(),
            cql = %truncate_cql(cql, self.config.log_max_sql_length),
        );
        self.stats.on_query(operation);

        let cached = self.statements.as_mut().and_then(|cache| cache.get(cql));
        let statement = match cached {
            Some(statement) => {
                self.stats.stmt_cache_hits += 1;
                statement
            }
            None => {
                self.stats.stmt_prepare_count += 1;
                let prepared = session.prepare(cql).await.map_err(|err| match err {
                    err @ CqlError::Prepare { .. } => err,
                    other => CqlError::prepare(cql, other.to_string()),
                });
                let statement = match prepared {
                    Ok(statement) => statement,
                    Err(err) => {
                        self.stats.failed_queries += 1;
                        tracing::warn!(target: "cqlkit", error = %err, "prepare failed");
                        return Err(err);
                    }
                };
                if let Some(cache) = self.statements.as_mut() {
                    self.stats.stmt_cache_misses += 1;
                    cache.insert(cql.to_string(), statement.clone());
                }
                statement
            }
        };

        match session.execute(&statement, values).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.stats.failed_queries += 1;
                let err = match err {
                    err @ CqlError::Execution { .. } => err,
                    other => CqlError::execution(cql, other.to_string()),
                };
                tracing::warn!(target: "cqlkit", error = %err, "execution failed");
                Err(err)
            }
        }
    }
}

fn truncate_cql(cql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if cql.len() > max => {
            let mut end = max;
            while end > 0 && !cql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &cql[..end])
        }
        _ => cql.to_string(),
    }
}
