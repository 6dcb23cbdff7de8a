use crate::qb::Operation;

/// Collected query statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Total number of statements sent to the session.
    pub total_queries: u64,
    /// Statements that failed to prepare or execute.
    pub failed_queries: u64,
    pub select_count: u64,
    pub insert_count: u64,
    pub update_count: u64,
    pub delete_count: u64,
    /// Hand-written statements run through `raw_query`.
    pub raw_count: u64,
    /// Prepared statement cache hits.
    pub stmt_cache_hits: u64,
    /// Prepared statement cache misses.
    pub stmt_cache_misses: u64,
    /// Number of prepares performed.
    pub stmt_prepare_count: u64,
    /// Catalog lookups performed to refresh the schema cache.
    pub schema_refreshes: u64,
}

impl QueryStats {
    pub(super) fn on_query(&mut self, operation: Option<Operation>) {
        self.total_queries += 1;
        match operation {
            Some(Operation::Select) => self.select_count += 1,
            Some(Operation::Insert) => self.insert_count += 1,
            Some(Operation::Update) => self.update_count += 1,
            Some(Operation::Delete) => self.delete_count += 1,
            None => self.raw_count += 1,
        }
    }
}
