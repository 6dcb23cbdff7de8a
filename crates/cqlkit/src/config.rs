//! Client configuration.

use crate::convert::UuidWrites;

/// Configuration for [`crate::CqlClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Convert returned typed cells into native values.
    pub auto_convert: bool,
    /// Policy for values written to `uuid` / `timeuuid` columns.
    pub uuid_writes: UuidWrites,
    /// Prepared statement cache.
    pub statement_cache: StatementCacheConfig,
    /// Truncate logged statements (in bytes). `None` logs them in full.
    pub log_max_sql_length: Option<usize>,
}

/// Prepared statement cache configuration (per client).
#[derive(Debug, Clone)]
pub struct StatementCacheConfig {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for StatementCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 64,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auto_convert: true,
            uuid_writes: UuidWrites::default(),
            statement_cache: StatementCacheConfig::default(),
            log_max_sql_length: Some(200),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable typed → native conversion of returned cells.
    pub fn auto_convert(mut self, enabled: bool) -> Self {
        self.auto_convert = enabled;
        self
    }

    /// Set the uuid write policy.
    pub fn uuid_writes(mut self, policy: UuidWrites) -> Self {
        self.uuid_writes = policy;
        self
    }

    /// Keep the supplied values for uuid columns instead of minting fresh ones.
    pub fn honor_uuids(self) -> Self {
        self.uuid_writes(UuidWrites::Honor)
    }

    /// Enable the prepared statement cache with the given capacity.
    pub fn statement_cache(mut self, capacity: usize) -> Self {
        self.statement_cache = StatementCacheConfig {
            enabled: true,
            capacity,
        };
        self
    }

    /// Prepare every statement again on each execution.
    pub fn no_statement_cache(mut self) -> Self {
        self.statement_cache.enabled = false;
        self
    }

    /// Set maximum logged statement length.
    pub fn log_max_sql_length(mut self, len: usize) -> Self {
        self.log_max_sql_length = Some(len);
        self
    }

    /// Disable statement truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.log_max_sql_length = None;
        self
    }
}
