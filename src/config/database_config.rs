use std::fmt;

use serde::Deserialize;

/// Which location store backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Postgres,
    /// Process-local store; nothing survives a restart.
    Memory,
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Postgres => f.write_str("postgres"),
            DatabaseKind::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "crate::config::defaults::default_database_kind")]
    pub kind: DatabaseKind,
    #[serde(default)]
    pub url: String,
    #[serde(default = "crate::config::defaults::default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "crate::config::defaults::default_db_min_connections")]
    pub min_connections: u32,
    #[serde(default = "crate::config::defaults::default_db_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn memory() -> Self {
        Self {
            kind: DatabaseKind::Memory,
            ..Self::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: crate::config::defaults::default_database_kind(),
            url: String::new(),
            max_connections: crate::config::defaults::default_db_max_connections(),
            min_connections: crate::config::defaults::default_db_min_connections(),
            acquire_timeout_seconds: crate::config::defaults::default_db_acquire_timeout_seconds(),
        }
    }
}

// The URL carries credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("kind", &self.kind)
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}
