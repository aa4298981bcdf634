pub mod database_config;
pub mod defaults;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

pub use database_config::{DatabaseConfig, DatabaseKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Database configuration is invalid: {0}")]
    Database(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "defaults::default_host")]
    pub host: String,
    #[serde(default = "defaults::default_port")]
    pub port: u16,
    #[serde(default = "defaults::default_environment")]
    pub environment: String,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "defaults::default_logging_level")]
    pub level: String,
    #[serde(default = "defaults::default_logging_json_format")]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_logging_level(),
            json_format: defaults::default_logging_json_format(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    #[serde(default = "defaults::default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default = "defaults::default_metrics_allow_private_only")]
    pub metrics_allow_private_only: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: defaults::default_cors_allowed_origins(),
            metrics_allow_private_only: defaults::default_metrics_allow_private_only(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Toml::file("config/development.toml"))
            .merge(Env::prefixed("APP_").split("__"))
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "DATABASE_KIND", "LOG_LEVEL"])
                    .map(|key| match key.as_str() {
                        "DATABASE_URL" => "database.url".into(),
                        "DATABASE_KIND" => "database.kind".into(),
                        "LOG_LEVEL" => "logging.level".into(),
                        _ => key.into(),
                    }),
            )
            .extract()
            .map_err(Box::new)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let database = &self.database;
        if database.kind == DatabaseKind::Postgres && database.url.trim().is_empty() {
            return Err(ConfigError::Database(
                "DATABASE_URL must be set when database.kind is postgres".to_string(),
            ));
        }

        if database.min_connections > database.max_connections {
            return Err(ConfigError::Database(format!(
                "min_connections ({}) exceeds max_connections ({})",
                database.min_connections, database.max_connections
            )));
        }

        Ok(())
    }
}
