pub mod db;
pub mod repositories;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::{DatabaseConfig, DatabaseKind};
use repositories::{
    DriverLocationRepository, InMemoryDriverLocationRepository, PgDriverLocationRepository,
};

/// Builds the location store selected by `config.kind`. For Postgres this
/// connects the pool and applies pending migrations.
pub async fn build_location_store(
    config: &DatabaseConfig,
) -> anyhow::Result<Arc<dyn DriverLocationRepository>> {
    info!(kind = %config.kind, "initializing driver location store");

    match config.kind {
        DatabaseKind::Memory => Ok(Arc::new(InMemoryDriverLocationRepository::new())),
        DatabaseKind::Postgres => {
            let pool = db::pool::create_pool(config)
                .await
                .context("failed to create database pool")?;
            db::migrations::run_migrations(&pool)
                .await
                .context("database migrations failed")?;
            Ok(Arc::new(PgDriverLocationRepository::new(pool)))
        }
    }
}
