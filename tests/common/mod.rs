#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use ride_backend::api::routes::AppState;
use ride_backend::application::DriverService;
use ride_backend::config::SecurityConfig;
use ride_backend::domain::{GeoPoint, TrackedEntity};
use ride_backend::infrastructure::db::migrations::run_migrations;
use ride_backend::infrastructure::repositories::{
    DriverLocationRepository, InMemoryDriverLocationRepository,
};
use ride_backend::observability::AppMetrics;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::{Mutex, MutexGuard};

static TEST_DB_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn security_config() -> SecurityConfig {
    SecurityConfig {
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        metrics_allow_private_only: true,
    }
}

pub fn driver(id: &str, latitude: f64, longitude: f64) -> TrackedEntity {
    TrackedEntity::new(
        id,
        GeoPoint::new(latitude, longitude).expect("fixture coordinates should be valid"),
        Utc::now(),
    )
}

/// The three drivers used by the nearby-search scenarios around (40, -75).
pub fn scenario_drivers() -> Vec<TrackedEntity> {
    vec![
        driver("a", 40.0, -75.0),
        driver("b", 40.1, -75.0),
        driver("c", 41.0, -75.0),
    ]
}

pub fn app_state_with_repo(repo: Arc<dyn DriverLocationRepository>) -> AppState {
    AppState {
        driver_service: Arc::new(DriverService::new(repo)),
        security: security_config(),
        metrics: Arc::new(AppMetrics::default()),
    }
}

pub fn app_state(drivers: Vec<TrackedEntity>) -> AppState {
    app_state_with_repo(Arc::new(InMemoryDriverLocationRepository::with_entities(
        drivers,
    )))
}

pub struct TestDb {
    pool: PgPool,
    _lock: MutexGuard<'static, ()>,
}

impl TestDb {
    /// Connects to `TEST_DATABASE_URL` (or `DATABASE_URL`), migrates and
    /// truncates. Returns `None` when neither is set so the test is skipped.
    pub async fn new() -> Option<Self> {
        dotenvy::dotenv().ok();
        let url = env::var("TEST_DATABASE_URL")
            .ok()
            .or_else(|| env::var("DATABASE_URL").ok());

        let Some(url) = url else {
            if env::var("CI").is_ok() {
                panic!("DATABASE_URL or TEST_DATABASE_URL not set in CI");
            }
            eprintln!("Skipping test: DATABASE_URL or TEST_DATABASE_URL not set");
            return None;
        };

        let lock = TEST_DB_MUTEX.lock().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .ok()?;

        run_migrations(&pool).await.ok()?;
        sqlx::query("TRUNCATE driver_locations")
            .execute(&pool)
            .await
            .ok()?;

        Some(Self { pool, _lock: lock })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
