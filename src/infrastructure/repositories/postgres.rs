use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::traits::DriverLocationRepository;
use crate::domain::{BoundingBox, GeoPoint, TrackedEntity};
use crate::error::{AppError, AppResult};

const SELECT_COLUMNS: &str = "SELECT driver_id, latitude, longitude, last_updated FROM driver_locations";

#[derive(Debug, sqlx::FromRow)]
struct DriverLocationRow {
    driver_id: String,
    latitude: f64,
    longitude: f64,
    last_updated: DateTime<Utc>,
}

impl TryFrom<DriverLocationRow> for TrackedEntity {
    type Error = AppError;

    fn try_from(row: DriverLocationRow) -> Result<Self, Self::Error> {
        let position = GeoPoint::new(row.latitude, row.longitude).map_err(|err| {
            AppError::InternalError(anyhow::anyhow!(
                "stored location for driver {} is invalid: {err}",
                row.driver_id
            ))
        })?;
        Ok(TrackedEntity::new(row.driver_id, position, row.last_updated))
    }
}

fn into_entities(rows: Vec<DriverLocationRow>) -> AppResult<Vec<TrackedEntity>> {
    rows.into_iter().map(TrackedEntity::try_from).collect()
}

pub struct PgDriverLocationRepository {
    pool: PgPool,
}

impl PgDriverLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverLocationRepository for PgDriverLocationRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TrackedEntity>> {
        let row = sqlx::query_as::<_, DriverLocationRow>(&format!(
            "{SELECT_COLUMNS} WHERE driver_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(TrackedEntity::try_from).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<TrackedEntity>> {
        let rows = sqlx::query_as::<_, DriverLocationRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY driver_id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        into_entities(rows)
    }

    async fn count(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM driver_locations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_within(&self, bounds: &BoundingBox) -> AppResult<Vec<TrackedEntity>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
        builder.push(" WHERE latitude BETWEEN ");
        builder.push_bind(bounds.min_latitude);
        builder.push(" AND ");
        builder.push_bind(bounds.max_latitude);

        if !bounds.spans_all_longitudes() {
            builder.push(" AND longitude BETWEEN ");
            builder.push_bind(bounds.min_longitude);
            builder.push(" AND ");
            builder.push_bind(bounds.max_longitude);
        }

        let rows = builder
            .build_query_as::<DriverLocationRow>()
            .fetch_all(&self.pool)
            .await?;
        into_entities(rows)
    }

    async fn upsert_position(&self, entity: &TrackedEntity) -> AppResult<TrackedEntity> {
        let written = sqlx::query_as::<_, DriverLocationRow>(
            r#"
            INSERT INTO driver_locations (driver_id, latitude, longitude, last_updated)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (driver_id) DO UPDATE
               SET latitude = EXCLUDED.latitude,
                   longitude = EXCLUDED.longitude,
                   last_updated = EXCLUDED.last_updated
             WHERE driver_locations.last_updated <= EXCLUDED.last_updated
            RETURNING driver_id, latitude, longitude, last_updated
            "#,
        )
        .bind(&entity.id)
        .bind(entity.position.latitude())
        .bind(entity.position.longitude())
        .bind(entity.last_updated)
        .fetch_optional(&self.pool)
        .await?;

        match written {
            Some(row) => row.try_into(),
            // Stale report: the conflict guard skipped the update.
            None => self.find_by_id(&entity.id).await?.ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "driver {} vanished during position upsert",
                    entity.id
                ))
            }),
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
