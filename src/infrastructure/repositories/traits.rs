use async_trait::async_trait;

use crate::domain::{BoundingBox, TrackedEntity};
use crate::error::AppResult;

/// Store of the latest reported position per driver.
#[async_trait]
pub trait DriverLocationRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TrackedEntity>>;

    /// Page of drivers ordered by id.
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<TrackedEntity>>;

    async fn count(&self) -> AppResult<i64>;

    /// Every driver whose position lies inside `bounds`. Order is unspecified.
    async fn find_within(&self, bounds: &BoundingBox) -> AppResult<Vec<TrackedEntity>>;

    /// Inserts or replaces the driver's position and returns the stored row.
    /// A report older than the stored one is ignored.
    async fn upsert_position(&self, entity: &TrackedEntity) -> AppResult<TrackedEntity>;

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
