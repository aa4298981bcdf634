use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::traits::DriverLocationRepository;
use crate::domain::{BoundingBox, TrackedEntity};
use crate::error::{AppError, AppResult};

/// Process-local location store, selected with `database.kind = "memory"`.
#[derive(Default)]
pub struct InMemoryDriverLocationRepository {
    entries: RwLock<HashMap<String, TrackedEntity>>,
}

impl InMemoryDriverLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: impl IntoIterator<Item = TrackedEntity>) -> Self {
        let entries = entities
            .into_iter()
            .map(|entity| (entity.id.clone(), entity))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<String, TrackedEntity>>> {
        self.entries.read().map_err(|_| {
            AppError::InternalError(anyhow::anyhow!("driver location store lock poisoned"))
        })
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<String, TrackedEntity>>> {
        self.entries.write().map_err(|_| {
            AppError::InternalError(anyhow::anyhow!("driver location store lock poisoned"))
        })
    }
}

#[async_trait]
impl DriverLocationRepository for InMemoryDriverLocationRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TrackedEntity>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<TrackedEntity>> {
        let mut rows: Vec<TrackedEntity> = self.read()?.values().cloned().collect();
        rows.sort_by(|left, right| left.id.cmp(&right.id));

        let start = offset.max(0) as usize;
        let limit = limit.max(0) as usize;
        Ok(rows.into_iter().skip(start).take(limit).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.len() as i64)
    }

    async fn find_within(&self, bounds: &BoundingBox) -> AppResult<Vec<TrackedEntity>> {
        Ok(self
            .read()?
            .values()
            .filter(|entity| bounds.contains(&entity.position))
            .cloned()
            .collect())
    }

    async fn upsert_position(&self, entity: &TrackedEntity) -> AppResult<TrackedEntity> {
        let mut entries = self.write()?;
        match entries.get(&entity.id) {
            Some(stored) if !stored.is_superseded_by(entity) => Ok(stored.clone()),
            _ => {
                entries.insert(entity.id.clone(), entity.clone());
                Ok(entity.clone())
            }
        }
    }
}
