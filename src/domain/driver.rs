use chrono::{DateTime, Utc};
use serde::Serialize;

use super::geo::GeoPoint;

/// Last reported position of a driver, as held by the location store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    pub id: String,
    pub position: GeoPoint,
    pub last_updated: DateTime<Utc>,
}

impl TrackedEntity {
    pub fn new(id: impl Into<String>, position: GeoPoint, last_updated: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            position,
            last_updated,
        }
    }

    /// Whether `other` carries a report at least as recent as this one.
    pub fn is_superseded_by(&self, other: &TrackedEntity) -> bool {
        other.last_updated >= self.last_updated
    }
}
