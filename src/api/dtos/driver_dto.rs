use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::NearbyEntity;
use crate::domain::TrackedEntity;

/// Query string of `GET /drivers/nearby`. Range checks happen when the
/// service builds its `QueryRequest`, not at deserialization.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyDriversQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometres, `(0.1, 100]`, defaults to 5.
    #[serde(default, alias = "radius_km")]
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDriverResponse {
    pub id: String,
    pub distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<NearbyEntity> for NearbyDriverResponse {
    fn from(item: NearbyEntity) -> Self {
        Self {
            latitude: item.entity.position.latitude(),
            longitude: item.entity.position.longitude(),
            id: item.entity.id,
            distance_km: item.distance_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocationResponse {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_updated: DateTime<Utc>,
}

impl From<TrackedEntity> for DriverLocationResponse {
    fn from(entity: TrackedEntity) -> Self {
        Self {
            latitude: entity.position.latitude(),
            longitude: entity.position.longitude(),
            id: entity.id,
            last_updated: entity.last_updated,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverLocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    /// When the driver's device took the fix; defaults to the time of receipt.
    #[serde(default)]
    pub reported_at: Option<DateTime<Utc>>,
}
