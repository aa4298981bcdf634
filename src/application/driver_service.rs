use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{debug, info};
use validator::Validate;

use super::proximity::{ProximityQueryService, QueryRequest};
use crate::api::dtos::{
    DriverLocationResponse, NearbyDriverResponse, NearbyDriversQuery, PaginatedResponse,
    PaginationParams, UpdateDriverLocationRequest,
};
use crate::domain::{BoundingBox, GeoPoint, TrackedEntity};
use crate::error::{AppError, AppResult, ValidationIssue};
use crate::infrastructure::repositories::DriverLocationRepository;

const MAX_DRIVER_ID_LEN: usize = 64;
/// Tolerated device clock drift for `reportedAt`.
const MAX_REPORT_CLOCK_SKEW_SECONDS: i64 = 30;
// Taken by `GET /drivers/nearby`, so a driver with this id could never be read back.
const RESERVED_DRIVER_IDS: &[&str] = &["nearby"];

#[derive(Clone)]
pub struct DriverService {
    location_repo: Arc<dyn DriverLocationRepository>,
    proximity: ProximityQueryService,
}

impl DriverService {
    pub fn new(location_repo: Arc<dyn DriverLocationRepository>) -> Self {
        Self {
            location_repo,
            proximity: ProximityQueryService::new(),
        }
    }

    pub async fn find_nearby(&self, query: NearbyDriversQuery) -> AppResult<Vec<NearbyDriverResponse>> {
        let request = QueryRequest::new(query.latitude, query.longitude, query.radius_km)?;
        let bounds = BoundingBox::around(request.point(), request.radius_km());

        let candidates = self.location_repo.find_within(&bounds).await?;
        let nearby = self.proximity.find_nearby(&request, &candidates);

        debug!(
            latitude = request.point().latitude(),
            longitude = request.point().longitude(),
            radius_km = request.radius_km(),
            candidates = candidates.len(),
            matched = nearby.len(),
            "nearby driver search"
        );

        Ok(nearby.into_iter().map(NearbyDriverResponse::from).collect())
    }

    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<DriverLocationResponse>> {
        let page = params.page.max(1);
        let limit = params.limit.clamp(1, 100);
        let offset = (page - 1).saturating_mul(limit);

        let rows = self.location_repo.list(limit, offset).await?;
        let total = self.location_repo.count().await?;
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Ok(PaginatedResponse {
            items: rows.into_iter().map(DriverLocationResponse::from).collect(),
            total,
            page,
            limit,
            total_pages,
        })
    }

    pub async fn get_by_id(&self, driver_id: &str) -> AppResult<DriverLocationResponse> {
        validate_driver_id(driver_id)?;
        self.location_repo
            .find_by_id(driver_id)
            .await?
            .map(DriverLocationResponse::from)
            .ok_or_else(|| AppError::NotFound("driver not found".to_string()))
    }

    pub async fn update_position(
        &self,
        driver_id: &str,
        request: UpdateDriverLocationRequest,
    ) -> AppResult<DriverLocationResponse> {
        validate_driver_id(driver_id)?;
        request.validate()?;

        let position = GeoPoint::new(request.latitude, request.longitude)?;
        let now = Utc::now();
        if let Some(reported_at) = request.reported_at {
            ensure_not_future_dated(reported_at, now)?;
        }
        // Postgres keeps microseconds; truncate so both stores agree.
        let reported_at = request.reported_at.unwrap_or(now).trunc_subsecs(6);
        let entity = TrackedEntity::new(driver_id, position, reported_at);

        let stored = self.location_repo.upsert_position(&entity).await?;
        if stored.last_updated > reported_at {
            info!(
                driver_id = %driver_id,
                reported_at = %reported_at,
                stored_at = %stored.last_updated,
                "ignored stale position report"
            );
        }

        Ok(DriverLocationResponse::from(stored))
    }

    pub async fn tracked_count(&self) -> AppResult<i64> {
        self.location_repo.count().await
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.location_repo.health_check().await
    }
}

fn validate_driver_id(driver_id: &str) -> AppResult<()> {
    if driver_id.trim().is_empty() || driver_id.chars().count() > MAX_DRIVER_ID_LEN {
        return Err(AppError::validation_error(format!(
            "driver id must be 1 to {MAX_DRIVER_ID_LEN} characters"
        )));
    }
    if RESERVED_DRIVER_IDS.contains(&driver_id) {
        return Err(AppError::validation_error(format!(
            "driver id '{driver_id}' is reserved"
        )));
    }
    Ok(())
}

/// A future-dated report would outrank every later real one and pin the
/// driver in place.
fn ensure_not_future_dated(reported_at: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if reported_at <= now + Duration::seconds(MAX_REPORT_CLOCK_SKEW_SECONDS) {
        return Ok(());
    }
    let message = format!(
        "reportedAt must not be more than {MAX_REPORT_CLOCK_SKEW_SECONDS} seconds in the future"
    );
    Err(AppError::ValidationError {
        message: message.clone(),
        issues: vec![ValidationIssue {
            field: "reportedAt".to_string(),
            message,
            code: "max".to_string(),
        }],
    })
}
