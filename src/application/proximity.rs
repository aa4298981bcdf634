use std::collections::HashSet;

use crate::domain::{Constraint, GeoPoint, QueryField, TrackedEntity, ValidationError};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
/// Exclusive lower bound.
pub const MIN_RADIUS_KM: f64 = 0.1;
/// Caps the worst-case scan of a single query.
pub const MAX_RADIUS_KM: f64 = 100.0;

/// A validated "who is near this point" request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    point: GeoPoint,
    radius_km: f64,
}

impl QueryRequest {
    /// Checks latitude, then longitude, then radius. A missing radius
    /// falls back to [`DEFAULT_RADIUS_KM`].
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let point = GeoPoint::new(latitude, longitude)?;
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);

        if radius_km.is_nan() || radius_km <= MIN_RADIUS_KM {
            return Err(ValidationError::new(
                QueryField::RadiusKm,
                radius_km,
                Constraint::GreaterThan { min: MIN_RADIUS_KM },
            ));
        }
        if radius_km > MAX_RADIUS_KM {
            return Err(ValidationError::new(
                QueryField::RadiusKm,
                radius_km,
                Constraint::AtMost { max: MAX_RADIUS_KM },
            ));
        }

        Ok(Self { point, radius_km })
    }

    pub const fn point(&self) -> &GeoPoint {
        &self.point
    }

    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEntity {
    pub entity: TrackedEntity,
    pub distance_km: f64,
}

/// Ascending by distance, ties by id, ids unique.
pub type QueryResult = Vec<NearbyEntity>;

/// Exact radius search over a candidate snapshot.
///
/// Stateless: every call depends only on its arguments. Candidate narrowing
/// (bounding box, index) happens before this is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityQueryService;

impl ProximityQueryService {
    pub const fn new() -> Self {
        Self
    }

    pub fn find_nearby(&self, request: &QueryRequest, candidates: &[TrackedEntity]) -> QueryResult {
        let origin = request.point();
        let mut within: Vec<(f64, &TrackedEntity)> = candidates
            .iter()
            .map(|candidate| (origin.distance_km(&candidate.position), candidate))
            .filter(|(distance_km, _)| *distance_km <= request.radius_km())
            .collect();

        within.sort_by(|(left_distance, left), (right_distance, right)| {
            left_distance
                .total_cmp(right_distance)
                .then_with(|| left.id.cmp(&right.id))
        });

        // Sorted nearest first, so the first occurrence of an id is its closest report.
        let mut seen = HashSet::with_capacity(within.len());
        within
            .into_iter()
            .filter(|(_, entity)| seen.insert(entity.id.as_str()))
            .map(|(distance_km, entity)| NearbyEntity {
                entity: entity.clone(),
                distance_km,
            })
            .collect()
    }
}
