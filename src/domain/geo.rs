use std::f64::consts::{FRAC_PI_2, PI};

use serde::Serialize;

use super::errors::{Constraint, QueryField, ValidationError};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

// Absorbs float rounding between the box edges and the haversine filter.
const BOX_PADDING_DEGREES: f64 = 1e-9;

/// A latitude/longitude pair in degrees. Always within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        ensure_within(QueryField::Latitude, latitude, MIN_LATITUDE, MAX_LATITUDE)?;
        ensure_within(QueryField::Longitude, longitude, MIN_LONGITUDE, MAX_LONGITUDE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

fn ensure_within(field: QueryField, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            value,
            Constraint::Range { min, max },
        ))
    }
}

pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Lat/lng rectangle enclosing every point within a radius of a center.
///
/// Used to narrow the candidate scan before exact distance filtering. When the
/// circle touches a pole or crosses the antimeridian the longitude span covers
/// the whole globe, so the box never excludes a point inside the circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let angular = radius_km.max(0.0) / EARTH_RADIUS_KM;
        let lat = center.latitude.to_radians();
        let lng = center.longitude.to_radians();

        let mut min_lat = lat - angular;
        let mut max_lat = lat + angular;
        let mut min_lng = -PI;
        let mut max_lng = PI;

        if min_lat > -FRAC_PI_2 && max_lat < FRAC_PI_2 {
            let delta_lng = (angular.sin() / lat.cos()).asin();
            if lng - delta_lng >= -PI && lng + delta_lng <= PI {
                min_lng = lng - delta_lng;
                max_lng = lng + delta_lng;
            }
        } else {
            min_lat = min_lat.max(-FRAC_PI_2);
            max_lat = max_lat.min(FRAC_PI_2);
        }

        Self {
            min_latitude: (min_lat.to_degrees() - BOX_PADDING_DEGREES).max(MIN_LATITUDE),
            max_latitude: (max_lat.to_degrees() + BOX_PADDING_DEGREES).min(MAX_LATITUDE),
            min_longitude: (min_lng.to_degrees() - BOX_PADDING_DEGREES).max(MIN_LONGITUDE),
            max_longitude: (max_lng.to_degrees() + BOX_PADDING_DEGREES).min(MAX_LONGITUDE),
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }

    pub fn spans_all_longitudes(&self) -> bool {
        self.min_longitude <= MIN_LONGITUDE && self.max_longitude >= MAX_LONGITUDE
    }
}
