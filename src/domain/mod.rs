pub mod driver;
pub mod errors;
pub mod geo;

pub use driver::TrackedEntity;
pub use errors::{Constraint, QueryField, ValidationError};
pub use geo::{haversine_km, BoundingBox, GeoPoint, EARTH_RADIUS_KM};
