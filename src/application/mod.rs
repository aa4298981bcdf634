mod driver_service;
pub mod proximity;

pub use driver_service::DriverService;
pub use proximity::{
    NearbyEntity, ProximityQueryService, QueryRequest, QueryResult, DEFAULT_RADIUS_KM,
    MAX_RADIUS_KM, MIN_RADIUS_KM,
};
