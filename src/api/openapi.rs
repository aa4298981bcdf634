use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::routes::drivers::nearby_drivers,
        crate::api::routes::drivers::list_drivers,
        crate::api::routes::drivers::get_driver,
        crate::api::routes::drivers::update_driver_location,
        crate::api::routes::health,
        crate::api::routes::ready,
    ),
    components(
        schemas(
            crate::api::dtos::NearbyDriverResponse,
            crate::api::dtos::DriverLocationResponse,
            crate::api::dtos::UpdateDriverLocationRequest,
            crate::api::dtos::ErrorResponse,
        )
    ),
    tags(
        (name = "drivers", description = "Driver positions and nearby search"),
        (name = "health", description = "Health check endpoints"),
    ),
    info(
        title = "Ride Backend API",
        version = "0.1.0",
        description = "Driver location store and nearby-driver search",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;
