use actix_web::error::QueryPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::api::dtos::{
    DriverLocationResponse, ErrorResponse, NearbyDriverResponse, NearbyDriversQuery,
    PaginationParams, UpdateDriverLocationRequest,
};
use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/drivers")
            .route("", web::get().to(list_drivers))
            // Registered before `/{id}` so "nearby" is never taken for an id.
            .service(
                web::resource("/nearby")
                    .app_data(web::QueryConfig::default().error_handler(reject_malformed_search))
                    .route(web::get().to(nearby_drivers)),
            )
            .route("/{id}", web::get().to(get_driver))
            .route("/{id}/location", web::put().to(update_driver_location)),
    );
}

/// Counts unparseable nearby queries alongside out-of-range ones.
fn reject_malformed_search(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    if let Some(state) = req.app_data::<web::Data<AppState>>() {
        state.metrics.record_rejected_search();
    }
    AppError::BadRequest(err.to_string()).into()
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers/nearby",
    params(NearbyDriversQuery),
    responses(
        (status = 200, description = "Drivers within the radius, nearest first", body = [NearbyDriverResponse]),
        (status = 400, description = "Coordinates or radius out of range", body = ErrorResponse),
    ),
    tag = "drivers"
)]
pub async fn nearby_drivers(
    state: web::Data<AppState>,
    query: web::Query<NearbyDriversQuery>,
) -> AppResult<HttpResponse> {
    match state.driver_service.find_nearby(query.into_inner()).await {
        Ok(result) => {
            state.metrics.record_nearby_search(result.len());
            Ok(HttpResponse::Ok().json(result))
        }
        Err(error) => {
            if matches!(error, AppError::ValidationError { .. }) {
                state.metrics.record_rejected_search();
            }
            Err(error)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of last known driver positions"),
    ),
    tag = "drivers"
)]
pub async fn list_drivers(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let result = state.driver_service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    params(("id" = String, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Last known position", body = DriverLocationResponse),
        (status = 404, description = "Driver has never reported a position", body = ErrorResponse),
    ),
    tag = "drivers"
)]
pub async fn get_driver(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let result = state.driver_service.get_by_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    put,
    path = "/api/v1/drivers/{id}/location",
    params(("id" = String, Path, description = "Driver id")),
    request_body = UpdateDriverLocationRequest,
    responses(
        (status = 200, description = "Stored position (unchanged if the report was stale)", body = DriverLocationResponse),
        (status = 400, description = "Invalid coordinates or driver id", body = ErrorResponse),
    ),
    tag = "drivers"
)]
pub async fn update_driver_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdateDriverLocationRequest>,
) -> AppResult<HttpResponse> {
    let result = state
        .driver_service
        .update_position(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
