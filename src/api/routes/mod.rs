use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use utoipa::OpenApi;

use crate::api::openapi::ApiDoc;
use crate::application::DriverService;
use crate::config::SecurityConfig;
use crate::error::{AppError, AppResult};
use crate::observability::AppMetrics;

pub mod drivers;

#[derive(Clone)]
pub struct AppState {
    pub driver_service: Arc<DriverService>,
    pub security: SecurityConfig,
    pub metrics: Arc<AppMetrics>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(web::scope("/api/v1").configure(drivers::configure))
    .route("/health", web::get().to(health))
    .route("/ready", web::get().to(ready))
    .route("/metrics", web::get().to(metrics))
    .route("/api-docs/openapi.json", web::get().to(openapi_json));
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check passed")
    ),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Readiness check passed"),
        (status = 503, description = "Location store not reachable"),
    ),
    tag = "health"
)]
pub async fn ready(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state
        .driver_service
        .ping()
        .await
        .map_err(|e| AppError::ServiceUnavailable {
            service: "location store".to_string(),
            message: format!("Service not ready: {e}"),
        })?;
    Ok(HttpResponse::Ok().body("ready"))
}

async fn metrics(state: web::Data<AppState>, request: HttpRequest) -> AppResult<HttpResponse> {
    if state.security.metrics_allow_private_only {
        let ip = request
            .peer_addr()
            .map(|addr| addr.ip())
            .ok_or_else(|| AppError::Forbidden("metrics are not exposed publicly".to_string()))?;

        if !is_private_or_loopback(ip) {
            return Err(AppError::Forbidden(
                "metrics are not exposed publicly".to_string(),
            ));
        }
    }

    let tracked = state.driver_service.tracked_count().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(state.metrics.render_prometheus(tracked)))
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn is_private_or_loopback(ip: std::net::IpAddr) -> bool {
    match ip {
        std::net::IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        std::net::IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local(),
    }
}
