use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::Service as _;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{web, App, HttpServer};
use ride_backend::api::routes::{self, AppState};
use ride_backend::application::DriverService;
use ride_backend::config::AppConfig;
use ride_backend::infrastructure::build_location_store;
use ride_backend::middleware::request_logging::{
    create_request_span, get_client_ip, get_status_class, get_user_agent, REQUEST_ID_HEADER,
};
use ride_backend::observability::AppMetrics;
use ride_backend::security::{cors_middleware, security_headers};
use tracing::{error, info, Instrument};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(config.logging.level.clone());
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("failed to load application configuration: {e}"))?;
    config.validate()?;

    init_tracing(&config);

    let location_store = build_location_store(&config.database).await?;

    let state = AppState {
        driver_service: Arc::new(DriverService::new(location_store)),
        security: config.security.clone(),
        metrics: Arc::new(AppMetrics::default()),
    };

    let bind_host = config.host.clone();
    let bind_port = config.port;
    let security_config = config.security.clone();
    let metrics = state.metrics.clone();

    info!(
        host = %bind_host,
        port = bind_port,
        environment = %config.environment,
        store = %config.database.kind,
        "starting ride backend"
    );

    HttpServer::new(move || {
        let metrics = metrics.clone();
        App::new()
            .wrap_fn(move |req, srv| {
                let request_id = Uuid::new_v4().to_string();
                let path = req.path().to_string();
                let method = req.method().to_string();
                let span = create_request_span(
                    &request_id,
                    &method,
                    &path,
                    &get_client_ip(&req),
                    &get_user_agent(&req),
                );
                let metrics = metrics.clone();
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    let mut response = fut.await?;
                    response.headers_mut().insert(
                        HeaderName::from_static(REQUEST_ID_HEADER),
                        HeaderValue::from_str(&request_id)
                            .unwrap_or_else(|_| HeaderValue::from_static("invalid-request-id")),
                    );

                    let status = response.status().as_u16();
                    let latency_ms = start.elapsed().as_millis() as u64;
                    metrics.record_request(status, latency_ms);

                    info!(
                        status = status,
                        status_class = get_status_class(status),
                        latency_ms = latency_ms,
                        "request completed"
                    );

                    if status >= 500 {
                        error!(status = status, "request failed with server error");
                    }
                    Ok::<_, actix_web::Error>(response)
                }
                .instrument(span)
            })
            .wrap(cors_middleware(&security_config))
            .wrap(security_headers())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((bind_host, bind_port))?
    .run()
    .await?;

    Ok(())
}
