use crate::config::SecurityConfig;
use actix_cors::Cors;

/// CORS for the rider/driver web frontends. Only exact origin matches are allowed.
pub fn cors_middleware(config: &SecurityConfig) -> Cors {
    let allowlist = config.cors_allowed_origins.clone();

    Cors::default()
        .allowed_methods(vec!["GET", "PUT", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec![crate::middleware::request_logging::REQUEST_ID_HEADER])
        .max_age(3600)
        .allowed_origin_fn(move |origin, _| {
            origin
                .to_str()
                .ok()
                .is_some_and(|value| allowlist.iter().any(|allowed| allowed == value))
        })
}
