//! Request context helpers for the access log emitted in `main`.
use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use tracing::Span;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client address as resolved by actix.
///
/// `realip_remote_addr()` only honours Forwarded/X-Forwarded-For when actix
/// is configured to trust a proxy, so a client cannot spoof it by header alone.
pub fn get_client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn get_user_agent(req: &ServiceRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

pub fn create_request_span(
    request_id: &str,
    method: &str,
    path: &str,
    client_ip: &str,
    user_agent: &str,
) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        client_ip = %client_ip,
        user_agent = %user_agent
    )
}

/// HTTP status class for grouping (2xx, 3xx, 4xx, 5xx)
pub fn get_status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    }
}
