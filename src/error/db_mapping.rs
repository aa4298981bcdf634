use super::app_error::AppError;

/// Translates a Postgres SQLSTATE (plus constraint name) into an API error.
/// Returns `None` for codes that should surface as a generic database error.
pub(super) fn map_database_error(
    code: Option<&str>,
    constraint: Option<&str>,
    message: &str,
) -> Option<AppError> {
    match code {
        Some("23502") => Some(AppError::validation_error(
            required_field_message_from_db(message)
                .unwrap_or_else(|| "required field is missing".to_string()),
        )),
        Some("23514") => Some(AppError::validation_error(check_message_from_constraint(
            constraint,
        ))),
        Some("22P02") | Some("22003") => Some(AppError::validation_error("invalid input format")),
        Some("08001") | Some("08006") => Some(AppError::database_unavailable(
            "Unable to connect to database. Please try again later.",
        )),
        Some("53300") | Some("57014") => Some(AppError::database_unavailable(
            "Service temporarily unavailable. Please try again later.",
        )),
        _ => None,
    }
}

pub(super) fn check_message_from_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("driver_locations_latitude_check") => "latitude must be between -90 and 90",
        Some("driver_locations_longitude_check") => "longitude must be between -180 and 180",
        Some("driver_locations_driver_id_check") => "driver id must be 1 to 64 characters",
        _ => "request violates validation rules",
    }
}

pub(super) fn required_field_message_from_db(message: &str) -> Option<String> {
    let marker = "column \"";
    let start = message.find(marker)?;
    let rest = &message[start + marker.len()..];
    let end = rest.find('"')?;
    Some(format!("{} is required", &rest[..end]))
}
