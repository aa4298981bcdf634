use tracing::warn;

use crate::domain::ValidationError;
use crate::error::app_error::AppError;
use crate::error::db_mapping::map_database_error;
use crate::error::validation_mapping::{collect_validation_issues, issue_from_query_error};

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let issue = issue_from_query_error(&err);
        AppError::ValidationError {
            message: issue.message.clone(),
            issues: vec![issue],
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) => AppError::database_unavailable(
                "Unable to connect to database. Please try again later.",
            ),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => AppError::database_unavailable(
                "Service temporarily unavailable. Please try again later.",
            ),
            sqlx::Error::Database(database_error) => {
                let mapped = map_database_error(
                    database_error.code().as_deref(),
                    database_error.constraint(),
                    database_error.message(),
                );
                mapped.unwrap_or_else(|| {
                    warn!(
                        code = ?database_error.code(),
                        constraint = ?database_error.constraint(),
                        "unmapped database error"
                    );
                    AppError::DatabaseError(sqlx::Error::Database(database_error))
                })
            }
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut issues = Vec::new();
        collect_validation_issues(None, &err, &mut issues);
        issues.sort_by(|left, right| {
            left.field
                .cmp(&right.field)
                .then(left.code.cmp(&right.code))
        });

        let message = match issues.as_slice() {
            [issue] => issue.message.clone(),
            _ => "Request validation failed".to_string(),
        };

        AppError::ValidationError { message, issues }
    }
}
