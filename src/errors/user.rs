use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use super::{impl_into_response, AppError, ErrorSeverity};
use crate::models::FieldViolation;

pub const USER_NOT_FOUND_MESSAGE: &str = "User with specified ID not found!";

/// Errors raised while serving a user operation
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Malformed request body: {details}")]
    Decode { details: String },

    #[error("Validation failed: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("operation exceeded the {}s deadline", .timeout.as_secs())]
    DeadlineExceeded { timeout: Duration },

    #[error("User not found")]
    NotFound,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError for UserError {
    fn status_code(&self) -> StatusCode {
        match self {
            UserError::Decode { .. } | UserError::Validation { .. } => StatusCode::BAD_REQUEST,
            UserError::Store { .. } | UserError::DeadlineExceeded { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UserError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn user_message(&self) -> String {
        match self {
            UserError::Decode { details } => details.clone(),
            UserError::Validation { violations } => join_violations(violations),
            UserError::Store { message } => message.clone(),
            UserError::DeadlineExceeded { .. } => self.to_string(),
            UserError::NotFound => USER_NOT_FOUND_MESSAGE.to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UserError::Decode { .. } => "USER_INVALID_BODY",
            UserError::Validation { .. } => "USER_VALIDATION_FAILED",
            UserError::Store { .. } => "USER_STORE_ERROR",
            UserError::DeadlineExceeded { .. } => "USER_DEADLINE_EXCEEDED",
            UserError::NotFound => "USER_NOT_FOUND",
        }
    }

    fn error_severity(&self) -> ErrorSeverity {
        match self {
            UserError::Store { .. } | UserError::DeadlineExceeded { .. } => ErrorSeverity::Critical,
            UserError::Decode { .. } | UserError::Validation { .. } | UserError::NotFound => {
                ErrorSeverity::Minor
            }
        }
    }
}

impl_into_response!(UserError);

/// Convenience methods for creating common user errors
impl UserError {
    pub fn decode<S: Into<String>>(details: S) -> Self {
        Self::Decode { details: details.into() }
    }

    pub fn store(err: anyhow::Error) -> Self {
        Self::Store { message: format!("{:#}", err) }
    }
}
