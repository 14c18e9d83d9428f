use axum::http::StatusCode;
use thiserror::Error;

pub mod user;

pub use user::UserError;

/// How loudly an error is logged when it is turned into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The service itself is failing (store down, deadline exceeded)
    Critical,
    /// Worth an operator's attention but not a service fault
    Important,
    /// Caused by the client; logged for debugging only
    Minor,
}

/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Text placed in the `data` field of the error envelope
    fn user_message(&self) -> String;

    /// Stable machine-readable code, used in logs
    fn error_code(&self) -> &'static str;

    fn error_severity(&self) -> ErrorSeverity;
}

/// Macro to implement IntoResponse for all AppError types
/// Every error leaves the service as an error envelope
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                use crate::errors::{AppError, ErrorSeverity};
                use crate::models::Envelope;

                let status = self.status_code();
                match self.error_severity() {
                    ErrorSeverity::Critical => {
                        tracing::error!(code = self.error_code(), status = status.as_u16(), "{}", self)
                    }
                    ErrorSeverity::Important => {
                        tracing::warn!(code = self.error_code(), status = status.as_u16(), "{}", self)
                    }
                    ErrorSeverity::Minor => {
                        tracing::debug!(code = self.error_code(), status = status.as_u16(), "{}", self)
                    }
                }

                axum::response::IntoResponse::into_response(Envelope::error(status, self.user_message()))
            }
        }
    };
}

pub(crate) use impl_into_response;

/// Generic API error for cases where specific error types don't apply
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },
}

impl AppError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::ServiceUnavailable { message } => message.clone(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    fn error_severity(&self) -> ErrorSeverity {
        match self {
            ApiError::ServiceUnavailable { .. } => ErrorSeverity::Critical,
            ApiError::NotFound | ApiError::MethodNotAllowed => ErrorSeverity::Minor,
        }
    }
}

impl_into_response!(ApiError);

impl ApiError {
    pub fn service_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ServiceUnavailable { message: message.into() }
    }
}
