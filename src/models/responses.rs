use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether an envelope carries a result or an error description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

/// Uniform wrapper for every user endpoint response.
///
/// `status` mirrors the HTTP status line so clients that only look at the body
/// still see it. `data` is the record, list, or message; for errors it is the
/// error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: Outcome,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: Outcome::Success,
            data,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::success(StatusCode::CREATED, data)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn is_success(&self) -> bool {
        self.message == Outcome::Success
    }
}

impl Envelope<String> {
    pub fn error<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status: status.as_u16(),
            message: Outcome::Error,
            data: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
