//! Shared request pipeline for user operations.
//!
//! Every operation runs the same sequence: parse the body, validate it,
//! execute against the store under a deadline, and wrap the outcome in an
//! envelope. `ValidJson` covers the first two steps as an extractor,
//! `within_deadline` covers the third, and handlers return
//! `Result<Envelope<T>, UserError>` so both arms render as envelopes.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::errors::UserError;
use crate::models::{parse_user_id, Validate};

/// Document id taken from the `{userId}` path segment.
///
/// Never rejects: a segment that is not a valid id, including one that is
/// not even valid UTF-8, becomes the nil id and so matches no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub ObjectId);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let id = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => parse_user_id(&raw),
            Err(e) => {
                tracing::debug!("Unreadable user id in path, treating as unknown: {}", e.body_text());
                parse_user_id("")
            }
        };
        Ok(Self(id))
    }
}

/// JSON body that has been decoded and validated.
///
/// Unlike `axum::Json` this ignores the request's Content-Type and rejects
/// with an error envelope instead of a plain-text body.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = UserError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| UserError::decode(e.body_text()))?;

        let value: T = serde_json::from_slice(&body).map_err(|e| UserError::decode(e.to_string()))?;
        value
            .validate()
            .map_err(|violations| UserError::Validation { violations })?;

        Ok(Self(value))
    }
}

/// Runs a store interaction, failing it once `deadline` has elapsed.
///
/// The future is dropped on expiry, which releases whatever it held.
pub async fn within_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, UserError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match timeout(deadline, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(UserError::store(e)),
        Err(_) => Err(UserError::DeadlineExceeded { timeout: deadline }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserPayload;
    use axum::body::Body;

    async fn extract(body: &'static str) -> Result<UserPayload, UserError> {
        let req = Request::builder()
            .method("POST")
            .uri("/user")
            .body(Body::from(body))
            .unwrap();
        <ValidJson<UserPayload> as FromRequest<()>>::from_request(req, &())
            .await
            .map(|v| v.0)
    }

    #[tokio::test]
    async fn test_valid_body_without_content_type() {
        let payload = extract(r#"{"name":"Ann","location":"NY","title":"Eng"}"#)
            .await
            .unwrap();
        assert_eq!(payload.name, "Ann");
    }

    #[tokio::test]
    async fn test_empty_body_is_a_decode_error() {
        assert!(matches!(extract("").await, Err(UserError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        match extract(r#"{"name":"Ann","location":"NY"}"#).await {
            Err(UserError::Validation { violations }) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "title");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    async fn extract_id(uri: &str) -> ObjectId {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let app = axum::Router::new().route(
            "/user/{userId}",
            axum::routing::get(|UserId(id): UserId| async move { id.to_hex() }),
        );
        let response = tower::util::ServiceExt::oneshot(app, req).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        ObjectId::parse_str(std::str::from_utf8(&body).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_user_id_from_path() {
        let id = ObjectId::new();
        assert_eq!(extract_id(&format!("/user/{}", id)).await, id);
        assert_eq!(extract_id("/user/short").await, ObjectId::from_bytes([0; 12]));
        assert_eq!(extract_id("/user/%FF").await, ObjectId::from_bytes([0; 12]));
    }

    #[tokio::test]
    async fn test_deadline_passes_through_results() {
        let value = within_deadline(Duration::from_secs(1), async { Ok::<_, anyhow::Error>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = within_deadline(Duration::from_secs(1), async {
            Err::<(), _>(anyhow::anyhow!("connection reset"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, UserError::Store { ref message } if message == "connection reset"));
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let err = within_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, anyhow::Error>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, UserError::DeadlineExceeded { .. }));
    }
}
