pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod swagger;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use db::UserStore;
use errors::{ApiError, AppError};
use models::Envelope;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Config,
}

/// Static demo payload served at `/`
pub async fn greeting() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Hello, World!"}))
}

/// Health check endpoint for monitoring; pings the store
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<String>, ApiError> {
    pipeline::within_deadline(state.config.request_timeout, state.store.ping())
        .await
        .map_err(|e| ApiError::service_unavailable(e.user_message()))?;
    Ok(Envelope::ok("ok".to_string()))
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Assembles every route of the service around the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_check))
        .merge(routes::users::router())
        .merge(swagger::create_swagger_router())
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
