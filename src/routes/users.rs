use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    errors::UserError,
    models::{Envelope, InsertedUser, User, UserPayload, UserResponse},
    pipeline::{within_deadline, UserId, ValidJson},
    AppState,
};

pub const USER_DELETED_MESSAGE: &str = "User successfully deleted!";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", post(create_user))
        .route(
            "/user/{userId}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users", get(list_users))
}

#[utoipa::path(
    post,
    path = "/user",
    tag = "users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created; data holds the generated id", body = InsertedUser),
        (status = 400, description = "Malformed body or missing required field"),
        (status = 500, description = "Store failure or deadline exceeded")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UserPayload>,
) -> Result<Envelope<InsertedUser>, UserError> {
    let user = User::new(payload);
    let id = within_deadline(state.config.request_timeout, state.store.insert_user(&user)).await?;

    tracing::info!(user_id = %id, "Created user");
    Ok(Envelope::created(InsertedUser {
        inserted_id: id.to_hex(),
    }))
}

#[utoipa::path(
    get,
    path = "/user/{userId}",
    tag = "users",
    params(
        ("userId" = String, Path, description = "Hex document id")
    ),
    responses(
        (status = 200, description = "The user, or an empty record when nothing matched", body = UserResponse),
        (status = 500, description = "Store failure or deadline exceeded")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Envelope<UserResponse>, UserError> {
    let user = within_deadline(state.config.request_timeout, state.store.find_user(id)).await?;

    if user.is_none() {
        tracing::debug!(user_id = %id, "No user matched, returning empty record");
    }
    Ok(Envelope::ok(user.map(UserResponse::from).unwrap_or_default()))
}

#[utoipa::path(
    put,
    path = "/user/{userId}",
    tag = "users",
    params(
        ("userId" = String, Path, description = "Hex document id")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "The updated user, or an empty record when nothing matched", body = UserResponse),
        (status = 400, description = "Malformed body or missing required field"),
        (status = 500, description = "Store failure or deadline exceeded")
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
    ValidJson(payload): ValidJson<UserPayload>,
) -> Result<Envelope<UserResponse>, UserError> {
    let store = &state.store;

    // One deadline covers both the update and the re-fetch
    let updated = within_deadline(state.config.request_timeout, async {
        let matched = store.update_user(id, &payload).await?;
        if matched == 1 {
            store.find_user(id).await
        } else {
            Ok(None)
        }
    })
    .await?;

    match &updated {
        Some(_) => tracing::info!(user_id = %id, "Updated user"),
        None => tracing::debug!(user_id = %id, "No user matched update"),
    }
    Ok(Envelope::ok(updated.map(UserResponse::from).unwrap_or_default()))
}

#[utoipa::path(
    delete,
    path = "/user/{userId}",
    tag = "users",
    params(
        ("userId" = String, Path, description = "Hex document id")
    ),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 404, description = "No user with that id"),
        (status = 500, description = "Store failure or deadline exceeded")
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Envelope<String>, UserError> {
    let deleted = within_deadline(state.config.request_timeout, state.store.delete_user(id)).await?;

    if deleted < 1 {
        return Err(UserError::NotFound);
    }

    tracing::info!(user_id = %id, "Deleted user");
    Ok(Envelope::ok(USER_DELETED_MESSAGE.to_string()))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Every stored user, in store order", body = Vec<UserResponse>),
        (status = 500, description = "Query failure or deadline exceeded")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<UserResponse>>, UserError> {
    let users = within_deadline(state.config.request_timeout, state.store.list_users()).await?;

    Ok(Envelope::ok(users.into_iter().map(UserResponse::from).collect()))
}
