use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{InsertedUser, Outcome, UserPayload, UserResponse},
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::users::list_users,
    ),
    components(
        schemas(UserPayload, UserResponse, InsertedUser, Outcome)
    ),
    tags(
        (name = "users", description = "User record management. Every response body is an envelope {status, message, data}; the documented body is the data field."),
    ),
    info(
        title = "Userbook API",
        version = "0.1.0",
        description = "CRUD service for user records backed by MongoDB"
    )
)]
pub struct ApiDoc;

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
