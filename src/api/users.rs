use super::{create, list, parse_body, remove, require_str, show, update, ApiError, AppState};
use crate::model::{ClassName, User};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use std::sync::Arc;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// GET /api/v1/users - passwords are never rendered
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    list(&state, ClassName::User)
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::User, &user_id)
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::User, &user_id)
}

/// POST /api/v1/users - requires `email` and `password`
async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = parse_body(&state, &body)?;
    let email = require_str(&body, "email")?;
    let password = require_str(&body, "password")?;

    create(&state, User::new(email, password).into(), &body)
}

/// PUT /api/v1/users/:user_id - `email` cannot be changed
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::User, &user_id, &body)
}
