use super::{create, list, parse_body, remove, require_str, show, update, ApiError, AppState};
use crate::model::{self, ClassName};
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
        .route("/states", get(list_states).post(create_state))
        .route(
            "/states/:state_id",
            get(get_state).put(update_state).delete(delete_state),
        )
}

/// GET /api/v1/states
async fn list_states(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    list(&state, ClassName::State)
}

/// GET /api/v1/states/:state_id
async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::State, &state_id)
}

/// DELETE /api/v1/states/:state_id
///
/// Cities of the State are left in place.
async fn delete_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::State, &state_id)
}

/// POST /api/v1/states - requires `name`
async fn create_state(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = parse_body(&state, &body)?;
    let name = require_str(&body, "name")?;

    create(&state, model::State::new(name).into(), &body)
}

/// PUT /api/v1/states/:state_id
async fn update_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::State, &state_id, &body)
}
