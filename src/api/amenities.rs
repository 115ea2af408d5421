use super::{create, list, parse_body, remove, require_str, show, update, ApiError, AppState};
use crate::model::{Amenity, ClassName};
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
        .route("/amenities", get(list_amenities).post(create_amenity))
        .route(
            "/amenities/:amenity_id",
            get(get_amenity).put(update_amenity).delete(delete_amenity),
        )
}

async fn list_amenities(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    list(&state, ClassName::Amenity)
}

async fn get_amenity(
    State(state): State<Arc<AppState>>,
    Path(amenity_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::Amenity, &amenity_id)
}

/// DELETE /api/v1/amenities/:amenity_id
///
/// Places keep the id in `amenity_ids`; dangling links are skipped when listed.
async fn delete_amenity(
    State(state): State<Arc<AppState>>,
    Path(amenity_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::Amenity, &amenity_id)
}

/// POST /api/v1/amenities - requires `name`
async fn create_amenity(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = parse_body(&state, &body)?;
    let name = require_str(&body, "name")?;

    create(&state, Amenity::new(name).into(), &body)
}

async fn update_amenity(
    State(state): State<Arc<AppState>>,
    Path(amenity_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::Amenity, &amenity_id, &body)
}
