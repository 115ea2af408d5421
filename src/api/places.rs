use super::{
    create, fetch, parse_body, remove, render_all, require_str, show, update, ApiError, AppState,
};
use crate::model::{ClassName, Object, Place};
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
        .route(
            "/cities/:city_id/places",
            get(list_places_of_city).post(create_place),
        )
        .route(
            "/places/:place_id",
            get(get_place).put(update_place).delete(delete_place),
        )
}

/// GET /api/v1/cities/:city_id/places
async fn list_places_of_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let city = fetch(&state, ClassName::City, &city_id)?;
    let places = state.storage.places_of(city.id());

    render_all(places.into_iter().map(Object::Place))
}

async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::Place, &place_id)
}

/// DELETE /api/v1/places/:place_id - reviews of the Place are left in place
async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::Place, &place_id)
}

/// POST /api/v1/cities/:city_id/places - requires `user_id` and `name`
///
/// Check order: City exists, body is JSON, `user_id` given, User exists,
/// `name` given.
async fn create_place(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let city = fetch(&state, ClassName::City, &city_id)?;
    let body = parse_body(&state, &body)?;
    let user_id = require_str(&body, "user_id")?;
    let user = fetch(&state, ClassName::User, &user_id)?;
    let name = require_str(&body, "name")?;

    create(&state, Place::new(name, city.id(), user.id()).into(), &body)
}

/// PUT /api/v1/places/:place_id - `user_id` and `city_id` are kept
async fn update_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::Place, &place_id, &body)
}
