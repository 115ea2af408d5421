use super::{
    create, fetch, parse_body, remove, render_all, require_str, show, update, ApiError, AppState,
};
use crate::model::{City, ClassName, Object};
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
            "/states/:state_id/cities",
            get(list_cities_of_state).post(create_city),
        )
        .route(
            "/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
}

/// GET /api/v1/states/:state_id/cities
async fn list_cities_of_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let parent = fetch(&state, ClassName::State, &state_id)?;
    let cities = state.storage.cities_of(parent.id());

    render_all(cities.into_iter().map(Object::City))
}

/// GET /api/v1/cities/:city_id
async fn get_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::City, &city_id)
}

/// DELETE /api/v1/cities/:city_id
async fn delete_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::City, &city_id)
}

/// POST /api/v1/states/:state_id/cities - requires `name`
///
/// The body is checked before the State lookup.
async fn create_city(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = parse_body(&state, &body)?;
    let name = require_str(&body, "name")?;
    let parent = fetch(&state, ClassName::State, &state_id)?;

    create(&state, City::new(name, parent.id()).into(), &body)
}

/// PUT /api/v1/cities/:city_id - only `name` is writable; `state_id` is kept
async fn update_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::City, &city_id, &body)
}
