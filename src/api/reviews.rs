use super::{
    create, fetch, parse_body, remove, render_all, require_str, show, update, ApiError, AppState,
};
use crate::model::{ClassName, Object, Review};
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
            "/places/:place_id/reviews",
            get(list_reviews_of_place).post(create_review),
        )
        .route(
            "/reviews/:review_id",
            get(get_review).put(update_review).delete(delete_review),
        )
}

/// GET /api/v1/places/:place_id/reviews
async fn list_reviews_of_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let place = fetch(&state, ClassName::Place, &place_id)?;
    let reviews = state.storage.reviews_of(place.id());

    render_all(reviews.into_iter().map(Object::Review))
}

async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    show(&state, ClassName::Review, &review_id)
}

async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    remove(&state, ClassName::Review, &review_id)
}

/// POST /api/v1/places/:place_id/reviews - requires `user_id` and `text`
///
/// Check order: Place exists, body is JSON, `user_id` given, User exists,
/// `text` given.
async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let place = fetch(&state, ClassName::Place, &place_id)?;
    let body = parse_body(&state, &body)?;
    let user_id = require_str(&body, "user_id")?;
    let user = fetch(&state, ClassName::User, &user_id)?;
    let text = require_str(&body, "text")?;

    create(&state, Review::new(text, place.id(), user.id()).into(), &body)
}

/// PUT /api/v1/reviews/:review_id - only `text` is writable
async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    update(&state, ClassName::Review, &review_id, &body)
}
