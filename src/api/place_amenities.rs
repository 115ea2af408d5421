use super::{fetch, persist, render, render_all, ApiError, AppState};
use crate::model::{ClassName, Object, Place};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/places/:place_id/amenities", get(list_amenities_of_place))
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(link_amenity).delete(unlink_amenity),
        )
}

fn fetch_place(state: &AppState, place_id: &str) -> Result<Place, ApiError> {
    match fetch(state, ClassName::Place, place_id)? {
        Object::Place(place) => Ok(place),
        _ => Err(ApiError::NotFound),
    }
}

/// GET /api/v1/places/:place_id/amenities
async fn list_amenities_of_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let place = fetch_place(&state, &place_id)?;
    let amenities = state.storage.amenities_of(&place);

    render_all(amenities.into_iter().map(Object::Amenity))
}

/// POST /api/v1/places/:place_id/amenities/:amenity_id
///
/// 201 with the Amenity when newly linked, 200 when it already was.
async fn link_amenity(
    State(state): State<Arc<AppState>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let _writes = state.lock_writes();
    let mut place = fetch_place(&state, &place_id)?;
    let amenity = fetch(&state, ClassName::Amenity, &amenity_id)?;

    if !place.link_amenity(amenity.id()) {
        return Ok((StatusCode::OK, Json(render(&amenity)?)));
    }

    place.base.touch();
    state.storage.new(Object::Place(place));
    persist(&state)?;

    info!(place_id = %place_id, amenity_id = %amenity_id, "Amenity linked");
    Ok((StatusCode::CREATED, Json(render(&amenity)?)))
}

/// DELETE /api/v1/places/:place_id/amenities/:amenity_id
///
/// 404 when the Amenity exists but is not linked to the Place.
async fn unlink_amenity(
    State(state): State<Arc<AppState>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let _writes = state.lock_writes();
    let mut place = fetch_place(&state, &place_id)?;
    let amenity = fetch(&state, ClassName::Amenity, &amenity_id)?;

    if !place.unlink_amenity(amenity.id()) {
        return Err(ApiError::NotFound);
    }

    place.base.touch();
    state.storage.new(Object::Place(place));
    persist(&state)?;

    info!(place_id = %place_id, amenity_id = %amenity_id, "Amenity unlinked");
    Ok(Json(Value::Object(Map::new())))
}
