use super::AppState;
use crate::model::ClassName;
use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(status))
        .route("/stats", get(stats))
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// Object counts per resource
#[derive(Serialize)]
struct StatsResponse {
    amenities: usize,
    cities: usize,
    places: usize,
    reviews: usize,
    states: usize,
    users: usize,
}

/// GET /api/v1/status
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "OK" })
}

/// GET /api/v1/stats
async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let count = |class| state.storage.count(Some(class));

    Json(StatsResponse {
        amenities: count(ClassName::Amenity),
        cities: count(ClassName::City),
        places: count(ClassName::Place),
        reviews: count(ClassName::Review),
        states: count(ClassName::State),
        users: count(ClassName::User),
    })
}
