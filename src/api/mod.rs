// HTTP API: CRUD routes over the storage interface, mounted at /api/v1

mod amenities;
mod cities;
mod index;
mod place_amenities;
mod places;
mod reviews;
mod states;
mod users;

use crate::model::{ClassName, Object};
use crate::storage::{sorted_objects, Storage};
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Requests with a larger body are rejected with 413
    pub max_body_bytes: usize,

    /// Held by every mutating request from its first lookup through `save`
    writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, max_body_bytes: usize) -> Self {
        Self {
            storage,
            max_body_bytes,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Serialize a read-modify-write sequence against every other mutation
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create API router with every resource under `/api/v1`
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(index::routes())
        .merge(states::routes())
        .merge(cities::routes())
        .merge(amenities::routes())
        .merge(users::routes())
        .merge(places::routes())
        .merge(reviews::routes())
        .merge(place_amenities::routes());

    Router::new()
        .nest("/api/v1", v1)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    NotAJson,
    MissingField(&'static str),
    InvalidField(String),
    PayloadTooLarge,
    Storage(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::NotAJson => (StatusCode::BAD_REQUEST, "Not a JSON".to_string()),
            ApiError::MissingField(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing {}", field))
            }
            ApiError::InvalidField(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
            }
            ApiError::Storage(e) => {
                let cause = format!("{:#}", e);
                error!(error = %cause, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Parse a request body that must be a JSON object
fn parse_body(state: &AppState, body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.len() > state.max_body_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::NotAJson),
    }
}

/// Required string field of a request body
fn require_str(body: &Map<String, Value>, field: &'static str) -> Result<String, ApiError> {
    match body.get(field) {
        None => Err(ApiError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::InvalidField(format!("Invalid {}", field))),
    }
}

fn fetch(state: &AppState, class: ClassName, id: &str) -> Result<Object, ApiError> {
    state.storage.get(class, id).ok_or(ApiError::NotFound)
}

fn persist(state: &AppState) -> Result<(), ApiError> {
    state.storage.save().map_err(ApiError::Storage)
}

fn render(object: &Object) -> Result<Value, ApiError> {
    object
        .to_public_record()
        .map(Value::Object)
        .map_err(|e| ApiError::Storage(e.into()))
}

fn render_all<I>(objects: I) -> Result<Json<Value>, ApiError>
where
    I: IntoIterator<Item = Object>,
{
    let rendered = objects
        .into_iter()
        .map(|object| render(&object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(Value::Array(rendered)))
}

/// GET collection: every object of a class, oldest first
fn list(state: &AppState, class: ClassName) -> Result<Json<Value>, ApiError> {
    render_all(sorted_objects(state.storage.as_ref(), class))
}

/// GET one object
fn show(state: &AppState, class: ClassName, id: &str) -> Result<Json<Value>, ApiError> {
    let object = fetch(state, class, id)?;
    Ok(Json(render(&object)?))
}

/// Register a freshly built object, applying the optional fields from the
/// request body, and persist it
fn create(
    state: &AppState,
    mut object: Object,
    body: &Map<String, Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let _writes = state.lock_writes();

    object
        .apply_patch(body)
        .map_err(|e| ApiError::InvalidField(e.to_string()))?;

    state.storage.new(object.clone());
    persist(state)?;

    info!(key = %object.key(), "Object created");
    Ok((StatusCode::CREATED, Json(render(&object)?)))
}

/// PUT: patch the whitelisted fields of an existing object and persist it
fn update(
    state: &AppState,
    class: ClassName,
    id: &str,
    body: &Bytes,
) -> Result<Json<Value>, ApiError> {
    let _writes = state.lock_writes();
    let mut object = fetch(state, class, id)?;
    let body = parse_body(state, body)?;

    object
        .apply_patch(&body)
        .map_err(|e| ApiError::InvalidField(e.to_string()))?;
    object.touch();

    state.storage.new(object.clone());
    persist(state)?;

    info!(key = %object.key(), "Object updated");
    Ok(Json(render(&object)?))
}

/// DELETE: unregister and persist, answering `{}`
fn remove(state: &AppState, class: ClassName, id: &str) -> Result<Json<Value>, ApiError> {
    let _writes = state.lock_writes();
    let object = fetch(state, class, id)?;

    state.storage.delete(&object);
    persist(state)?;

    info!(key = %object.key(), "Object deleted");
    Ok(Json(Value::Object(Map::new())))
}
