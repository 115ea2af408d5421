// Integration tests for the /api/v1 routes

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use hbnb::api::{create_router, AppState};
use hbnb::model::ClassName;
use hbnb::storage::{FileStorage, Storage};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn create_test_app(temp_dir: &TempDir) -> (Router, Arc<FileStorage>) {
    let storage = Arc::new(FileStorage::with_path(temp_dir.path().join("file.json")));
    let app = create_router(AppState::new(storage.clone(), 1_048_576));
    (app, storage)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    send_raw(app, method, uri, body).await
}

async fn create(app: &Router, uri: &str, body: Value) -> String {
    let (status, created) = send(app, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {} -> {}", uri, created);
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/api/v1/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));
}

#[tokio::test]
async fn test_stats_counts_objects() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;
    create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Ogden"})).await;
    create(&app, "/api/v1/amenities", json!({"name": "Wifi"})).await;

    let (status, body) = send(&app, "GET", "/api/v1/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"amenities": 1, "cities": 2, "places": 0, "reviews": 0, "states": 1, "users": 0})
    );
}

#[tokio::test]
async fn test_state_crud() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, created) =
        send(&app, "POST", "/api/v1/states", Some(json!({"name": "California"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], json!("California"));
    assert_eq!(created["__class__"], json!("State"));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/states/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, list) = send(&app, "GET", "/api/v1/states", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/states/{}", id),
        Some(json!({"name": "Cali", "id": "hijack", "created_at": "2000-01-01T00:00:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Cali"));
    assert_eq!(updated["id"], json!(id));
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], Value::Null);

    let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/states/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({}));

    let (status, body) = send(&app, "GET", &format!("/api/v1/states/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_create_validation() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, body) = send_raw(&app, "POST", "/api/v1/states", Body::from("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Not a JSON"}));

    let (status, body) = send(&app, "POST", "/api/v1/states", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Not a JSON"}));

    let (status, body) = send(&app, "POST", "/api/v1/states", Some(json!({"nom": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing name"}));

    let (status, body) = send(&app, "POST", "/api/v1/amenities", Some(json!({"name": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid name"}));
}

#[tokio::test]
async fn test_update_missing_object_is_404_before_body_check() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, _) =
        send_raw(&app, "PUT", "/api/v1/amenities/nope", Body::from("not json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create(&app, "/api/v1/amenities", json!({"name": "Pool"})).await;
    let (status, body) = send_raw(
        &app,
        "PUT",
        &format!("/api/v1/amenities/{}", id),
        Body::from("not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Not a JSON"}));
}

#[tokio::test]
async fn test_update_rejects_wrong_type() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let id = create(&app, "/api/v1/states", json!({"name": "Ohio"})).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/states/{}", id),
        Some(json!({"name": 12})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cities_of_state() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let utah = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let nevada = create(&app, "/api/v1/states", json!({"name": "Nevada"})).await;

    let (status, city) = send(
        &app,
        "POST",
        &format!("/api/v1/states/{}/cities", utah),
        Some(json!({"name": "Provo", "state_id": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(city["state_id"], json!(utah));
    create(&app, &format!("/api/v1/states/{}/cities", nevada), json!({"name": "Reno"})).await;

    let (status, list) = send(&app, "GET", &format!("/api/v1/states/{}/cities", utah), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], json!("Provo"));

    let (status, _) = send(&app, "GET", "/api/v1/states/nope/cities", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_city_checks_body_before_state() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, body) = send(&app, "POST", "/api/v1/states/nope/cities", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing name"}));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/states/nope/cities",
        Some(json!({"name": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_city_keeps_state_id() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/cities/{}", city_id),
        Some(json!({"name": "Orem", "state_id": "other"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Orem"));
    assert_eq!(updated["state_id"], json!(state_id));
}

#[tokio::test]
async fn test_delete_state_keeps_cities() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;

    send(&app, "DELETE", &format!("/api/v1/states/{}", state_id), None).await;

    let (status, _) = send(&app, "GET", &format!("/api/v1/cities/{}", city_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_users_hide_password() {
    let temp_dir = TempDir::new().unwrap();
    let (app, storage) = create_test_app(&temp_dir);

    let (status, body) = send(&app, "POST", "/api/v1/users", Some(json!({"email": "a@b.c"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing password"}));

    let (status, body) = send(&app, "POST", "/api/v1/users", Some(json!({"password": "pw"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing email"}));

    let (status, user) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(json!({"email": "a@b.c", "password": "pw", "first_name": "Betty"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["first_name"], json!("Betty"));
    assert!(user.get("password").is_none());
    let id = user["id"].as_str().unwrap().to_string();

    let (_, list) = send(&app, "GET", "/api/v1/users", None).await;
    assert!(list[0].get("password").is_none());

    // Persisted record keeps the password
    let stored = storage.get(ClassName::User, &id).unwrap();
    assert_eq!(stored.to_record().unwrap()["password"], json!("pw"));
}

#[tokio::test]
async fn test_update_user_email_is_immutable() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let id = create(&app, "/api/v1/users", json!({"email": "a@b.c", "password": "pw"})).await;

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{}", id),
        Some(json!({"email": "x@y.z", "last_name": "Holberton"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], json!("a@b.c"));
    assert_eq!(updated["last_name"], json!("Holberton"));
}

#[tokio::test]
async fn test_create_place_check_order() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;
    let user_id = create(&app, "/api/v1/users", json!({"email": "a@b.c", "password": "pw"})).await;
    let uri = format!("/api/v1/cities/{}/places", city_id);

    let (status, _) = send(&app, "POST", "/api/v1/cities/nope/places", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", &uri, Some(json!({"name": "Loft"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing user_id"}));

    let (status, _) =
        send(&app, "POST", &uri, Some(json!({"user_id": "nope", "name": "Loft"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", &uri, Some(json!({"user_id": user_id}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing name"}));

    let (status, place) = send(
        &app,
        "POST",
        &uri,
        Some(json!({"user_id": user_id, "name": "Loft", "max_guest": 4, "latitude": 40.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(place["city_id"], json!(city_id));
    assert_eq!(place["user_id"], json!(user_id));
    assert_eq!(place["max_guest"], json!(4));
    assert_eq!(place["latitude"], json!(40.5));
    assert_eq!(place["number_rooms"], json!(0));

    let (status, list) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reviews_of_place() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;
    let user_id = create(&app, "/api/v1/users", json!({"email": "a@b.c", "password": "pw"})).await;
    let place_id = create(
        &app,
        &format!("/api/v1/cities/{}/places", city_id),
        json!({"user_id": user_id, "name": "Loft"}),
    )
    .await;
    let uri = format!("/api/v1/places/{}/reviews", place_id);

    let (status, body) = send(&app, "POST", &uri, Some(json!({"user_id": user_id}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing text"}));

    let (status, _) = send(&app, "POST", "/api/v1/places/nope/reviews", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let review_id = create(&app, &uri, json!({"user_id": user_id, "text": "Cozy"})).await;

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/reviews/{}", review_id),
        Some(json!({"text": "Very cozy", "place_id": "other", "user_id": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["text"], json!("Very cozy"));
    assert_eq!(updated["place_id"], json!(place_id));
    assert_eq!(updated["user_id"], json!(user_id));

    let (_, list) = send(&app, "GET", &uri, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/reviews/{}", review_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, "GET", &uri, None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_place_amenity_links() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;
    let user_id = create(&app, "/api/v1/users", json!({"email": "a@b.c", "password": "pw"})).await;
    let place_id = create(
        &app,
        &format!("/api/v1/cities/{}/places", city_id),
        json!({"user_id": user_id, "name": "Loft"}),
    )
    .await;
    let amenity_id = create(&app, "/api/v1/amenities", json!({"name": "Wifi"})).await;
    let link = format!("/api/v1/places/{}/amenities/{}", place_id, amenity_id);

    let (status, amenity) = send(&app, "POST", &link, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(amenity["id"], json!(amenity_id));

    let (status, _) = send(&app, "POST", &link, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, "GET", &format!("/api/v1/places/{}/amenities", place_id), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], json!("Wifi"));

    let (status, body) = send(&app, "DELETE", &link, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _) = send(&app, "DELETE", &link, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/places/{}/amenities/nope", place_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_changes_are_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let kept = create(&app, "/api/v1/states", json!({"name": "Kept"})).await;
    let gone = create(&app, "/api/v1/states", json!({"name": "Gone"})).await;
    send(&app, "DELETE", &format!("/api/v1/states/{}", gone), None).await;

    let restarted = FileStorage::with_path(temp_dir.path().join("file.json"));
    restarted.reload();

    assert!(restarted.get(ClassName::State, &kept).is_some());
    assert!(restarted.get(ClassName::State, &gone).is_none());
}

#[tokio::test]
async fn test_save_failure_is_500() {
    let temp_dir = TempDir::new().unwrap();
    let blocked = temp_dir.path().join("blocked");
    std::fs::create_dir(&blocked).unwrap();
    std::fs::write(blocked.join("occupant"), b"x").unwrap();
    let storage = Arc::new(FileStorage::with_path(&blocked));
    let app = create_router(AppState::new(storage, 1_048_576));

    let (status, body) = send(&app, "POST", "/api/v1/states", Some(json!({"name": "Lost"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_body_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::with_path(temp_dir.path().join("file.json")));
    let app = create_router(AppState::new(storage, 64));

    let big = json!({"name": "x".repeat(100)});
    let (status, _) = send(&app, "POST", "/api/v1/states", Some(big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _) = send(&app, "POST", "/api/v1/states", Some(json!({"name": "ok"}))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/api/v1/galaxies", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_update_racing_delete_never_restores_object() {
    let temp_dir = TempDir::new().unwrap();
    let (app, storage) = create_test_app(&temp_dir);

    for round in 0..100 {
        let id = create(&app, "/api/v1/states", json!({"name": format!("s{}", round)})).await;
        let uri = format!("/api/v1/states/{}", id);

        let put = {
            let app = app.clone();
            let uri = uri.clone();
            tokio::spawn(async move {
                send(&app, "PUT", &uri, Some(json!({"name": "renamed"}))).await.0
            })
        };
        let delete = {
            let app = app.clone();
            let uri = uri.clone();
            tokio::spawn(async move { send(&app, "DELETE", &uri, None).await.0 })
        };

        let (put_status, delete_status) = (put.await.unwrap(), delete.await.unwrap());
        assert_eq!(delete_status, StatusCode::OK);
        assert!(put_status == StatusCode::OK || put_status == StatusCode::NOT_FOUND);
        assert!(
            storage.get(ClassName::State, &id).is_none(),
            "State {} is back after a successful DELETE",
            id
        );
    }

    let restarted = FileStorage::with_path(temp_dir.path().join("file.json"));
    restarted.reload();
    assert_eq!(restarted.count(Some(ClassName::State)), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_amenity_links_are_all_kept() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&temp_dir);
    let state_id = create(&app, "/api/v1/states", json!({"name": "Utah"})).await;
    let city_id =
        create(&app, &format!("/api/v1/states/{}/cities", state_id), json!({"name": "Provo"})).await;
    let user_id = create(&app, "/api/v1/users", json!({"email": "a@b.c", "password": "pw"})).await;
    let place_id = create(
        &app,
        &format!("/api/v1/cities/{}/places", city_id),
        json!({"user_id": user_id, "name": "Loft"}),
    )
    .await;

    let mut links = Vec::new();
    for i in 0..16 {
        let amenity_id = create(&app, "/api/v1/amenities", json!({"name": format!("a{}", i)})).await;
        let app = app.clone();
        let uri = format!("/api/v1/places/{}/amenities/{}", place_id, amenity_id);
        links.push(tokio::spawn(async move { send(&app, "POST", &uri, None).await.0 }));
    }
    for link in links {
        assert_eq!(link.await.unwrap(), StatusCode::CREATED);
    }

    let (_, list) = send(&app, "GET", &format!("/api/v1/places/{}/amenities", place_id), None).await;
    assert_eq!(list.as_array().unwrap().len(), 16);
}
