//! Handler tests for Tasks domain
//!
//! These tests drive the tasks router over the in-memory repository.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use database::mongodb::ObjectId;
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    handlers::router(TaskService::new(InMemoryTaskRepository::new()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn task_body(event_id: &str, time: &str) -> Value {
    json!({
        "eventId": event_id,
        "task_name": "Book venue",
        "detail": "Call the hall",
        "time": time
    })
}

async fn add(app: &Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_time_round_trips() {
    let app = app();
    let event = ObjectId::new().to_hex();
    let created = add(&app, task_body(&event, "14:30")).await;
    assert_eq!(created["time"], "14:30");
    assert_eq!(created["eventId"], event);

    let id = created["_id"].as_str().unwrap();
    let response = app
        .oneshot(empty_request("GET", &format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = json_body(response.into_body()).await;
    assert_eq!(fetched["time"], "14:30");
    assert_eq!(fetched["task_name"], "Book venue");
}

#[tokio::test]
async fn test_out_of_range_time_is_rejected() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            task_body(&ObjectId::new().to_hex(), "24:61"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
    assert!(error["details"]["time"].is_array());
}

#[tokio::test]
async fn test_list_for_event_in_time_order() {
    let app = app();
    let event = ObjectId::new().to_hex();
    add(&app, task_body(&event, "20:00")).await;
    add(&app, task_body(&event, "06:45")).await;
    add(&app, task_body(&ObjectId::new().to_hex(), "10:00")).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/?eventId={event}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks: Vec<Value> = json_body(response.into_body()).await;
    let times: Vec<&str> = tasks.iter().map(|t| t["time"].as_str().unwrap()).collect();
    assert_eq!(times, vec!["06:45", "20:00"]);

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["message"], "eventId is required");
}

#[tokio::test]
async fn test_put_updates_supplied_fields() {
    let app = app();
    let created = add(&app, task_body(&ObjectId::new().to_hex(), "09:00")).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/",
            json!({ "_id": created["_id"], "detail": "Email the hall" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Value = json_body(response.into_body()).await;
    assert_eq!(updated["detail"], "Email the hall");
    assert_eq!(updated["time"], "09:00");
    assert_eq!(updated["task_name"], "Book venue");
}

#[tokio::test]
async fn test_delete_twice_then_404() {
    let app = app();
    let created = add(&app, task_body(&ObjectId::new().to_hex(), "09:00")).await;
    let id = created["_id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/?id={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Task deleted successfully");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/?id={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("DELETE", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["message"], "Invalid Task ID");
}
