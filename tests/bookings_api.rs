use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Local, NaiveDate};
use clinic_app::{Booking, BookingPayload, BookingStore, MemoryBookingStore};
use clinic_kernel::{settings::Settings, ModuleRegistry};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(store: Arc<dyn BookingStore>, strict: bool) -> Router {
    let mut settings = Settings::default();
    settings.bookings.strict_validation = strict;

    let mut registry = ModuleRegistry::new();
    clinic_app::register_all(&mut registry, &settings, store);
    clinic_http::build_router(&registry, &settings)
}

fn app() -> (Router, Arc<MemoryBookingStore>) {
    let store = Arc::new(MemoryBookingStore::new());
    (app_with(store.clone(), false), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

fn checkup_payload() -> Value {
    json!({
        "service": "Checkup",
        "doctor": "Dr. Jane Smith",
        "date": tomorrow().to_string(),
        "startTime": "09:00",
        "endTime": "09:30"
    })
}

async fn list(app: &Router) -> Vec<Booking> {
    let (status, body) = send(app, "GET", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn create_then_list_contains_submitted_fields() {
    let (app, _) = app();

    let (status, body) = send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, b"Booking inserted successfully");

    let bookings = list(&app).await;
    assert_eq!(bookings.len(), 1);
    let booking = &bookings[0];
    assert_eq!(booking.service, "Checkup");
    assert_eq!(booking.doctor_name, "Dr. Jane Smith");
    assert_eq!(booking.start_time, "09:00");
    assert_eq!(booking.end_time, "09:30");
    assert_eq!(booking.date, tomorrow());
}

#[tokio::test]
async fn list_is_empty_initially() {
    let (app, _) = app();
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn get_by_id_returns_record_or_not_found() {
    let (app, _) = app();
    send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    let id = list(&app).await[0].id;

    let (status, body) = send(&app, "GET", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let booking: Booking = serde_json::from_slice(&body).unwrap();
    assert_eq!(booking.id, id);

    let (status, body) = send(&app, "GET", "/api/bookings/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["message"], "Booking not found");
    assert_eq!(error["error"]["code"], "not_found");
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let (app, store) = app();
    send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    let id = list(&app).await[0].id;

    let replacement = json!({
        "service": "Therapy",
        "doctor": "Dr. Nancy White",
        "date": "2027-01-05",
        "startTime": "14:00",
        "endTime": "15:00"
    });
    let (status, body) = send(&app, "PUT", &format!("/api/bookings/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Booking updated successfully");

    let stored = store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.service, "Therapy");
    assert_eq!(stored.doctor_name, "Dr. Nancy White");
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2027, 1, 5).unwrap());
    assert_eq!((stored.start_time.as_str(), stored.end_time.as_str()), ("14:00", "15:00"));
}

#[tokio::test]
async fn update_with_unchanged_values_succeeds() {
    let (app, _) = app();
    send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    let id = list(&app).await[0].id;

    let (status, _) = send(&app, "PUT", &format!("/api/bookings/{id}"), Some(checkup_payload())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_of_missing_id_is_not_found_and_changes_nothing() {
    let (app, _) = app();
    send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    let before = list(&app).await;

    let (status, _) = send(&app, "PUT", "/api/bookings/9999", Some(checkup_payload())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(list(&app).await, before);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (app, _) = app();
    send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    let id = list(&app).await[0].id;

    let (status, body) = send(&app, "DELETE", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Booking deleted successfully");

    let (status, _) = send(&app, "GET", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn server_accepts_arbitrary_values_by_default() {
    let (app, _) = app();
    let payload = json!({
        "service": "Astrology",
        "doctor": "Dr. Who",
        "date": "2001-01-01",
        "startTime": "18:00",
        "endTime": "08:00"
    });

    let (status, _) = send(&app, "POST", "/api/bookings", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list(&app).await[0].doctor_name, "Dr. Who");
}

#[tokio::test]
async fn malformed_requests_are_rejected_with_envelope() {
    let (app, _) = app();

    let (status, body) = send(&app, "POST", "/api/bookings", Some(json!({ "service": "Checkup" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["code"], "validation_error");

    let (status, _) = send(&app, "GET", "/api/bookings/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn strict_mode_rejects_unknown_labels_and_bad_schedules() {
    let store = Arc::new(MemoryBookingStore::new());
    let app = app_with(store.clone(), true);

    let mut unknown_doctor = checkup_payload();
    unknown_doctor["doctor"] = json!("Dr. Who");
    let (status, body) = send(&app, "POST", "/api/bookings", Some(unknown_doctor)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["details"][0]["field"], "doctor");

    let mut reversed = checkup_payload();
    reversed["endTime"] = json!("08:00");
    let (status, body) = send(&app, "POST", "/api/bookings", Some(reversed)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["message"], "End time must be after start time.");

    let mut past = checkup_payload();
    past["date"] = json!("2001-01-01");
    let (status, _) = send(&app, "POST", "/api/bookings", Some(past)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(store.list().await.unwrap().is_empty());

    let (status, _) = send(&app, "POST", "/api/bookings", Some(checkup_payload())).await;
    assert_eq!(status, StatusCode::CREATED);
}

struct BrokenStore;

#[async_trait]
impl BookingStore for BrokenStore {
    async fn list(&self) -> anyhow::Result<Vec<Booking>> {
        anyhow::bail!("connection refused")
    }

    async fn create(&self, _payload: &BookingPayload) -> anyhow::Result<i64> {
        anyhow::bail!("connection refused")
    }

    async fn get(&self, _id: i64) -> anyhow::Result<Option<Booking>> {
        anyhow::bail!("connection refused")
    }

    async fn update(&self, _id: i64, _payload: &BookingPayload) -> anyhow::Result<bool> {
        anyhow::bail!("connection refused")
    }

    async fn delete(&self, _id: i64) -> anyhow::Result<bool> {
        anyhow::bail!("connection refused")
    }
}

#[tokio::test]
async fn store_failures_map_to_internal_error() {
    let app = app_with(Arc::new(BrokenStore), false);

    for (method, uri, body) in [
        ("GET", "/api/bookings", None),
        ("POST", "/api/bookings", Some(checkup_payload())),
        ("GET", "/api/bookings/1", None),
        ("PUT", "/api/bookings/1", Some(checkup_payload())),
        ("DELETE", "/api/bookings/1", None),
    ] {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        let error: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"]["code"], "internal_error");
    }
}

#[tokio::test]
async fn openapi_document_lists_booking_paths() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/api/bookings"]["post"].is_object());
    assert!(doc["paths"]["/api/bookings/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["Booking"].is_object());
}
