//! HTTP handlers for `/api/bookings`

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clinic_http::error::AppError;
use serde_json::json;

use super::models::{Booking, BookingPayload};
use super::store::BookingStore;
use super::validation;

pub const NOT_FOUND_MESSAGE: &str = "Booking not found";

/// Shared state for the bookings handlers
#[derive(Clone)]
pub struct BookingsState {
    pub store: Arc<dyn BookingStore>,
    pub strict_validation: bool,
}

pub fn router(state: BookingsState) -> Router {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "bookings module is healthy"
}

async fn list_bookings(
    State(state): State<BookingsState>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .store
        .list()
        .await
        .context("error fetching bookings")?;
    Ok(Json(bookings))
}

async fn create_booking(
    State(state): State<BookingsState>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let Json(payload) = payload?;

    if state.strict_validation {
        check_labels(&payload)?;
        let now = chrono::Local::now().naive_local();
        validation::validate_schedule(payload.date, &payload.start_time, &payload.end_time, now)
            .map_err(|e| AppError::validation(vec![json!({ "rule": "schedule" })], e.to_string()))?;
    }

    let id = state
        .store
        .create(&payload)
        .await
        .context("error inserting booking")?;
    tracing::info!(booking_id = id, "booking created");

    Ok((StatusCode::CREATED, "Booking inserted successfully"))
}

async fn get_booking(
    State(state): State<BookingsState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;

    state
        .store
        .get(id)
        .await
        .context("error fetching booking")?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))
}

async fn update_booking(
    State(state): State<BookingsState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    if state.strict_validation {
        check_labels(&payload)?;
        validation::validate_time_order(&payload.start_time, &payload.end_time)
            .map_err(|e| AppError::validation(vec![json!({ "rule": "schedule" })], e.to_string()))?;
    }

    let updated = state
        .store
        .update(id, &payload)
        .await
        .context("error updating booking")?;
    if !updated {
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    }

    tracing::info!(booking_id = id, "booking updated");
    Ok("Booking updated successfully")
}

async fn delete_booking(
    State(state): State<BookingsState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;

    let deleted = state
        .store
        .delete(id)
        .await
        .context("error deleting booking")?;
    if !deleted {
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    }

    tracing::info!(booking_id = id, "booking deleted");
    Ok("Booking deleted successfully")
}

fn check_labels(payload: &BookingPayload) -> Result<(), AppError> {
    validation::validate_labels(&payload.service, &payload.doctor)
        .map(|_| ())
        .map_err(|e| {
            AppError::validation(
                vec![json!({ "field": e.kind, "error": "unknown", "value": e.value })],
                e.to_string(),
            )
        })
}
