//! Text renderings of the booking list and detail pages, plus the detail
//! page's fetch and delete flows.

use clinic_app::Booking;
use thiserror::Error;

use crate::api::{BookingsClient, ClientError};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this booking?";
pub const DELETED_MESSAGE: &str = "Booking deleted successfully!";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Booking not found")]
    NotFound,
    #[error("Failed to fetch booking")]
    FetchFailed(#[source] ClientError),
    #[error("Failed to delete booking.")]
    DeleteFailed(#[source] ClientError),
}

/// e.g. `A Booking on 19 October 2026 starting at 09:00`
pub fn list_line(booking: &Booking) -> String {
    format!(
        "A Booking on {} starting at {}",
        booking.date.format("%-d %B %Y"),
        booking.start_time
    )
}

/// One line per booking, prefixed with its id
pub fn render_list(bookings: &[Booking]) -> String {
    bookings
        .iter()
        .map(|booking| format!("#{:<4} {}", booking.id, list_line(booking)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_detail(booking: &Booking) -> String {
    [
        booking.doctor_name.clone(),
        format!("Service: {}", booking.service),
        booking.date.format("%a %b %d %Y").to_string(),
        format!(
            "This Booking is with {} For {} and it ends on {}.",
            booking.doctor_name, booking.service, booking.end_time
        ),
    ]
    .join("\n")
}

/// Fetch one booking for the detail page. Any unsuccessful response reads as
/// not found; only transport failures are reported as fetch failures.
pub async fn load_detail(client: &BookingsClient, id: i64) -> Result<Booking, ViewError> {
    match client.get(id).await {
        Ok(booking) => Ok(booking),
        Err(ClientError::NotFound | ClientError::Status { .. }) => Err(ViewError::NotFound),
        Err(e) => Err(ViewError::FetchFailed(e)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Ask `confirm` with [`DELETE_PROMPT`]; only an affirmative answer sends the
/// delete request.
pub async fn delete_with_confirmation<F>(
    client: &BookingsClient,
    id: i64,
    confirm: F,
) -> Result<DeleteOutcome, ViewError>
where
    F: FnOnce(&str) -> bool,
{
    if !confirm(DELETE_PROMPT) {
        return Ok(DeleteOutcome::Cancelled);
    }

    client.delete(id).await.map_err(|e| {
        tracing::error!(id, error = %e, "failed to delete booking");
        ViewError::DeleteFailed(e)
    })?;
    Ok(DeleteOutcome::Deleted)
}
