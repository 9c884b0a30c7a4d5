//! Booking client: the HTTP API wrapper plus the form and view logic of the
//! booking frontend.

pub mod api;
pub mod form;
pub mod views;

pub use api::{BookingsClient, ClientError, DEFAULT_API_URL};
pub use form::{EditBookingForm, FormError, NewBookingForm};
