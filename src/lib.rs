//! Clinic appointment booking service.
//!
//! The server binary wires these modules into the HTTP facade; the client
//! crates reuse the booking models and scheduling rules.

pub mod modules;

pub use modules::bookings::models::{Booking, BookingPayload, Doctor, Service};
pub use modules::bookings::store::{BookingStore, MemoryBookingStore, MySqlBookingStore};
pub use modules::bookings::validation;
pub use modules::register_all;
