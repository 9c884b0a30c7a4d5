//! Booking forms: the new-appointment form with its scheduling checks and the
//! edit form, which replaces a record as-is.

use chrono::{NaiveDate, NaiveDateTime};
use clinic_app::{
    validation::{self, ScheduleError},
    Booking, BookingPayload, Doctor, Service,
};
use thiserror::Error;

use crate::api::{BookingsClient, ClientError};

pub const ADDED_MESSAGE: &str = "Appointment added successfully!";
pub const BOOKED_MESSAGE: &str = "Appointment booked successfully!";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save appointment. Please try again.";
pub const UPDATED_MESSAGE: &str = "Appointment updated successfully!";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update appointment. Please try again.";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please choose a date.")]
    MissingDate,

    #[error(transparent)]
    Invalid(#[from] ScheduleError),

    #[error("{message}")]
    Submit {
        message: &'static str,
        #[source]
        source: ClientError,
    },
}

/// Form for a new appointment.
///
/// `is_add_form` selects the list-page variant, which only changes the
/// confirmation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookingForm {
    pub date: Option<NaiveDate>,
    pub service: Service,
    pub doctor: Doctor,
    pub start_time: String,
    pub end_time: String,
    pub is_add_form: bool,
}

impl NewBookingForm {
    pub fn new(is_add_form: bool) -> Self {
        Self {
            date: None,
            service: Service::default(),
            doctor: Doctor::default(),
            start_time: String::new(),
            end_time: String::new(),
            is_add_form,
        }
    }

    /// Run the scheduling checks against `now` (local wall-clock time)
    pub fn validate(&self, now: NaiveDateTime) -> Result<BookingPayload, FormError> {
        let date = self.date.ok_or(FormError::MissingDate)?;
        validation::validate_schedule(date, &self.start_time, &self.end_time, now)?;

        Ok(BookingPayload {
            service: self.service.to_string(),
            doctor: self.doctor.to_string(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            date,
        })
    }

    /// Validate, then create the booking. Nothing is sent if a check fails.
    /// On success the form is cleared and the confirmation text returned.
    pub async fn submit(
        &mut self,
        client: &BookingsClient,
        now: NaiveDateTime,
    ) -> Result<&'static str, FormError> {
        let payload = self.validate(now)?;

        client.create(&payload).await.map_err(|source| {
            tracing::error!(error = %source, "failed to save appointment");
            FormError::Submit {
                message: SAVE_FAILED_MESSAGE,
                source,
            }
        })?;

        self.reset();
        Ok(if self.is_add_form {
            ADDED_MESSAGE
        } else {
            BOOKED_MESSAGE
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.is_add_form);
    }
}

impl Default for NewBookingForm {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Form pre-filled from an existing booking; submitting replaces every field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBookingForm {
    pub id: i64,
    pub date: NaiveDate,
    pub service: String,
    pub doctor: String,
    pub start_time: String,
    pub end_time: String,
}

impl EditBookingForm {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            date: booking.date,
            service: booking.service.clone(),
            doctor: booking.doctor_name.clone(),
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
        }
    }

    pub fn payload(&self) -> BookingPayload {
        BookingPayload {
            service: self.service.clone(),
            doctor: self.doctor.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            date: self.date,
        }
    }

    pub async fn submit(&self, client: &BookingsClient) -> Result<&'static str, FormError> {
        client
            .update(self.id, &self.payload())
            .await
            .map_err(|source| {
                tracing::error!(id = self.id, error = %source, "failed to update appointment");
                FormError::Submit {
                    message: UPDATE_FAILED_MESSAGE,
                    source,
                }
            })?;
        Ok(UPDATED_MESSAGE)
    }
}
