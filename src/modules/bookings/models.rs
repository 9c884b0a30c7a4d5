use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A persisted appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    /// Server-assigned identifier
    pub id: i64,
    /// Service label, e.g. "Checkup"
    pub service: String,
    /// Doctor label, e.g. "Dr. Jane Smith"
    pub doctor_name: String,
    /// Start of the slot, `HH:MM`
    pub start_time: String,
    /// End of the slot, `HH:MM`
    pub end_time: String,
    /// Day of the appointment
    pub date: NaiveDate,
}

impl Booking {
    pub fn from_payload(id: i64, payload: &BookingPayload) -> Self {
        Self {
            id,
            service: payload.service.clone(),
            doctor_name: payload.doctor.clone(),
            start_time: payload.start_time.clone(),
            end_time: payload.end_time.clone(),
            date: payload.date,
        }
    }
}

/// Request body for creating or replacing a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub service: String,
    pub doctor: String,
    pub start_time: String,
    pub end_time: String,
    pub date: NaiveDate,
}

impl From<&Booking> for BookingPayload {
    fn from(booking: &Booking) -> Self {
        Self {
            service: booking.service.clone(),
            doctor: booking.doctor_name.clone(),
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            date: booking.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Services offered by the clinic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Service {
    #[default]
    Consultation,
    Checkup,
    Surgery,
    Therapy,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Consultation,
        Service::Checkup,
        Service::Surgery,
        Service::Therapy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Service::Consultation => "Consultation",
            Service::Checkup => "Checkup",
            Service::Surgery => "Surgery",
            Service::Therapy => "Therapy",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Service {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.label() == value)
            .ok_or_else(|| UnknownLabel {
                kind: "service",
                value: value.to_string(),
            })
    }
}

/// Doctors taking appointments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Doctor {
    #[default]
    JohnDoe,
    JaneSmith,
    AlbertBrown,
    NancyWhite,
}

impl Doctor {
    pub const ALL: [Doctor; 4] = [
        Doctor::JohnDoe,
        Doctor::JaneSmith,
        Doctor::AlbertBrown,
        Doctor::NancyWhite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Doctor::JohnDoe => "Dr. John Doe",
            Doctor::JaneSmith => "Dr. Jane Smith",
            Doctor::AlbertBrown => "Dr. Albert Brown",
            Doctor::NancyWhite => "Dr. Nancy White",
        }
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Doctor {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Doctor::ALL
            .into_iter()
            .find(|doctor| doctor.label() == value)
            .ok_or_else(|| UnknownLabel {
                kind: "doctor",
                value: value.to_string(),
            })
    }
}
