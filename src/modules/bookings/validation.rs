//! Scheduling rules a new booking must satisfy.
//!
//! The booking form applies these before submitting; the server only applies
//! them when strict validation is enabled.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::models::{Doctor, Service, UnknownLabel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("You cannot book an appointment on a date that has already passed.")]
    DateInPast,
    #[error("You cannot book an appointment in the past.")]
    StartInPast,
    #[error("End time must be after start time.")]
    EndNotAfterStart,
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Parse `HH:MM`, tolerating a trailing `:SS`
pub fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(value.to_string()))
}

/// Check a new booking against `now`, first failing rule wins:
/// the date is not before today, a booking today starts after `now`,
/// and the end comes strictly after the start.
pub fn validate_schedule(
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    now: NaiveDateTime,
) -> Result<(), ScheduleError> {
    if date < now.date() {
        return Err(ScheduleError::DateInPast);
    }

    let start = date.and_time(parse_time(start_time)?);
    if date == now.date() && start <= now {
        return Err(ScheduleError::StartInPast);
    }

    let end = date.and_time(parse_time(end_time)?);
    if end <= start {
        return Err(ScheduleError::EndNotAfterStart);
    }

    Ok(())
}

/// End strictly after start, on the same day
pub fn validate_time_order(start_time: &str, end_time: &str) -> Result<(), ScheduleError> {
    if parse_time(end_time)? <= parse_time(start_time)? {
        return Err(ScheduleError::EndNotAfterStart);
    }
    Ok(())
}

pub fn validate_labels(service: &str, doctor: &str) -> Result<(Service, Doctor), UnknownLabel> {
    Ok((service.parse()?, doctor.parse()?))
}
