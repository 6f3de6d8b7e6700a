// libs/appointment-cell/src/services/validation.rs
use chrono::{NaiveDateTime, TimeDelta};
use regex::Regex;
use tracing::debug;

use crate::models::{ScheduleAppointmentRequest, SchedulingError};

const E164_PATTERN: &str = r"^\+[1-9]\d{7,14}$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or_default().is_empty()
}

fn compile(pattern: &str) -> Result<Regex, SchedulingError> {
    Regex::new(pattern).map_err(|e| SchedulingError::Internal(e.to_string()))
}

/// Rejects a submission before any record is written or remote call is made.
pub fn validate_request(request: &ScheduleAppointmentRequest) -> Result<(), SchedulingError> {
    let patient = &request.patient;

    let mut missing = Vec::new();
    if patient.first_name.trim().is_empty() {
        missing.push("First Name");
    }
    if patient.last_name.trim().is_empty() {
        missing.push("Last Name");
    }
    if is_blank(patient.phone.as_deref()) {
        missing.push("Phone");
    }
    if request.doctor.trim().is_empty() {
        missing.push("Doctor");
    }

    if !missing.is_empty() {
        debug!("Rejecting booking with missing fields: {:?}", missing);
        return Err(SchedulingError::Validation(format!(
            "Please fill required fields: {}.",
            missing.join(", ")
        )));
    }

    if let Some(phone) = patient.phone.as_deref() {
        if !compile(E164_PATTERN)?.is_match(phone.trim()) {
            return Err(SchedulingError::Validation(
                "Phone number must be in E.164 format, e.g. +919000000000.".to_string(),
            ));
        }
    }

    if let Some(email) = patient.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if email.len() > 254 || !compile(EMAIL_PATTERN)?.is_match(email) {
            return Err(SchedulingError::Validation(format!("Invalid email address: {}", email)));
        }
    }

    if request.duration_minutes <= 0 || request.duration_minutes > MAX_DURATION_MINUTES {
        return Err(SchedulingError::Validation(format!(
            "Appointment duration must be between 1 and {} minutes.",
            MAX_DURATION_MINUTES
        )));
    }

    appointment_window(request).map(|_| ())
}

/// Start and end of the booked slot, or a validation error when the end
/// falls outside the representable calendar range.
pub fn appointment_window(
    request: &ScheduleAppointmentRequest,
) -> Result<(NaiveDateTime, NaiveDateTime), SchedulingError> {
    let start = NaiveDateTime::new(request.appointment_date, request.appointment_time);
    let end = TimeDelta::try_minutes(request.duration_minutes)
        .and_then(|length| start.checked_add_signed(length))
        .ok_or_else(|| SchedulingError::Validation(
            "Appointment date and duration are out of range.".to_string(),
        ))?;

    Ok((start, end))
}
