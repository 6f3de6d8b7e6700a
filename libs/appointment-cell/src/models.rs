// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use patient_cell::PatientDetails;

pub const DEFAULT_DURATION_MINUTES: i64 = 30;
pub const CONFIRMATION_NUMBER_LENGTH: usize = 8;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAppointmentRequest {
    pub patient: PatientDetails,
    pub appointment_date: NaiveDate,
    #[serde(with = "clock_time")]
    pub appointment_time: NaiveTime,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    pub doctor: String,
    pub reason: Option<String>,
    /// Overrides the directory entry for this doctor.
    pub doctor_email: Option<String>,
    pub doctor_phone: Option<String>,
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

// ==============================================================================
// RESULT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentSummary {
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub duration_minutes: i64,
    pub reason: Option<String>,
    pub event_id: String,
}

/// Result of one booking attempt. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchedulingOutcome {
    pub is_confirmed: bool,
    pub confirmation_number: Option<String>,
    pub patient_id: Option<String>,
    pub is_new_patient: bool,
    pub appointment: Option<AppointmentSummary>,
    pub notifications_sent: Vec<NotificationChannel>,
    pub errors: Vec<String>,
}

impl SchedulingOutcome {
    pub fn event_id(&self) -> Option<&str> {
        self.appointment.as_ref().map(|a| a.event_id.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    PatientEmail,
    PatientSms,
    DoctorEmail,
    DoctorSms,
}

impl NotificationChannel {
    pub fn error_prefix(&self) -> &'static str {
        match self {
            NotificationChannel::PatientEmail => "Email error",
            NotificationChannel::PatientSms => "SMS error",
            NotificationChannel::DoctorEmail => "Doctor email error",
            NotificationChannel::DoctorSms => "Doctor SMS error",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationChannel::PatientEmail => write!(f, "patient_email"),
            NotificationChannel::PatientSms => write!(f, "patient_sms"),
            NotificationChannel::DoctorEmail => write!(f, "doctor_email"),
            NotificationChannel::DoctorSms => write!(f, "doctor_sms"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("{0}")]
    Validation(String),

    #[error("Scheduler not configured: {0}")]
    NotConfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// `HH:MM` on the wire; `HH:MM:SS` is accepted on input.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}
