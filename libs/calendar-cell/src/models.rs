use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Local wall-clock hours offered as bookable starts on any day.
pub const CANDIDATE_HOURS: [u32; 5] = [9, 10, 11, 14, 15];

pub const EMAIL_REMINDER_MINUTES: i64 = 24 * 60;
pub const POPUP_REMINDER_MINUTES: i64 = 10;

const GOOGLE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: NaiveDateTime,
    pub time_zone: String,
}

/// Event to insert; `start` and `end` are local times in the calendar's zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
}

// ==============================================================================
// GOOGLE CALENDAR WIRE TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl GoogleEventDateTime {
    pub fn new(local: NaiveDateTime, time_zone: &str) -> Self {
        Self {
            date_time: local.format(GOOGLE_DATETIME_FORMAT).to_string(),
            time_zone: time_zone.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventReminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Default for GoogleEventReminders {
    fn default() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ReminderOverride { method: "email".to_string(), minutes: EMAIL_REMINDER_MINUTES },
                ReminderOverride { method: "popup".to_string(), minutes: POPUP_REMINDER_MINUTES },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleEventRequest {
    pub summary: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: GoogleEventDateTime,
    pub end: GoogleEventDateTime,
    pub reminders: GoogleEventReminders,
}

impl GoogleEventRequest {
    pub fn from_event(event: &NewCalendarEvent, time_zone: &str) -> Self {
        Self {
            summary: event.title.clone(),
            location: event.location.clone().unwrap_or_default(),
            description: event.description.clone(),
            start: GoogleEventDateTime::new(event.start, time_zone),
            end: GoogleEventDateTime::new(event.end, time_zone),
            reminders: GoogleEventReminders::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleEventResponse {
    pub id: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar service not configured")]
    NotConfigured,

    #[error("Invalid calendar credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Calendar authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("Calendar API error: {message}")]
    ApiError { message: String },

    #[error("Calendar service returned no event identifier")]
    MissingEventId,
}

impl From<reqwest::Error> for CalendarError {
    fn from(err: reqwest::Error) -> Self {
        CalendarError::ApiError {
            message: err.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for CalendarError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CalendarError::InvalidCredentials {
            message: err.to_string(),
        }
    }
}
