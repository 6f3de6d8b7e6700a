pub mod auth;
pub mod google;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{CalendarError, CandidateSlot, NewCalendarEvent};

pub use auth::{ServiceAccountKey, TokenSource};
pub use google::GoogleCalendarClient;

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Calendar used when the caller does not name one.
    fn default_calendar_id(&self) -> &str;

    /// Fixed start times offered for `day`; not a free/busy query.
    fn list_candidate_slots(&self, day: NaiveDate) -> Vec<CandidateSlot>;

    /// Inserts the event and returns the identifier assigned by the calendar service.
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> Result<String, CalendarError>;
}
