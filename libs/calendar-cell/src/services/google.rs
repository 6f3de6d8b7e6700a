use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{
    CalendarError, CandidateSlot, GoogleEventRequest, GoogleEventResponse, NewCalendarEvent,
    CANDIDATE_HOURS,
};
use crate::services::auth::{ServiceAccountKey, TokenSource};
use crate::services::CalendarProvider;

/// Google Calendar v3 client
/// Based on: https://developers.google.com/calendar/api/v3/reference/events/insert
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    calendar_id: String,
    time_zone: String,
    tokens: TokenSource,
}

impl GoogleCalendarClient {
    pub fn new(config: &AppConfig) -> Result<Self, CalendarError> {
        if !config.is_calendar_configured() {
            return Err(CalendarError::NotConfigured);
        }

        // A service-account key takes precedence over a static token
        let tokens = if !config.google_credentials_path.is_empty() {
            let key = ServiceAccountKey::from_file(&config.google_credentials_path)?;
            info!("Using service account {} for calendar access", key.client_email);
            TokenSource::from_service_account(key)?
        } else {
            TokenSource::from_static(&config.google_access_token)
        };

        Ok(Self {
            client: Client::new(),
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
            calendar_id: config.google_calendar_id.clone(),
            time_zone: config.calendar_timezone.clone(),
            tokens,
        })
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    fn default_calendar_id(&self) -> &str {
        &self.calendar_id
    }

    fn list_candidate_slots(&self, day: NaiveDate) -> Vec<CandidateSlot> {
        CANDIDATE_HOURS
            .iter()
            .filter_map(|hour| day.and_hms_opt(*hour, 0, 0))
            .map(|start| CandidateSlot {
                start,
                time_zone: self.time_zone.clone(),
            })
            .collect()
    }

    /// POST /calendar/v3/calendars/{calendarId}/events
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> Result<String, CalendarError> {
        info!("Creating calendar event '{}' at {}", event.title, event.start);

        let url = format!(
            "{}/calendar/v3/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );
        let request_body = GoogleEventRequest::from_event(event, &self.time_zone);
        let token = self.tokens.access_token(&self.client).await?;

        debug!("Sending event insert request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Calendar insert response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Calendar event creation failed: {} - {}", status, response_text);
            return Err(CalendarError::ApiError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let created: GoogleEventResponse = serde_json::from_str(&response_text)
            .map_err(|e| CalendarError::ApiError {
                message: format!("Failed to parse event response: {}", e),
            })?;

        match created.id {
            Some(id) if !id.is_empty() => {
                info!("Created calendar event: {}", id);
                Ok(id)
            }
            _ => Err(CalendarError::MissingEventId),
        }
    }
}
