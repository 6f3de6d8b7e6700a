use std::sync::Arc;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, DoctorContact, default_doctor_directory};

pub const TEST_CALENDAR_ID: &str = "clinic@example.com";
pub const TEST_TWILIO_SID: &str = "ACtest0000000000000000000000000000";

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub google_base_url: String,
    pub google_access_token: String,
    pub twilio_base_url: String,
    pub sendgrid_base_url: String,
    pub doctor_directory: Vec<DoctorContact>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            google_base_url: "http://localhost:54322".to_string(),
            google_access_token: "test-google-token".to_string(),
            twilio_base_url: "http://localhost:54323".to_string(),
            sendgrid_base_url: "http://localhost:54324".to_string(),
            doctor_directory: default_doctor_directory(),
        }
    }
}

impl TestConfig {
    /// Points every remote provider at the same mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            supabase_url: base_url.to_string(),
            google_base_url: base_url.to_string(),
            twilio_base_url: base_url.to_string(),
            sendgrid_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            google_credentials_path: String::new(),
            google_access_token: self.google_access_token.clone(),
            google_calendar_id: TEST_CALENDAR_ID.to_string(),
            google_base_url: self.google_base_url.clone(),
            calendar_timezone: "Asia/Kolkata".to_string(),
            twilio_account_sid: TEST_TWILIO_SID.to_string(),
            twilio_auth_token: "test-twilio-token".to_string(),
            twilio_phone_number: "+15005550006".to_string(),
            twilio_base_url: self.twilio_base_url.clone(),
            sendgrid_api_key: "test-sendgrid-key".to_string(),
            from_email: "clinic@example.com".to_string(),
            sendgrid_base_url: self.sendgrid_base_url.clone(),
            doctor_directory: self.doctor_directory.clone(),
            server_port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub fn tomorrow() -> NaiveDate {
    (Utc::now() + Duration::days(1)).date_naive()
}

pub struct MockProviderResponses;

impl MockProviderResponses {
    pub fn patient_row(patient_id: &str, first_name: &str, last_name: &str, dob: &str) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": dob,
            "phone": "+19995551234",
            "email": "old@example.com",
            "address": null,
            "insurance_carrier": null,
            "member_id": null,
            "group_number": null,
            "last_visit": "2024-01-01",
            "is_new_patient": false
        })
    }

    pub fn calendar_event(event_id: &str) -> serde_json::Value {
        json!({
            "kind": "calendar#event",
            "id": event_id,
            "status": "confirmed",
            "htmlLink": format!("https://www.google.com/calendar/event?eid={}", event_id),
            "summary": "Appointment with Jane Doe - Dr. Smith"
        })
    }

    pub fn twilio_message(to: &str) -> serde_json::Value {
        json!({
            "sid": format!("SM{}", Uuid::new_v4().simple()),
            "to": to,
            "from": "+15005550006",
            "status": "queued"
        })
    }

    pub fn twilio_error(message: &str) -> serde_json::Value {
        json!({
            "code": 21211,
            "message": message,
            "status": 400
        })
    }

    pub fn sendgrid_error(message: &str) -> serde_json::Value {
        json!({
            "errors": [{ "message": message, "field": null }]
        })
    }
}
