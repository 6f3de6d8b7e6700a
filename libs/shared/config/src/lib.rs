use std::env;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_CALENDAR_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";
pub const DEFAULT_SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

/// Contact details used to notify a doctor when one of their slots is booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DoctorContact {
    pub fn new(name: &str, email: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }
}

pub fn default_doctor_directory() -> Vec<DoctorContact> {
    vec![
        DoctorContact::new("Dr. Smith", Some("dr.smith@example.com"), None),
        DoctorContact::new("Dr. Gupta", Some("dr.gupta@example.com"), None),
        DoctorContact::new("Dr. Patel", Some("dr.patel@example.com"), None),
    ]
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub google_credentials_path: String,
    pub google_access_token: String,
    pub google_calendar_id: String,
    pub google_base_url: String,
    pub calendar_timezone: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub twilio_base_url: String,
    pub sendgrid_api_key: String,
    pub from_email: String,
    pub sendgrid_base_url: String,
    pub doctor_directory: Vec<DoctorContact>,
    pub server_port: u16,
}

fn var_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn var_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default", key);
        default.to_string()
    })
}

impl AppConfig {
    pub fn from_env() -> Self {
        let doctor_directory = match env::var("DOCTOR_DIRECTORY") {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("DOCTOR_DIRECTORY is not valid JSON ({}), using default directory", e);
                default_doctor_directory()
            }),
            Err(_) => default_doctor_directory(),
        };

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);

        let config = Self {
            supabase_url: var_or_empty("SUPABASE_URL"),
            supabase_service_key: var_or_empty("SUPABASE_SERVICE_KEY"),
            google_credentials_path: env::var("GOOGLE_CREDENTIALS_JSON").unwrap_or_default(),
            google_access_token: env::var("GOOGLE_CALENDAR_ACCESS_TOKEN").unwrap_or_default(),
            google_calendar_id: var_or_default("GOOGLE_CALENDAR_ID", DEFAULT_CALENDAR_ID),
            google_base_url: var_or_default("GOOGLE_CALENDAR_BASE_URL", DEFAULT_GOOGLE_BASE_URL),
            calendar_timezone: var_or_default("CALENDAR_TIMEZONE", DEFAULT_CALENDAR_TIMEZONE),
            twilio_account_sid: var_or_empty("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: var_or_empty("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: var_or_empty("TWILIO_PHONE_NUMBER"),
            twilio_base_url: var_or_default("TWILIO_BASE_URL", DEFAULT_TWILIO_BASE_URL),
            sendgrid_api_key: var_or_empty("SENDGRID_API_KEY"),
            from_email: var_or_empty("FROM_EMAIL"),
            sendgrid_base_url: var_or_default("SENDGRID_BASE_URL", DEFAULT_SENDGRID_BASE_URL),
            doctor_directory,
            server_port,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }
        if !config.is_calendar_configured() {
            warn!("Neither GOOGLE_CREDENTIALS_JSON nor GOOGLE_CALENDAR_ACCESS_TOKEN is set");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
    }

    pub fn is_calendar_configured(&self) -> bool {
        !self.google_credentials_path.is_empty() || !self.google_access_token.is_empty()
    }

    pub fn is_sms_configured(&self) -> bool {
        !self.twilio_account_sid.is_empty()
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
    }

    pub fn is_email_configured(&self) -> bool {
        !self.sendgrid_api_key.is_empty() && !self.from_email.is_empty()
    }
}
