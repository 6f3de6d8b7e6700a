use reqwest::Client;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::models::{NotificationError, TwilioMessageResponse};

const PROVIDER: &str = "Twilio";

/// Twilio Programmable Messaging client
/// POST /2010-04-01/Accounts/{AccountSid}/Messages.json
pub struct TwilioSmsClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSmsClient {
    pub fn new(config: &AppConfig) -> Self {
        if !config.is_sms_configured() {
            warn!("Twilio credentials missing; SMS sends will fail");
        }

        Self {
            client: Client::new(),
            base_url: config.twilio_base_url.trim_end_matches('/').to_string(),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_phone_number.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.from_number.is_empty()
    }

    /// `to` is expected in E.164 form, e.g. +919000000000.
    pub async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::not_configured(PROVIDER));
        }

        let url = format!("{}/2010-04-01/Accounts/{}/Messages.json", self.base_url, self.account_sid);
        debug!("Sending SMS to {} via {}", to, url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", message)])
            .send()
            .await
            .map_err(|e| NotificationError::provider(PROVIDER, e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| NotificationError::provider(PROVIDER, e.to_string()))?;

        if !status.is_success() {
            error!("Failed to send SMS: {} - {}", status, response_text);
            return Err(NotificationError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, response_text),
            ));
        }

        let message: TwilioMessageResponse = serde_json::from_str(&response_text)
            .map_err(|e| NotificationError::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        info!("SMS queued with sid {} (status {:?})", message.sid, message.status);
        Ok(message.sid)
    }
}
