use reqwest::Client;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::models::{NotificationError, SendGridMail};

const PROVIDER: &str = "SendGrid";

/// SendGrid v3 mail client
/// POST /v3/mail/send
pub struct SendGridEmailClient {
    client: Client,
    base_url: String,
    api_key: String,
    from_email: String,
}

impl SendGridEmailClient {
    pub fn new(config: &AppConfig) -> Self {
        if !config.is_email_configured() {
            warn!("SendGrid credentials missing; email sends will fail");
        }

        Self {
            client: Client::new(),
            base_url: config.sendgrid_base_url.trim_end_matches('/').to_string(),
            api_key: config.sendgrid_api_key.clone(),
            from_email: config.from_email.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.from_email.is_empty()
    }

    pub async fn send_email(&self, to: &str, subject: &str, message: &str) -> Result<u16, NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::not_configured(PROVIDER));
        }

        let url = format!("{}/v3/mail/send", self.base_url);
        let mail = SendGridMail::plain_text(&self.from_email, to, subject, message);

        debug!("Sending email '{}' to {}", subject, to);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&mail)
            .send()
            .await
            .map_err(|e| NotificationError::provider(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!("Failed to send email: {} - {}", status, response_text);
            return Err(NotificationError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, response_text),
            ));
        }

        info!("Email '{}' accepted for {} ({})", subject, to, status);
        Ok(status.as_u16())
    }
}
