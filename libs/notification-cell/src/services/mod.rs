pub mod sendgrid;
pub mod twilio;

use async_trait::async_trait;

use shared_config::AppConfig;

use crate::models::NotificationError;

pub use sendgrid::SendGridEmailClient;
pub use twilio::TwilioSmsClient;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the provider's message id.
    async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError>;

    /// Returns the provider's HTTP status code.
    async fn send_email(&self, to: &str, subject: &str, message: &str) -> Result<u16, NotificationError>;
}

/// SMS and email delivery behind one handle.
pub struct NotificationClient {
    sms: TwilioSmsClient,
    email: SendGridEmailClient,
}

impl NotificationClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sms: TwilioSmsClient::new(config),
            email: SendGridEmailClient::new(config),
        }
    }
}

#[async_trait]
impl Notifier for NotificationClient {
    async fn send_sms(&self, to: &str, message: &str) -> Result<String, NotificationError> {
        self.sms.send_sms(to, message).await
    }

    async fn send_email(&self, to: &str, subject: &str, message: &str) -> Result<u16, NotificationError> {
        self.email.send_email(to, subject, message).await
    }
}
