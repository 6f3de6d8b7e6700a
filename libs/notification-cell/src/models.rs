use serde::{Deserialize, Serialize};

// ==============================================================================
// TWILIO
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioMessageResponse {
    pub sid: String,
    pub status: Option<String>,
}

// ==============================================================================
// SENDGRID
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailAddress {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personalization {
    pub to: Vec<EmailAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridMail {
    pub personalizations: Vec<Personalization>,
    pub from: EmailAddress,
    pub subject: String,
    pub content: Vec<MailContent>,
}

impl SendGridMail {
    pub fn plain_text(from: &str, to: &str, subject: &str, body: &str) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![EmailAddress { email: to.to_string() }],
            }],
            from: EmailAddress { email: from.to_string() },
            subject: subject.to_string(),
            content: vec![MailContent {
                content_type: "text/plain".to_string(),
                value: body.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("{provider} client not configured")]
    NotConfigured { provider: String },

    #[error("{provider} request failed: {message}")]
    ProviderError { provider: String, message: String },
}

impl NotificationError {
    pub fn not_configured(provider: &str) -> Self {
        NotificationError::NotConfigured {
            provider: provider.to_string(),
        }
    }

    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        NotificationError::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
