use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::models::CalendarError;

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
// Refresh slightly before Google's stated expiry
const EXPIRY_MARGIN_SECS: i64 = 60;
// Upper bound on how long a token is cached, whatever the response claims
const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 3600;

/// The fields of a Google service-account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| CalendarError::InvalidCredentials {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&raw).map_err(|e| CalendarError::InvalidCredentials {
            message: format!("malformed service account key: {}", e),
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub enum TokenSource {
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        encoding_key: EncodingKey,
        cached: Mutex<Option<CachedToken>>,
    },
}

impl TokenSource {
    pub fn from_static(token: &str) -> Self {
        TokenSource::Static(token.to_string())
    }

    pub fn from_service_account(key: ServiceAccountKey) -> Result<Self, CalendarError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(TokenSource::ServiceAccount {
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// Returns a bearer token, exchanging a fresh assertion when the cached one is stale.
    pub async fn access_token(&self, client: &Client) -> Result<String, CalendarError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount { key, encoding_key, cached } => {
                let mut cached = cached.lock().await;
                if let Some(token) = cached.as_ref() {
                    if token.expires_at > Utc::now() {
                        return Ok(token.access_token.clone());
                    }
                }

                let fresh = exchange_assertion(client, key, encoding_key).await?;
                let access_token = fresh.access_token.clone();
                *cached = Some(fresh);
                Ok(access_token)
            }
        }
    }
}

fn sign_assertion(key: &ServiceAccountKey, encoding_key: &EncodingKey) -> Result<String, CalendarError> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: CALENDAR_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    Ok(encode(&Header::new(Algorithm::RS256), &claims, encoding_key)?)
}

async fn exchange_assertion(
    client: &Client,
    key: &ServiceAccountKey,
    encoding_key: &EncodingKey,
) -> Result<CachedToken, CalendarError> {
    debug!("Exchanging service account assertion for {}", key.client_email);

    let assertion = sign_assertion(key, encoding_key)?;
    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| CalendarError::AuthFailed { message: e.to_string() })?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| CalendarError::AuthFailed { message: e.to_string() })?;

    if !status.is_success() {
        error!("Google token exchange failed: {} - {}", status, response_text);
        return Err(CalendarError::AuthFailed {
            message: format!("HTTP {}: {}", status, response_text),
        });
    }

    let token: TokenResponse = serde_json::from_str(&response_text).map_err(|e| CalendarError::AuthFailed {
        message: format!("Failed to parse token response: {}", e),
    })?;

    info!("Obtained calendar access token for {}", key.client_email);

    Ok(CachedToken {
        access_token: token.access_token,
        expires_at: Utc::now() + Duration::seconds(cache_lifetime_secs(token.expires_in)),
    })
}

/// Seconds to keep a token; zero or less means it is stale on the next call.
fn cache_lifetime_secs(expires_in: i64) -> i64 {
    expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS) - EXPIRY_MARGIN_SECS
}
