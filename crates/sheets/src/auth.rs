//! Service-account OAuth for the Sheets API.
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! short-lived bearer token, which is cached until shortly before expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::source::GridError;

/// Read/write scope for spreadsheet values.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the cached token expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Fields of a Google service-account JSON key that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        serde_json::from_str(json)
            .map_err(|e| GridError::Credentials(format!("Invalid service-account key: {e}")))
    }

    pub async fn from_file(path: &str) -> Result<Self, GridError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GridError::Credentials(format!("Cannot read {path}: {e}")))?;
        Self::from_json(&json)
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
    value: String,
    expires_at: DateTime<Utc>,
}

/// Issues bearer tokens for one service account.
pub struct TokenProvider {
    client: reqwest::Client,
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            client,
            key,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, exchanging a fresh assertion if needed.
    pub async fn access_token(&self) -> Result<String, GridError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GridError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained Sheets access token",
        );

        let expires_at = now + Duration::seconds(token.expires_in - EXPIRY_MARGIN_SECS);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, GridError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| GridError::Credentials(format!("Invalid private key: {e}")))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| GridError::Credentials(format!("Failed to sign assertion: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn key_defaults_token_uri() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "sync@orion.iam.gserviceaccount.com", "private_key": "pem"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn key_without_email_is_rejected() {
        assert_matches!(
            ServiceAccountKey::from_json(r#"{"private_key": "pem"}"#),
            Err(GridError::Credentials(_))
        );
    }

    #[test]
    fn bad_pem_fails_to_sign() {
        let key = ServiceAccountKey {
            client_email: "a@b".into(),
            private_key: "not a pem".into(),
            token_uri: default_token_uri(),
        };
        let provider = TokenProvider::new(reqwest::Client::new(), key);
        assert_matches!(
            provider.sign_assertion(Utc::now()),
            Err(GridError::Credentials(_))
        );
    }
}
