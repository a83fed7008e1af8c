// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

/// Default token lifetime when the auth server omits `expires_in`
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Safety margin subtracted from the advertised lifetime
const EXPIRY_BUFFER_SECS: u64 = 60;

/// OAuth2 client credentials for the Health CRM auth server
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub auth_server_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Token endpoint derived from the auth server base
    pub fn token_url(&self) -> String {
        format!(
            "{}/oauth2/token/",
            self.auth_server_endpoint.trim_end_matches('/')
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_server_endpoint", &self.auth_server_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("grant_type", &self.grant_type)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct OAuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    #[allow(dead_code)]
    pub scope: Option<String>,
}

/// Token data extracted from a successful exchange
#[derive(Debug, Clone)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenData {
    pub fn from_response(data: OAuthResponse, now: DateTime<Utc>) -> Self {
        let expires_in = data
            .expires_in
            .unwrap_or(DEFAULT_EXPIRES_IN)
            .saturating_sub(EXPIRY_BUFFER_SECS);

        Self {
            access_token: data.access_token,
            refresh_token: data.refresh_token.filter(|t| !t.is_empty()),
            token_type: data
                .token_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Bearer".to_string()),
            expires_at: now + Duration::seconds(expires_in as i64),
        }
    }
}

/// Mutable token state owned by the token manager
#[derive(Debug, Clone)]
pub(crate) struct TokenState {
    access_token: String,
    refresh_token: String,
    token_type: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    auth_failed: bool,
}

impl TokenState {
    pub fn new(data: TokenData, now: DateTime<Utc>) -> Self {
        Self {
            access_token: data.access_token,
            refresh_token: data.refresh_token.unwrap_or_default(),
            token_type: data.token_type,
            issued_at: now,
            expires_at: data.expires_at,
            auth_failed: false,
        }
    }

    /// Swap in a refreshed pair; keeps the old refresh token if none was issued
    pub fn apply(&mut self, data: TokenData, now: DateTime<Utc>) {
        self.access_token = data.access_token;
        if let Some(refresh_token) = data.refresh_token {
            self.refresh_token = refresh_token;
        }
        self.token_type = data.token_type;
        self.issued_at = now;
        self.expires_at = data.expires_at;
        self.auth_failed = false;
    }

    pub fn mark_failed(&mut self) {
        self.auth_failed = true;
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    #[allow(dead_code)]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn auth_failed(&self) -> bool {
        self.auth_failed
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Short prefix of a token, safe to log
pub(crate) fn token_preview(token: &str) -> &str {
    token.get(..10).unwrap_or(token)
}
