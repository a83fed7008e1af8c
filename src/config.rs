use std::time::Duration;

use crate::auth::Credentials;
use crate::error::{HealthCrmError, Result};

/// Default CRM service code used to scope listings to the consuming product
pub const DEFAULT_CRM_SERVICE_CODE: &str = "05";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

/// Default refresh cadence in seconds, slightly under the 60 minute token lifetime
pub const DEFAULT_TOKEN_REFRESH_INTERVAL: u64 = 59 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    // OAuth2 credentials
    pub credentials: Credentials,

    // CRM API
    pub base_url: String,
    pub crm_service_code: String,

    // Timeouts
    pub request_timeout: u64,
    pub token_refresh_interval: u64,

    // Token lifecycle
    pub refresh_mode: RefreshMode,
}

/// How the token manager keeps its access token fresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    Background, // Interval task refreshes the token in the background
    PerRequest, // Log in again before every outbound call
}

impl Config {
    /// Build a configuration with default timeouts and refresh cadence
    pub fn new(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            base_url: normalize_base_url(&base_url.into()),
            crm_service_code: DEFAULT_CRM_SERVICE_CODE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_refresh_interval: DEFAULT_TOKEN_REFRESH_INTERVAL,
            refresh_mode: RefreshMode::Background,
        }
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| HealthCrmError::Config(format!("{} is required", key)))
        };

        let credentials = Credentials {
            auth_server_endpoint: normalize_base_url(&required(
                "HEALTH_CRM_AUTH_SERVER_ENDPOINT",
            )?),
            client_id: required("HEALTH_CRM_CLIENT_ID")?,
            client_secret: required("HEALTH_CRM_CLIENT_SECRET")?,
            grant_type: required("HEALTH_CRM_GRANT_TYPE")?,
            username: required("HEALTH_CRM_USERNAME")?,
            password: required("HEALTH_CRM_PASSWORD")?,
        };

        let config = Config {
            credentials,

            base_url: normalize_base_url(&required("HEALTH_CRM_BASE_URL")?),

            crm_service_code: lookup("HEALTH_CRM_SERVICE_CODE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CRM_SERVICE_CODE.to_string()),

            request_timeout: parse_seconds(
                lookup("HEALTH_CRM_REQUEST_TIMEOUT"),
                "HEALTH_CRM_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT,
            )?,

            token_refresh_interval: parse_seconds(
                lookup("HEALTH_CRM_TOKEN_REFRESH_INTERVAL"),
                "HEALTH_CRM_TOKEN_REFRESH_INTERVAL",
                DEFAULT_TOKEN_REFRESH_INTERVAL,
            )?,

            refresh_mode: parse_refresh_mode(
                &lookup("HEALTH_CRM_REFRESH_MODE").unwrap_or_default(),
            )?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("HEALTH_CRM_BASE_URL", &self.base_url),
            (
                "HEALTH_CRM_AUTH_SERVER_ENDPOINT",
                &self.credentials.auth_server_endpoint,
            ),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HealthCrmError::Config(format!(
                    "{} must be an http(s) URL, got: {}",
                    name, url
                )));
            }
        }

        if self.request_timeout == 0 {
            return Err(HealthCrmError::Config(
                "HEALTH_CRM_REQUEST_TIMEOUT must be greater than zero".to_string(),
            ));
        }

        if self.token_refresh_interval == 0 {
            return Err(HealthCrmError::Config(
                "HEALTH_CRM_TOKEN_REFRESH_INTERVAL must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn token_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.token_refresh_interval)
    }
}

/// Strip trailing slashes so paths can be appended verbatim
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Parse an optional number of seconds
fn parse_seconds(value: Option<String>, name: &str, default: u64) -> Result<u64> {
    match value {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| {
            HealthCrmError::Config(format!("{} must be a number of seconds, got: {}", name, s))
        }),
    }
}

/// Parse refresh mode from string; unset means background
fn parse_refresh_mode(s: &str) -> Result<RefreshMode> {
    match s.trim().to_lowercase().as_str() {
        "" | "background" => Ok(RefreshMode::Background),
        "per_request" | "per-request" | "sync" => Ok(RefreshMode::PerRequest),
        other => Err(HealthCrmError::Config(format!(
            "HEALTH_CRM_REFRESH_MODE must be 'background' or 'per_request', got: {}",
            other
        ))),
    }
}
