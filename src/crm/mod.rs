// Typed Health CRM resource operations
//
// Each operation builds its path and query, sends one authenticated request,
// checks the single expected status and decodes the body.

mod facilities;
mod identities;
mod practitioners;
mod services;

pub use facilities::FacilityFilter;
pub use practitioners::PractitionerFilter;

use std::sync::Arc;

use crate::auth::TokenManager;
use crate::config::Config;
use crate::error::{HealthCrmError, Result};
use crate::http_client::CrmHttpClient;

/// Health CRM client
///
/// Cheap to share behind an `Arc`. The token manager it owns keeps the
/// access token fresh until [`HealthCrm::shutdown`] is called or the client
/// is dropped.
pub struct HealthCrm {
    http: CrmHttpClient,
    crm_service_code: String,
}

impl HealthCrm {
    /// Validate the configuration, log in and start the token refresh cycle
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            base_url = %config.base_url,
            refresh_mode = ?config.refresh_mode,
            "Initializing Health CRM client"
        );

        let token_manager = Arc::new(TokenManager::new(&config).await?);
        Self::with_token_manager(&config, token_manager)
    }

    /// Build a client from `HEALTH_CRM_*` environment variables
    pub async fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?).await
    }

    /// Build a client around an existing token manager
    pub fn with_token_manager(config: &Config, token_manager: Arc<TokenManager>) -> Result<Self> {
        let http = CrmHttpClient::new(token_manager, &config.base_url, config.request_timeout())?;

        Ok(Self {
            http,
            crm_service_code: config.crm_service_code.clone(),
        })
    }

    /// Stop the background token refresh task
    pub async fn shutdown(&self) {
        self.http.token_manager().shutdown().await;
        tracing::info!("Health CRM client shut down");
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        self.http.token_manager()
    }

    pub fn crm_service_code(&self) -> &str {
        &self.crm_service_code
    }
}

/// Reject empty identifiers before they end up as a path segment
fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HealthCrmError::validation(format!("{} must not be empty", name)));
    }
    Ok(trimmed)
}

/// Reject empty bulk lookups
fn require_ids<S: AsRef<str>>(name: &str, ids: &[S]) -> Result<()> {
    if ids.is_empty() || ids.iter().all(|id| id.as_ref().trim().is_empty()) {
        return Err(HealthCrmError::validation(format!(
            "at least one {} is required",
            name
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("facility id", " abc ").unwrap(), "abc");
        let err = require_id("facility id", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: facility id must not be empty");
    }

    #[test]
    fn test_require_ids() {
        assert!(require_ids("service id", &["a"]).is_ok());
        assert!(require_ids::<&str>("service id", &[]).is_err());
        assert!(require_ids("service id", &["", " "]).is_err());
    }

    #[tokio::test]
    async fn test_default_service_code() {
        let crm = test_support::client_for("http://localhost:8000", "t");
        assert_eq!(crm.crm_service_code(), "05");
        assert!(!crm.token_manager().is_running());
    }
}
