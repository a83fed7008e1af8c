use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::exchange;
use super::types::{token_preview, Credentials, TokenState};
use crate::config::{Config, RefreshMode};
use crate::error::{HealthCrmError, Result};

/// Token manager
/// Owns the OAuth2 token pair and keeps it fresh for the lifetime of the client
pub struct TokenManager {
    /// Client credentials used for login and refresh
    credentials: Arc<Credentials>,

    /// Current token pair, swapped atomically under the write lock
    state: Arc<RwLock<TokenState>>,

    /// HTTP client for token requests
    client: Client,

    /// Refresh strategy
    mode: RefreshMode,

    /// Background refresh cadence
    refresh_interval: Duration,

    /// Stops the background refresh task
    cancellation: CancellationToken,

    /// Background refresh task, if running
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TokenManager {
    /// Log in with the configured credentials and start the refresh cycle
    pub async fn new(config: &Config) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        let credentials = config.credentials.clone();

        let data = exchange::login(&client, &credentials)
            .await
            .map_err(auth_error)?;

        let manager = Self::with_state(
            credentials,
            TokenState::new(data, Utc::now()),
            client,
            config.refresh_mode,
            config.token_refresh_interval(),
        );

        if manager.mode == RefreshMode::Background {
            manager.start();
        }

        Ok(manager)
    }

    /// Create a TokenManager holding a fixed token (no login, no background task)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(access_token: impl Into<String>) -> Result<Self> {
        use super::types::TokenData;

        let credentials = Credentials {
            auth_server_endpoint: "http://127.0.0.1:9".to_string(),
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            grant_type: "password".to_string(),
            username: "test-user".to_string(),
            password: "test-password".to_string(),
        };

        let now = Utc::now();
        let data = TokenData {
            access_token: access_token.into(),
            refresh_token: Some("test-refresh-token".to_string()),
            token_type: "Bearer".to_string(),
            expires_at: now + chrono::Duration::hours(1),
        };

        Ok(Self::with_state(
            credentials,
            TokenState::new(data, now),
            build_client(Duration::from_secs(30))?,
            RefreshMode::Background,
            Duration::from_secs(crate::config::DEFAULT_TOKEN_REFRESH_INTERVAL),
        ))
    }

    fn with_state(
        credentials: Credentials,
        state: TokenState,
        client: Client,
        mode: RefreshMode,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            state: Arc::new(RwLock::new(state)),
            client,
            mode,
            refresh_interval,
            cancellation: CancellationToken::new(),
            task_handle: Mutex::new(None),
        }
    }

    /// Exchange the credentials for a new token pair
    pub async fn login(&self) -> Result<()> {
        let data = exchange::login(&self.client, &self.credentials)
            .await
            .map_err(auth_error)?;

        let mut state = self.state.write().await;
        *state = TokenState::new(data, Utc::now());

        Ok(())
    }

    /// Exchange the stored refresh token for a new token pair
    /// On failure the previous token stays in place and the failure flag is set
    pub async fn refresh(&self) -> Result<()> {
        refresh_state(&self.client, &self.credentials, &self.state).await
    }

    /// Get the access token to attach to the next request
    ///
    /// An expired token is refreshed first, falling back to a full login.
    pub async fn access_token(&self) -> Result<String> {
        match self.mode {
            RefreshMode::PerRequest => {
                self.login().await?;
            }
            RefreshMode::Background => {
                let (auth_failed, expired) = {
                    let state = self.state.read().await;
                    (state.auth_failed(), state.is_expired(Utc::now()))
                };

                if expired {
                    tracing::warn!(
                        auth_failed,
                        "Access token has expired, renewing before request"
                    );
                    if let Err(e) = self.refresh().await {
                        tracing::warn!("Token refresh failed, logging in again: {}", e);
                        self.login().await?;
                    }
                } else if auth_failed {
                    tracing::warn!(
                        "Using existing token despite refresh failure (not yet expired)"
                    );
                }
            }
        }

        let state = self.state.read().await;
        Ok(state.access_token().to_string())
    }

    /// Whether the last refresh attempt failed
    pub async fn auth_failed(&self) -> bool {
        self.state.read().await.auth_failed()
    }

    /// When the current access token expires
    pub async fn expires_at(&self) -> DateTime<Utc> {
        self.state.read().await.expires_at()
    }

    /// When the current access token was issued
    pub async fn issued_at(&self) -> DateTime<Utc> {
        self.state.read().await.issued_at()
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    /// Whether the background refresh task is alive
    pub fn is_running(&self) -> bool {
        self.task_handle
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Spawn the background refresh task
    fn start(&self) {
        let client = self.client.clone();
        let credentials = Arc::clone(&self.credentials);
        let state = Arc::clone(&self.state);
        let interval = self.refresh_interval;
        let cancel = self.cancellation.clone();

        tracing::info!(
            "Starting background token refresh every {}s",
            interval.as_secs()
        );

        let handle = tokio::spawn(async move {
            refresh_loop(client, credentials, state, interval, cancel).await;
        });

        if let Ok(mut guard) = self.task_handle.lock() {
            *guard = Some(handle);
        }
    }

    /// Stop the background refresh task and wait for it to exit
    pub async fn shutdown(&self) {
        self.cancellation.cancel();

        let handle = self.task_handle.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("Token refresh task ended abnormally: {}", e);
            }
            tracing::info!("Background token refresh stopped");
        }
    }
}

impl Drop for TokenManager {
    fn drop(&mut self) {
        if !self.cancellation.is_cancelled() {
            self.cancellation.cancel();
        }
    }
}

/// Refresh the token pair, flagging the state on failure
async fn refresh_state(
    client: &Client,
    credentials: &Credentials,
    state: &RwLock<TokenState>,
) -> Result<()> {
    let refresh_token = state.read().await.refresh_token().to_string();

    match exchange::refresh(client, credentials, &refresh_token).await {
        Ok(data) => {
            let mut state = state.write().await;
            state.apply(data, Utc::now());
            tracing::debug!(
                "Access token updated ({}...)",
                token_preview(state.access_token())
            );
            Ok(())
        }
        Err(e) => {
            state.write().await.mark_failed();
            Err(auth_error(e))
        }
    }
}

/// Refresh on a fixed cadence until cancelled
async fn refresh_loop(
    client: Client,
    credentials: Arc<Credentials>,
    state: Arc<RwLock<TokenState>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Token refresh task cancelled");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = refresh_state(&client, &credentials, &state).await {
                    tracing::error!("Background token refresh failed, keeping previous token: {}", e);
                }
            }
        }
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HealthCrmError::Config(format!("Failed to create HTTP client: {}", e)))
}

fn auth_error(e: anyhow::Error) -> HealthCrmError {
    HealthCrmError::Auth(format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::TokenData;
    use crate::http_client::CrmHttpClient;
    use mockito::Matcher;
    use serde_json::json;

    fn token_data(access_token: &str, expires_at: DateTime<Utc>) -> TokenData {
        TokenData {
            access_token: access_token.to_string(),
            refresh_token: Some("refresh-1".to_string()),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }

    /// Manager holding an already-expired token, talking to `auth_url`
    fn expired_manager(auth_url: &str, auth_failed: bool) -> TokenManager {
        let credentials = Credentials {
            auth_server_endpoint: auth_url.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            grant_type: "password".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
        };

        let now = Utc::now();
        let expired_at = now - chrono::Duration::minutes(30);
        let mut state = TokenState::new(token_data("token-1", expired_at), now);
        if auth_failed {
            state.mark_failed();
        }

        TokenManager::with_state(
            credentials,
            state,
            build_client(Duration::from_secs(5)).unwrap(),
            RefreshMode::Background,
            Duration::from_secs(3600),
        )
    }

    fn token_body(access_token: &str) -> String {
        json!({
            "access_token": access_token,
            "refresh_token": "refresh-2",
            "token_type": "Bearer",
            "expires_in": 3600
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_before_use() {
        let mut server = mockito::Server::new_async().await;
        let refresh = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "refresh-1".into()),
            ]))
            .with_status(200)
            .with_body(token_body("token-2"))
            .create_async()
            .await;

        let manager = expired_manager(&server.url(), false);

        assert_eq!(manager.access_token().await.unwrap(), "token-2");
        assert!(!manager.auth_failed().await);
        assert!(manager.expires_at().await > Utc::now());
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_token_falls_back_to_login_after_failed_refresh() {
        let mut server = mockito::Server::new_async().await;
        let refresh = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "refresh_token".into(),
            ))
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;
        let login = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::UrlEncoded("grant_type".into(), "password".into()))
            .with_status(200)
            .with_body(token_body("token-2"))
            .create_async()
            .await;
        let resource = server
            .mock("GET", "/v1/facilities/facilities/abc/")
            .match_header("authorization", "Bearer token-2")
            .with_status(200)
            .with_body(r#"{"id":"abc"}"#)
            .create_async()
            .await;

        let manager = Arc::new(expired_manager(&server.url(), true));
        let client =
            CrmHttpClient::new(Arc::clone(&manager), &server.url(), Duration::from_secs(5)).unwrap();

        let response = client
            .get("/v1/facilities/facilities/abc/", None)
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(!manager.auth_failed().await);
        refresh.assert_async().await;
        login.assert_async().await;
        resource.assert_async().await;
    }

    #[tokio::test]
    async fn test_static_token_manager() {
        let manager = TokenManager::new_for_testing("static-token").unwrap();

        assert_eq!(manager.access_token().await.unwrap(), "static-token");
        assert!(!manager.auth_failed().await);
        assert!(!manager.is_running());
        assert_eq!(manager.refresh_mode(), RefreshMode::Background);
        assert!(manager.expires_at().await > manager.issued_at().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_token() {
        // Auth endpoint points at a closed port, so the exchange fails
        let manager = TokenManager::new_for_testing("stale-token").unwrap();

        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, HealthCrmError::Auth(_)));
        assert!(manager.auth_failed().await);

        // Token not yet expired: stale token is still handed out
        assert_eq!(manager.access_token().await.unwrap(), "stale-token");
    }

    #[tokio::test]
    async fn test_failed_refresh_with_expired_token_surfaces_error() {
        let manager = TokenManager::new_for_testing("stale-token").unwrap();

        {
            let mut state = manager.state.write().await;
            let now = Utc::now();
            state.apply(
                TokenData {
                    access_token: "stale-token".to_string(),
                    refresh_token: None,
                    token_type: "Bearer".to_string(),
                    expires_at: now - chrono::Duration::seconds(1),
                },
                now,
            );
            state.mark_failed();
        }

        let err = manager.access_token().await.unwrap_err();
        assert!(matches!(err, HealthCrmError::Auth(_)));
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let mut manager = TokenManager::new_for_testing("token").unwrap();
        manager.refresh_interval = Duration::from_secs(3600);
        manager.start();
        assert!(manager.is_running());

        manager.shutdown().await;
        assert!(!manager.is_running());
    }
}
