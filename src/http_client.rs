use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenManager;
use crate::error::{HealthCrmError, Result};
use crate::query::QueryParams;

/// Authenticated HTTP transport for the Health CRM API
/// Attaches the current bearer token and JSON headers to every call
pub struct CrmHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Source of the bearer token
    token_manager: Arc<TokenManager>,

    /// API base URL without trailing slash
    base_url: String,
}

impl CrmHttpClient {
    /// Create a new HTTP client
    pub fn new(
        token_manager: Arc<TokenManager>,
        base_url: &str,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| HealthCrmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_manager,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute one authenticated request and hand back the raw response
    ///
    /// Only GET, POST and PATCH are accepted; anything else fails before the
    /// token is read or a connection is opened. The body is ignored for GET.
    /// There are no retries.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        if method != Method::GET && method != Method::POST && method != Method::PATCH {
            return Err(HealthCrmError::UnsupportedMethod(method));
        }

        let payload = match body {
            Some(body) if method != Method::GET => Some(
                serde_json::to_vec(body).map_err(|e| HealthCrmError::Serialize(e.to_string()))?,
            ),
            _ => None,
        };

        let token = self.token_manager.access_token().await?;
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(method = %method, url = %url, "Sending Health CRM request");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&token);

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            builder = builder.query(query);
        }

        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                method = %method,
                url = %url,
                timeout = e.is_timeout(),
                connect = e.is_connect(),
                "Health CRM request error: {}",
                e
            );
            HealthCrmError::Transport(e)
        })?;

        tracing::debug!(status = %response.status(), url = %url, "Received Health CRM response");

        Ok(response)
    }

    pub async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Response> {
        self.request::<()>(Method::GET, path, query, None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, None, Some(body)).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }
}

/// Check the status against the single expected code and decode the body
///
/// Any other status yields `Status` carrying the raw body text.
pub async fn expect_json<T>(response: Response, expected: StatusCode) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if status != expected {
        tracing::error!(
            status = status.as_u16(),
            expected = expected.as_u16(),
            response_body = %body,
            "Health CRM request failed"
        );
        return Err(HealthCrmError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
