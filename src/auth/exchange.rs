// OAuth2 token exchange against the Health CRM auth server

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;

use super::types::{Credentials, OAuthResponse, TokenData};

/// Exchange the primary credentials for a fresh token pair
pub async fn login(client: &Client, creds: &Credentials) -> Result<TokenData> {
    tracing::info!("Logging in to Health CRM auth server...");

    let form = [
        ("grant_type", creds.grant_type.as_str()),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("username", creds.username.as_str()),
        ("password", creds.password.as_str()),
    ];

    let data = request_token(client, creds, &form, "login").await?;

    tracing::info!(
        "Logged in to Health CRM, token expires: {}",
        data.expires_at.to_rfc3339()
    );

    Ok(data)
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(client: &Client, creds: &Credentials, refresh_token: &str) -> Result<TokenData> {
    tracing::info!("Refreshing Health CRM access token...");

    if refresh_token.is_empty() {
        anyhow::bail!("No refresh token available");
    }

    let form = [
        ("grant_type", "refresh_token"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("refresh_token", refresh_token),
    ];

    let data = request_token(client, creds, &form, "refresh").await?;

    tracing::info!(
        "Health CRM token refreshed, expires: {}",
        data.expires_at.to_rfc3339()
    );

    Ok(data)
}

async fn request_token(
    client: &Client,
    creds: &Credentials,
    form: &[(&str, &str)],
    action: &str,
) -> Result<TokenData> {
    let url = creds.token_url();

    tracing::debug!(
        "Token {} request: url={}, client_id={}...",
        action,
        url,
        creds.client_id.get(..8).unwrap_or(creds.client_id.as_str())
    );

    let response = client
        .post(&url)
        .header("Accept", "application/json")
        .form(form)
        .send()
        .await
        .with_context(|| format!("Failed to send token {} request", action))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            "Token {} failed: status={}, body={}",
            action,
            status,
            error_text
        );

        // OAuth2 servers describe the failure in `error` / `error_description`
        if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text) {
            if let Some(error_code) = error_json.get("error").and_then(|v| v.as_str()) {
                let description = error_json
                    .get("error_description")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                anyhow::bail!(
                    "Token {} failed: {} - {} {}",
                    action,
                    status,
                    error_code,
                    description
                );
            }
        }

        anyhow::bail!("Token {} failed: {} - {}", action, status, error_text);
    }

    let data: OAuthResponse = response
        .json()
        .await
        .with_context(|| format!("Failed to parse token {} response", action))?;

    if data.access_token.is_empty() {
        anyhow::bail!("Token {} response does not contain access_token", action);
    }

    Ok(TokenData::from_response(data, Utc::now()))
}
