//! Thin JSON helpers shared by the provider calls.

use crate::error::ProviderError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Longest slice of an error body kept in a failure reason.
const MAX_ERROR_BODY: usize = 200;

pub async fn get_json(
    client: &Client,
    url: &Url,
    params: &[(&str, String)],
) -> Result<Value, ProviderError> {
    debug!("GET {}", url);
    let response = client
        .get(url.clone())
        .query(params)
        .header("Accept", "application/json")
        .send()
        .await?;
    read_json(response).await
}

pub async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    bearer: &str,
    body: &B,
) -> Result<Value, ProviderError> {
    debug!("POST {}", url);
    let response = client
        .post(url)
        .bearer_auth(bearer)
        .header("Accept", "application/json")
        .json(body)
        .send()
        .await?;
    read_json(response).await
}

async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text: String = text.chars().take(MAX_ERROR_BODY).collect();
        return Err(ProviderError::Transport(format!(
            "status {}: {}",
            status,
            text.trim()
        )));
    }

    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ProviderError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}
