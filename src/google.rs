//! Google Custom Search: web and image results.

use crate::error::ProviderError;
use crate::http::get_json;
use crate::types::{Query, SearchOptions};
use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;

fn search_params(
    query: &Query,
    key: &str,
    engine_id: &str,
    num: usize,
    options: &SearchOptions,
) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.as_str().to_string()),
        ("key", key.to_string()),
        ("cx", engine_id.to_string()),
        ("num", num.to_string()),
        ("safe", options.safe_setting().to_string()),
    ]
}

pub async fn web_search(
    client: &Client,
    endpoint: &Url,
    query: &Query,
    (key, engine_id): (&str, &str),
    options: &SearchOptions,
) -> Result<Value, ProviderError> {
    info!("Web search for: {}", query);
    let params = search_params(query, key, engine_id, options.web_count(), options);
    get_json(client, endpoint, &params).await
}

pub async fn image_search(
    client: &Client,
    endpoint: &Url,
    query: &Query,
    (key, engine_id): (&str, &str),
    options: &SearchOptions,
) -> Result<Value, ProviderError> {
    info!("Image search for: {}", query);
    let mut params = search_params(query, key, engine_id, options.image_count(), options);
    params.push(("searchType", "image".to_string()));
    get_json(client, endpoint, &params).await
}
