use crate::error::ProviderError;
use crate::http::get_json;
use crate::types::{Query, SearchOptions};
use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;

/// YouTube Data API search restricted to videos.
pub async fn video_search(
    client: &Client,
    endpoint: &Url,
    query: &Query,
    key: &str,
    options: &SearchOptions,
) -> Result<Value, ProviderError> {
    info!("Video search for: {}", query);
    let params = [
        ("q", query.as_str().to_string()),
        ("key", key.to_string()),
        ("part", "snippet".to_string()),
        ("maxResults", options.video_count().to_string()),
        ("type", "video".to_string()),
    ];
    get_json(client, endpoint, &params).await
}
