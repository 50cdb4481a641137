#![allow(dead_code)]

use genie::config::{Endpoints, GenieConfig};
use genie::Credentials;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const GOOGLE_PATH: &str = "/customsearch/v1";
pub const YOUTUBE_PATH: &str = "/youtube/v3/search";
pub const OPENAI_PATH: &str = "/v1/chat/completions";

/// Providers in these tests always return more items than were asked for.
pub const PROVIDER_PAGE: usize = 10;

pub fn config_for(server: &MockServer) -> GenieConfig {
    GenieConfig {
        endpoints: Endpoints {
            google_search_url: Url::parse(&format!("{}{}", server.uri(), GOOGLE_PATH)).unwrap(),
            youtube_search_url: Url::parse(&format!("{}{}", server.uri(), YOUTUBE_PATH)).unwrap(),
            openai_base_url: Url::parse(&format!("{}/v1", server.uri())).unwrap(),
            openai_model: "gpt-4".into(),
        },
        ..GenieConfig::default()
    }
}

pub fn full_credentials() -> Credentials {
    Credentials {
        google_api_key: Some("google-key".into()),
        search_engine_id: Some("engine-id".into()),
        youtube_api_key: Some("youtube-key".into()),
        openai_api_key: Some("openai-key".into()),
    }
}

pub fn web_body(prefix: &str) -> Value {
    let items: Vec<Value> = (0..PROVIDER_PAGE)
        .map(|i| {
            json!({
                "kind": "customsearch#result",
                "title": format!("{prefix} web {i}"),
                "link": format!("https://example.com/{prefix}/{i}"),
                "snippet": format!("About {prefix} {i}"),
                "pagemap": {"metatags": [{"og:description": format!("{prefix} description {i}")}]}
            })
        })
        .collect();
    json!({"kind": "customsearch#search", "items": items})
}

pub fn image_body(prefix: &str) -> Value {
    let items: Vec<Value> = (0..PROVIDER_PAGE)
        .map(|i| {
            json!({
                "title": format!("{prefix} image {i}"),
                "link": format!("https://img.example.com/{prefix}/{i}.jpg"),
                "snippet": format!("{prefix} picture {i}"),
                "image": {"thumbnailLink": format!("https://img.example.com/{prefix}/{i}_t.jpg")}
            })
        })
        .collect();
    json!({"items": items})
}

pub fn video_body(prefix: &str) -> Value {
    let items: Vec<Value> = (0..PROVIDER_PAGE)
        .map(|i| {
            json!({
                "kind": "youtube#searchResult",
                "id": {"kind": "youtube#video", "videoId": format!("{prefix}vid{i}")},
                "snippet": {
                    "title": format!("{prefix} video {i}"),
                    "channelTitle": format!("{prefix} channel"),
                    "thumbnails": {"high": {"url": format!("https://i.ytimg.com/vi/{prefix}vid{i}/hqdefault.jpg")}}
                }
            })
        })
        .collect();
    json!({"items": items})
}

pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

/// Mount healthy responses for every provider, keyed on the query text.
pub async fn mount_providers(server: &MockServer, query: &str, prefix: &str) {
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("q", query))
        .and(query_param("searchType", "image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body(prefix)))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_body(prefix)))
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(YOUTUBE_PATH))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_body(prefix)))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .and(body_string_contains(serde_json::to_string(query).unwrap()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body(&format!("- {prefix} summary"))),
        )
        .mount(server)
        .await;
}

pub fn param(request: &Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}
