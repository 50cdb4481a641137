//! Dispatcher behaviour against mocked providers.

mod common;

use common::*;
use genie::dispatch::{DispatchMode, Dispatcher};
use genie::error::GenieError;
use genie::{Credentials, Query, SearchOptions, Source};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(server: &MockServer, mode: DispatchMode) -> Dispatcher {
    let config = config_for(server);
    Dispatcher::new(reqwest::Client::new(), config.endpoints, mode)
}

fn options(results_per_tab: u8) -> SearchOptions {
    SearchOptions {
        results_per_tab,
        ai_enabled: true,
        safe_search: true,
    }
}

#[tokio::test]
async fn penguins_example_fills_every_tab_within_limits() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    assert_eq!(bundle.query, "penguins");
    assert!(bundle.notices.is_empty(), "unexpected notices: {:?}", bundle.notices);

    let web = bundle.web.items();
    assert_eq!(web.len(), 3);
    for result in web {
        assert!(!result.title.is_empty());
        assert!(!result.link.is_empty());
    }
    assert_eq!(web[0].title, "p web 0");
    assert_eq!(web[0].meta_description, "p description 0");

    assert_eq!(bundle.images.items().len(), 6);
    assert_eq!(bundle.images.items()[0].thumbnail, "https://img.example.com/p/0_t.jpg");

    let videos = bundle.videos.items();
    assert_eq!(videos.len(), 3);
    for video in videos {
        assert!(!video.video_id.is_empty());
        assert_eq!(
            video.embed_url(),
            format!("https://www.youtube.com/embed/{}", video.video_id)
        );
    }

    assert_eq!(bundle.ai_answer.as_deref(), Some("- p summary"));
    assert!(bundle.search_time_secs >= 0.0);
}

#[tokio::test]
async fn requests_carry_count_safe_flag_and_keys() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    let google = requests_to(&server, GOOGLE_PATH).await;
    assert_eq!(google.len(), 2);
    let web = google
        .iter()
        .find(|r| param(r, "searchType").is_none())
        .expect("web request");
    assert_eq!(param(web, "num").as_deref(), Some("3"));
    assert_eq!(param(web, "safe").as_deref(), Some("active"));
    assert_eq!(param(web, "key").as_deref(), Some("google-key"));
    assert_eq!(param(web, "cx").as_deref(), Some("engine-id"));

    let image = google
        .iter()
        .find(|r| param(r, "searchType").as_deref() == Some("image"))
        .expect("image request");
    assert_eq!(param(image, "num").as_deref(), Some("6"));
    assert_eq!(param(image, "safe").as_deref(), Some("active"));

    let youtube = requests_to(&server, YOUTUBE_PATH).await;
    assert_eq!(youtube.len(), 1);
    assert_eq!(param(&youtube[0], "maxResults").as_deref(), Some("3"));
    assert_eq!(param(&youtube[0], "type").as_deref(), Some("video"));
    assert_eq!(param(&youtube[0], "part").as_deref(), Some("snippet"));
    assert_eq!(param(&youtube[0], "key").as_deref(), Some("youtube-key"));

    let openai = requests_to(&server, OPENAI_PATH).await;
    assert_eq!(openai.len(), 1);
    let auth = openai[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(auth.as_deref(), Some("Bearer openai-key"));
    let body: Value = serde_json::from_slice(&openai[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["temperature"], json!(0.7));
    assert_eq!(body["max_tokens"], 300);
    assert_eq!(body["messages"][1]["content"], "penguins");
}

#[tokio::test]
async fn sequential_mode_calls_web_images_videos_then_ai() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    let order: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| match (r.url.path(), param(r, "searchType")) {
            (GOOGLE_PATH, Some(kind)) => format!("google:{kind}"),
            (GOOGLE_PATH, None) => "google:web".to_string(),
            (other, _) => other.to_string(),
        })
        .collect();
    assert_eq!(order, ["google:web", "google:image", YOUTUBE_PATH, OPENAI_PATH]);
}

#[tokio::test]
async fn safe_search_off_and_query_encoding_are_forwarded() {
    let server = MockServer::start().await;
    let text = "rust & go? 100%";
    mount_providers(&server, text, "r").await;

    let query = Query::new(text).unwrap();
    let opts = SearchOptions {
        safe_search: false,
        ..options(2)
    };
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &opts)
        .await
        .unwrap();

    assert_eq!(bundle.web.items().len(), 2);
    assert_eq!(bundle.images.items().len(), 4);
    for request in requests_to(&server, GOOGLE_PATH).await {
        assert_eq!(param(&request, "q").as_deref(), Some(text));
        assert_eq!(param(&request, "safe").as_deref(), Some("off"));
    }
}

#[tokio::test]
async fn missing_google_credentials_send_nothing() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    let mut creds = full_credentials();
    creds.search_engine_id = None;

    let err = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &creds, &options(3))
        .await
        .unwrap_err();

    assert!(matches!(err, GenieError::MissingCredentials));
    assert_eq!(err.to_string(), "Please provide all required API keys");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn failing_provider_only_empties_its_own_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("searchType", "image"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    assert!(bundle.images.is_failed());
    assert!(bundle.images.items().is_empty());
    assert_eq!(bundle.web.items().len(), 3);
    assert_eq!(bundle.videos.items().len(), 3);
    assert!(bundle.ai_answer.is_some());

    assert_eq!(bundle.notices.len(), 1);
    let notice = &bundle.notices[0];
    assert_eq!(notice.source, Source::Images);
    assert!(notice.message.starts_with("Image search error: "));
    assert!(notice.message.contains("500"));
}

#[tokio::test]
async fn malformed_video_response_fails_videos_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(YOUTUBE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": {"kind": "youtube#channel", "channelId": "UC1"}, "snippet": {"title": "x"}}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    assert!(bundle.videos.is_failed());
    assert_eq!(bundle.web.items().len(), 3);
    assert_eq!(bundle.notices.len(), 1);
    assert!(bundle.notices[0].message.starts_with("Video search error: "));
}

#[tokio::test]
async fn non_json_body_is_reported_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let query = Query::new("penguins").unwrap();
    let creds = Credentials {
        google_api_key: Some("k".into()),
        search_engine_id: Some("cx".into()),
        ..Default::default()
    };
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &creds, &options(3))
        .await
        .unwrap();

    assert!(bundle.web.is_failed());
    assert!(bundle.images.is_failed());
    assert!(bundle.videos.is_skipped());
    assert_eq!(bundle.notices.len(), 2);
    assert!(bundle.notices[0].message.starts_with("Search error: "));
}

#[tokio::test]
async fn ai_answer_absent_when_disabled_or_keyless() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;
    let query = Query::new("penguins").unwrap();
    let dispatcher = dispatcher(&server, DispatchMode::Sequential);

    let disabled = SearchOptions {
        ai_enabled: false,
        ..options(3)
    };
    let bundle = dispatcher
        .dispatch(&query, &full_credentials(), &disabled)
        .await
        .unwrap();
    assert!(bundle.ai_answer.is_none());

    let mut keyless = full_credentials();
    keyless.openai_api_key = None;
    let bundle = dispatcher.dispatch(&query, &keyless, &options(3)).await.unwrap();
    assert!(bundle.ai_answer.is_none());
    assert!(bundle.notices.is_empty());

    assert!(requests_to(&server, OPENAI_PATH).await.is_empty());
}

#[tokio::test]
async fn ai_failure_is_a_notice_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_providers(&server, "penguins", "p").await;

    let query = Query::new("penguins").unwrap();
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(3))
        .await
        .unwrap();

    assert!(bundle.ai_answer.is_none());
    assert_eq!(bundle.web.items().len(), 3);
    assert_eq!(bundle.notices.len(), 1);
    assert_eq!(bundle.notices[0].source, Source::Ai);
    assert!(bundle.notices[0].message.starts_with("AI error: "));
    assert_eq!(requests_to(&server, OPENAI_PATH).await.len(), 1);
}

#[tokio::test]
async fn missing_youtube_key_skips_videos_silently() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;

    let mut creds = full_credentials();
    creds.youtube_api_key = Some("   ".into());
    let query = Query::new("penguins").unwrap();
    let bundle = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &creds, &options(3))
        .await
        .unwrap();

    assert!(bundle.videos.is_skipped());
    assert!(bundle.notices.is_empty());
    assert!(requests_to(&server, YOUTUBE_PATH).await.is_empty());
}

#[tokio::test]
async fn concurrent_mode_yields_the_same_bundle_shape() {
    let server = MockServer::start().await;
    mount_providers(&server, "penguins", "p").await;
    let query = Query::new("penguins").unwrap();

    let sequential = dispatcher(&server, DispatchMode::Sequential)
        .dispatch(&query, &full_credentials(), &options(4))
        .await
        .unwrap();
    let concurrent = dispatcher(&server, DispatchMode::Concurrent)
        .dispatch(&query, &full_credentials(), &options(4))
        .await
        .unwrap();

    assert_eq!(sequential.web, concurrent.web);
    assert_eq!(sequential.images, concurrent.images);
    assert_eq!(sequential.videos, concurrent.videos);
    assert_eq!(sequential.ai_answer, concurrent.ai_answer);
    assert_eq!(concurrent.images.items().len(), 8);
}
