use crate::error::{GenieError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub const MIN_RESULTS_PER_TAB: u8 = 1;
pub const MAX_RESULTS_PER_TAB: u8 = 10;
pub const DEFAULT_RESULTS_PER_TAB: u8 = 3;

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// A submitted search query, forwarded to providers exactly as typed.
/// Text that is empty or only whitespace is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GenieError::EmptyQuery);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider keys. Deserialized from requests and the environment but never
/// serialized back out; `Debug` only reports whether each key is set.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub google_api_key: Option<String>,
    #[serde(default)]
    pub search_engine_id: Option<String>,
    #[serde(default)]
    pub youtube_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl Credentials {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Key and engine id for Google Custom Search; both are required.
    pub fn google(&self) -> Option<(&str, &str)> {
        Some((
            Self::present(&self.google_api_key)?,
            Self::present(&self.search_engine_id)?,
        ))
    }

    pub fn youtube(&self) -> Option<&str> {
        Self::present(&self.youtube_api_key)
    }

    pub fn openai(&self) -> Option<&str> {
        Self::present(&self.openai_api_key)
    }

    /// Fill every key missing here from `defaults`.
    pub fn or(self, defaults: &Credentials) -> Credentials {
        fn pick(own: Option<String>, fallback: &Option<String>) -> Option<String> {
            if Credentials::present(&own).is_some() {
                own
            } else {
                fallback.clone()
            }
        }

        Credentials {
            google_api_key: pick(self.google_api_key, &defaults.google_api_key),
            search_engine_id: pick(self.search_engine_id, &defaults.search_engine_id),
            youtube_api_key: pick(self.youtube_api_key, &defaults.youtube_api_key),
            openai_api_key: pick(self.openai_api_key, &defaults.openai_api_key),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if Credentials::present(value).is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("google_api_key", &mask(&self.google_api_key))
            .field("search_engine_id", &mask(&self.search_engine_id))
            .field("youtube_api_key", &mask(&self.youtube_api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub results_per_tab: u8,
    pub ai_enabled: bool,
    pub safe_search: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            results_per_tab: DEFAULT_RESULTS_PER_TAB,
            ai_enabled: true,
            safe_search: true,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_RESULTS_PER_TAB..=MAX_RESULTS_PER_TAB).contains(&self.results_per_tab) {
            return Err(GenieError::InvalidOptions(format!(
                "results_per_tab must be between {} and {}, got {}",
                MIN_RESULTS_PER_TAB, MAX_RESULTS_PER_TAB, self.results_per_tab
            )));
        }
        Ok(())
    }

    pub fn web_count(&self) -> usize {
        self.results_per_tab as usize
    }

    /// Images fill a grid, so twice the per-tab count is requested.
    pub fn image_count(&self) -> usize {
        self.results_per_tab as usize * 2
    }

    pub fn video_count(&self) -> usize {
        self.results_per_tab as usize
    }

    pub fn safe_setting(&self) -> &'static str {
        if self.safe_search {
            "active"
        } else {
            "off"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub meta_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub title: String,
    pub link: String,
    pub thumbnail: String,
    pub context: String,
}

impl ImageResult {
    pub fn display_src(&self) -> &str {
        if self.thumbnail.is_empty() {
            &self.link
        } else {
            &self.thumbnail
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub title: String,
    pub video_id: String,
    pub thumbnail: String,
    pub channel: String,
}

impl VideoResult {
    pub fn embed_url(&self) -> String {
        format!("{}{}", YOUTUBE_EMBED_BASE, self.video_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultItem {
    Web(WebResult),
    Image(ImageResult),
    Video(VideoResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    #[serde(alias = "web")]
    Web,
    #[serde(alias = "images")]
    Images,
    #[serde(alias = "videos")]
    Videos,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Web, Tab::Images, Tab::Videos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Web => "Web",
            Tab::Images => "Images",
            Tab::Videos => "Videos",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subsystem a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Web,
    Images,
    Videos,
    Ai,
}

/// A user-visible message naming the subsystem whose call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub source: Source,
    pub message: String,
}

impl Notice {
    pub fn error(source: Source, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}

/// Outcome of one provider call as stored in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome<T> {
    /// Not attempted, e.g. the provider's key was not supplied.
    Skipped,
    Ok { items: Vec<T> },
    Failed { reason: String },
}

impl<T> Default for SourceOutcome<T> {
    fn default() -> Self {
        SourceOutcome::Skipped
    }
}

impl<T> SourceOutcome<T> {
    /// Items for a successful call; empty for skipped or failed calls.
    pub fn items(&self) -> &[T] {
        match self {
            SourceOutcome::Ok { items } => items,
            _ => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SourceOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SourceOutcome::Failed { .. })
    }
}

/// Everything one query produced, across all tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBundle {
    pub id: Uuid,
    pub query: String,
    pub web: SourceOutcome<WebResult>,
    pub images: SourceOutcome<ImageResult>,
    pub videos: SourceOutcome<VideoResult>,
    pub ai_answer: Option<String>,
    pub notices: Vec<Notice>,
    pub search_time_secs: f64,
    pub created_at: DateTime<Utc>,
}

impl ResultBundle {
    /// The bundle a session starts with, before any query.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            query: String::new(),
            web: SourceOutcome::Skipped,
            images: SourceOutcome::Skipped,
            videos: SourceOutcome::Skipped,
            ai_answer: None,
            notices: Vec::new(),
            search_time_secs: 0.0,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Items shown on `tab`, or `None` when the source was skipped or failed.
    pub fn items(&self, tab: Tab) -> Option<Vec<ResultItem>> {
        fn wrap<T: Clone>(
            outcome: &SourceOutcome<T>,
            f: fn(T) -> ResultItem,
        ) -> Option<Vec<ResultItem>> {
            match outcome {
                SourceOutcome::Ok { items } => Some(items.iter().cloned().map(f).collect()),
                _ => None,
            }
        }

        match tab {
            Tab::Web => wrap(&self.web, ResultItem::Web),
            Tab::Images => wrap(&self.images, ResultItem::Image),
            Tab::Videos => wrap(&self.videos, ResultItem::Video),
        }
    }

    pub fn count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Web => self.web.items().len(),
            Tab::Images => self.images.items().len(),
            Tab::Videos => self.videos.items().len(),
        }
    }
}

impl Default for ResultBundle {
    fn default() -> Self {
        Self::empty()
    }
}

// HTTP API types

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub options: Option<SearchOptions>,
    #[serde(default)]
    pub credentials: Credentials,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub active_tab: Tab,
    pub bundle: ResultBundle,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Google Custom Search API types
#[derive(Debug, Default, Deserialize)]
pub struct GoogleSearchResponse {
    #[serde(default)]
    pub items: Vec<GoogleItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub pagemap: Option<GooglePagemap>,
    #[serde(default)]
    pub image: Option<GoogleImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GooglePagemap {
    #[serde(default)]
    pub metatags: Vec<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleImage {
    #[serde(rename = "thumbnailLink", default)]
    pub thumbnail_link: Option<String>,
}

// YouTube Data API types
#[derive(Debug, Deserialize)]
pub struct YoutubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YoutubeItem>,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeItem {
    pub id: YoutubeId,
    pub snippet: YoutubeSnippet,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeSnippet {
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    pub thumbnails: YoutubeThumbnails,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeThumbnails {
    pub high: YoutubeThumbnail,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeThumbnail {
    pub url: String,
}

// OpenAI chat completion types
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
