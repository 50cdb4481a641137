//! Turns raw provider responses into a [`ResultBundle`].
//!
//! Extraction is format-only: each provider's list keeps its own order, is cut
//! to the requested count, and optional fields that are missing become empty
//! strings. Nothing is ranked, deduplicated or merged across sources.

use crate::error::ProviderError;
use crate::types::{
    GoogleItem, GoogleSearchResponse, ImageResult, Notice, Query, ResultBundle, SearchOptions,
    Source, SourceOutcome, VideoResult, WebResult, YoutubeSearchResponse,
};
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// What each provider call returned. `None` means the call was not attempted.
#[derive(Debug, Default)]
pub struct RawResponses {
    pub web: Option<Result<Value, ProviderError>>,
    pub images: Option<Result<Value, ProviderError>>,
    pub videos: Option<Result<Value, ProviderError>>,
    pub ai: Option<Result<String, ProviderError>>,
}

pub fn aggregate(
    query: &Query,
    options: &SearchOptions,
    raw: RawResponses,
    elapsed: Duration,
) -> ResultBundle {
    let mut notices = Vec::new();

    let web = settle(Source::Web, raw.web, &mut notices, |body| {
        extract_web(body, options.web_count())
    });
    let images = settle(Source::Images, raw.images, &mut notices, |body| {
        extract_images(body, options.image_count())
    });
    let videos = settle(Source::Videos, raw.videos, &mut notices, |body| {
        extract_videos(body, options.video_count())
    });

    let ai_answer = match raw.ai {
        Some(Ok(answer)) => Some(answer),
        Some(Err(e)) => {
            warn!(source = "ai", error = %e, "provider call failed");
            notices.push(Notice::error(Source::Ai, failure_message(Source::Ai, &e)));
            None
        }
        None => None,
    };

    ResultBundle {
        id: Uuid::new_v4(),
        query: query.as_str().to_string(),
        web,
        images,
        videos,
        ai_answer,
        notices,
        search_time_secs: round_secs(elapsed),
        created_at: Utc::now(),
    }
}

fn settle<T, F>(
    source: Source,
    raw: Option<Result<Value, ProviderError>>,
    notices: &mut Vec<Notice>,
    extract: F,
) -> SourceOutcome<T>
where
    F: FnOnce(Value) -> Result<Vec<T>, ProviderError>,
{
    let Some(raw) = raw else {
        return SourceOutcome::Skipped;
    };

    match raw.and_then(extract) {
        Ok(items) => {
            debug!(?source, count = items.len(), "provider returned results");
            SourceOutcome::Ok { items }
        }
        Err(e) => {
            warn!(?source, error = %e, "provider call failed");
            notices.push(Notice::error(source, failure_message(source, &e)));
            SourceOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// The user-facing message for a failed call, named after its subsystem.
pub fn failure_message(source: Source, error: &ProviderError) -> String {
    let label = match source {
        Source::Web => "Search error",
        Source::Images => "Image search error",
        Source::Videos => "Video search error",
        Source::Ai => "AI error",
    };
    format!("{}: {}", label, error)
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

fn parse_google(body: Value) -> Result<Vec<GoogleItem>, ProviderError> {
    let response: GoogleSearchResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("search response: {}", e)))?;
    Ok(response.items)
}

pub fn extract_web(body: Value, limit: usize) -> Result<Vec<WebResult>, ProviderError> {
    Ok(parse_google(body)?
        .into_iter()
        .take(limit)
        .map(|item| {
            let meta_description = item
                .pagemap
                .as_ref()
                .and_then(|pagemap| pagemap.metatags.first())
                .and_then(|tags| tags.get("og:description"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            WebResult {
                title: item.title.unwrap_or_default(),
                link: item.link.unwrap_or_default(),
                snippet: item.snippet.unwrap_or_default(),
                meta_description,
            }
        })
        .collect())
}

pub fn extract_images(body: Value, limit: usize) -> Result<Vec<ImageResult>, ProviderError> {
    Ok(parse_google(body)?
        .into_iter()
        .take(limit)
        .map(|item| ImageResult {
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            thumbnail: item
                .image
                .and_then(|image| image.thumbnail_link)
                .unwrap_or_default(),
            context: item.snippet.unwrap_or_default(),
        })
        .collect())
}

/// Every field of a video item is required; one incomplete item fails the
/// whole source.
pub fn extract_videos(body: Value, limit: usize) -> Result<Vec<VideoResult>, ProviderError> {
    let response: YoutubeSearchResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("video response: {}", e)))?;
    Ok(response
        .items
        .into_iter()
        .take(limit)
        .map(|item| VideoResult {
            title: item.snippet.title,
            video_id: item.id.video_id,
            thumbnail: item.snippet.thumbnails.high.url,
            channel: item.snippet.channel_title,
        })
        .collect())
}
