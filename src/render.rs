//! Per-tab views of a bundle, plus a markdown rendering for text surfaces.

use crate::types::{ResultBundle, ResultItem, SourceOutcome, Tab};
use serde::{Deserialize, Serialize};

pub const IDLE_MESSAGE: &str = "What knowledge do you seek today?";
pub const NO_RESULTS_MESSAGE: &str = "No results found.";
pub const NO_VIDEOS_MESSAGE: &str = "No videos found. Try a different search query.";
pub const VIDEOS_UNAVAILABLE_MESSAGE: &str = "YouTube API key not provided. Video search unavailable.";

const IMAGE_TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabStatus {
    /// No query has been run yet.
    Idle,
    Results,
    NoResults,
    /// The provider was not called.
    Unavailable,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabView {
    pub tab: Tab,
    pub status: TabStatus,
    pub caption: Option<String>,
    pub message: Option<String>,
    pub items: Vec<ResultItem>,
}

pub fn tab_view(bundle: &ResultBundle, tab: Tab) -> TabView {
    let view = |status, caption: Option<String>, message: Option<&str>| TabView {
        tab,
        status,
        caption,
        message: message.map(str::to_string),
        items: bundle.items(tab).unwrap_or_default(),
    };

    if bundle.is_empty() {
        return view(TabStatus::Idle, None, Some(IDLE_MESSAGE));
    }

    let (skipped, failure) = match tab {
        Tab::Web => outcome_state(&bundle.web),
        Tab::Images => outcome_state(&bundle.images),
        Tab::Videos => outcome_state(&bundle.videos),
    };
    let empty_message = match tab {
        Tab::Videos => NO_VIDEOS_MESSAGE,
        _ => NO_RESULTS_MESSAGE,
    };

    if skipped {
        return match tab {
            Tab::Videos => view(TabStatus::Unavailable, None, Some(VIDEOS_UNAVAILABLE_MESSAGE)),
            _ => view(TabStatus::NoResults, None, Some(empty_message)),
        };
    }
    if let Some(reason) = failure {
        return view(TabStatus::Failed, None, Some(reason));
    }
    match bundle.count(tab) {
        0 => view(TabStatus::NoResults, None, Some(empty_message)),
        _ => view(TabStatus::Results, Some(caption(bundle, tab)), None),
    }
}

fn outcome_state<T>(outcome: &SourceOutcome<T>) -> (bool, Option<&str>) {
    match outcome {
        SourceOutcome::Skipped => (true, None),
        SourceOutcome::Failed { reason } => (false, Some(reason.as_str())),
        SourceOutcome::Ok { .. } => (false, None),
    }
}

pub fn caption(bundle: &ResultBundle, tab: Tab) -> String {
    let noun = match tab {
        Tab::Web => "web results",
        Tab::Images => "images",
        Tab::Videos => "videos",
    };
    format!(
        "Found {} {} in {}s",
        bundle.count(tab),
        noun,
        bundle.search_time_secs
    )
}

/// Image titles are hidden when they are the generic "Image" and shortened
/// past 50 characters.
pub fn image_caption(title: &str) -> Option<String> {
    if title.is_empty() || title == "Image" {
        return None;
    }
    if title.chars().count() > IMAGE_TITLE_MAX_CHARS {
        let short: String = title.chars().take(IMAGE_TITLE_MAX_CHARS).collect();
        Some(format!("{}...", short))
    } else {
        Some(title.to_string())
    }
}

pub fn render_markdown(bundle: &ResultBundle, tab: Tab) -> String {
    let view = tab_view(bundle, tab);
    let mut out = String::new();

    if let Some(caption) = &view.caption {
        out.push_str(&format!("_{}_\n\n", caption));
    }
    if let Some(message) = &view.message {
        out.push_str(&format!("{}\n\n", message));
    }

    if tab == Tab::Web && view.status == TabStatus::Results {
        if let Some(answer) = &bundle.ai_answer {
            out.push_str(&format!("#### AI Summary\n\n{}\n\n", answer.trim()));
        }
    }

    for item in &view.items {
        match item {
            ResultItem::Web(result) => {
                out.push_str(&format!("### [{}]({})\n", result.title, result.link));
                out.push_str(&format!("{}\n\n", result.link));
                if !result.snippet.is_empty() {
                    out.push_str(&format!("{}\n\n", result.snippet));
                }
                if !result.meta_description.is_empty() {
                    out.push_str(&format!("*{}*\n\n", result.meta_description));
                }
                out.push_str("---\n");
            }
            ResultItem::Image(image) => {
                let alt = image_caption(&image.title);
                out.push_str(&format!("![{}]({})\n", alt.as_deref().unwrap_or(""), image.display_src()));
                if let Some(alt) = alt {
                    out.push_str(&format!("{}\n", alt));
                }
                out.push('\n');
            }
            ResultItem::Video(video) => {
                out.push_str(&format!("### {}\n", video.title));
                out.push_str(&format!("{}\n", video.embed_url()));
                out.push_str(&format!("Channel: {}\n\n", video.channel));
                out.push_str("---\n");
            }
        }
    }

    out
}

/// Every tab in order, each under its own heading.
pub fn render_all(bundle: &ResultBundle) -> String {
    Tab::ALL
        .iter()
        .map(|tab| format!("## {}\n\n{}", tab, render_markdown(bundle, *tab)))
        .collect::<Vec<_>>()
        .join("\n")
}
