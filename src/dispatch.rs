use crate::aggregate::{aggregate, RawResponses};
use crate::config::{Endpoints, GenieConfig};
use crate::error::{GenieError, Result};
use crate::types::{Credentials, Query, ResultBundle, SearchOptions};
use crate::{google, openai, youtube};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Calls run one after another: web, images, videos, AI.
    #[default]
    Sequential,
    /// All calls are polled together and joined before aggregation.
    Concurrent,
}

/// Fans one query out to every enabled provider and aggregates the outcomes.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    endpoints: Endpoints,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(client: Client, endpoints: Endpoints, mode: DispatchMode) -> Self {
        Self {
            client,
            endpoints,
            mode,
        }
    }

    pub fn from_config(config: &GenieConfig) -> anyhow::Result<Self> {
        let mode = if config.concurrent_dispatch {
            DispatchMode::Concurrent
        } else {
            DispatchMode::Sequential
        };
        Ok(Self::new(config.http_client()?, config.endpoints.clone(), mode))
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Run every enabled provider call for `query`.
    ///
    /// Without a Google key and engine id nothing is sent and
    /// [`GenieError::MissingCredentials`] is returned. The video and AI calls
    /// are skipped when their key is absent (and AI also when disabled).
    /// Provider failures never surface as errors here; they become `Failed`
    /// outcomes and notices inside the returned bundle.
    pub async fn dispatch(
        &self,
        query: &Query,
        credentials: &Credentials,
        options: &SearchOptions,
    ) -> Result<ResultBundle> {
        options.validate()?;
        let Some(google_keys) = credentials.google() else {
            warn!("Google API key or search engine id missing, search not dispatched");
            return Err(GenieError::MissingCredentials);
        };

        info!("Dispatching query: {} ({:?})", query, self.mode);
        let started = Instant::now();

        let web = async {
            Some(
                google::web_search(
                    &self.client,
                    &self.endpoints.google_search_url,
                    query,
                    google_keys,
                    options,
                )
                .await,
            )
        };
        let images = async {
            Some(
                google::image_search(
                    &self.client,
                    &self.endpoints.google_search_url,
                    query,
                    google_keys,
                    options,
                )
                .await,
            )
        };
        let videos = async {
            match credentials.youtube() {
                Some(key) => Some(
                    youtube::video_search(
                        &self.client,
                        &self.endpoints.youtube_search_url,
                        query,
                        key,
                        options,
                    )
                    .await,
                ),
                None => {
                    debug!("no YouTube key, video search skipped");
                    None
                }
            }
        };
        let ai = async {
            match credentials.openai().filter(|_| options.ai_enabled) {
                Some(key) => Some(openai::summarize(&self.client, &self.endpoints, query, key).await),
                None => {
                    debug!("AI answer disabled or no key, skipped");
                    None
                }
            }
        };

        let raw = match self.mode {
            DispatchMode::Sequential => {
                let web = web.await;
                let images = images.await;
                let videos = videos.await;
                let ai = ai.await;
                RawResponses {
                    web,
                    images,
                    videos,
                    ai,
                }
            }
            DispatchMode::Concurrent => {
                let (web, images, videos, ai) = futures::join!(web, images, videos, ai);
                RawResponses {
                    web,
                    images,
                    videos,
                    ai,
                }
            }
        };

        let bundle = aggregate(query, options, raw, started.elapsed());
        info!(
            "Query '{}' finished in {}s: {} web, {} images, {} videos, {} notices",
            query,
            bundle.search_time_secs,
            bundle.web.items().len(),
            bundle.images.items().len(),
            bundle.videos.items().len(),
            bundle.notices.len()
        );
        Ok(bundle)
    }
}
