use crate::types::{Credentials, SearchOptions};
use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

/// Where each provider lives. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub google_search_url: Url,
    pub youtube_search_url: Url,
    pub openai_base_url: Url,
    pub openai_model: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_search_url: Url::parse(DEFAULT_GOOGLE_SEARCH_URL).expect("valid default url"),
            youtube_search_url: Url::parse(DEFAULT_YOUTUBE_SEARCH_URL).expect("valid default url"),
            openai_base_url: Url::parse(DEFAULT_OPENAI_BASE_URL).expect("valid default url"),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenieConfig {
    pub bind_addr: SocketAddr,
    pub endpoints: Endpoints,
    /// Server-side keys used for any field a request leaves out.
    pub default_credentials: Credentials,
    /// Options applied when a request does not carry its own.
    pub default_options: SearchOptions,
    pub concurrent_dispatch: bool,
    pub session_idle: Duration,
    /// `None` keeps the HTTP client's own default.
    pub http_timeout: Option<Duration>,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("valid default bind addr"),
            endpoints: Endpoints::default(),
            default_credentials: Credentials::default(),
            default_options: SearchOptions::default(),
            concurrent_dispatch: false,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            http_timeout: None,
        }
    }
}

impl GenieConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset and blank values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get("GENIE_BIND_ADDR") {
            Some(v) => v
                .parse()
                .with_context(|| format!("GENIE_BIND_ADDR is not a socket address: {}", v))?,
            None => defaults.bind_addr,
        };

        let parse_url = |key: &str, fallback: Url| -> Result<Url> {
            match get(key) {
                Some(v) => {
                    let url = Url::parse(&v).with_context(|| format!("{} is not a valid URL", key))?;
                    if url.scheme() != "http" && url.scheme() != "https" {
                        return Err(anyhow!("{} must use http or https", key));
                    }
                    Ok(url)
                }
                None => Ok(fallback),
            }
        };

        let endpoints = Endpoints {
            google_search_url: parse_url("GOOGLE_SEARCH_URL", defaults.endpoints.google_search_url)?,
            youtube_search_url: parse_url("YOUTUBE_SEARCH_URL", defaults.endpoints.youtube_search_url)?,
            openai_base_url: parse_url("OPENAI_BASE_URL", defaults.endpoints.openai_base_url)?,
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.endpoints.openai_model),
        };

        let default_credentials = Credentials {
            google_api_key: get("GOOGLE_API_KEY"),
            search_engine_id: get("GOOGLE_SEARCH_ENGINE_ID"),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
        };

        let mut default_options = defaults.default_options;
        if let Some(v) = get("GENIE_RESULTS_PER_TAB") {
            default_options.results_per_tab = v
                .parse()
                .with_context(|| format!("GENIE_RESULTS_PER_TAB is not a number: {}", v))?;
        }
        if let Some(v) = get("GENIE_AI_ENABLED") {
            default_options.ai_enabled =
                parse_bool(&v).ok_or_else(|| anyhow!("GENIE_AI_ENABLED must be true or false, got {}", v))?;
        }
        if let Some(v) = get("GENIE_SAFE_SEARCH") {
            default_options.safe_search =
                parse_bool(&v).ok_or_else(|| anyhow!("GENIE_SAFE_SEARCH must be true or false, got {}", v))?;
        }
        default_options.validate()?;

        let concurrent_dispatch = match get("GENIE_CONCURRENT_DISPATCH") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow!("GENIE_CONCURRENT_DISPATCH must be true or false, got {}", v))?,
            None => defaults.concurrent_dispatch,
        };

        let session_idle = match get("GENIE_SESSION_IDLE_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("GENIE_SESSION_IDLE_SECS is not a number: {}", v))?,
            ),
            None => defaults.session_idle,
        };

        let http_timeout = match get("GENIE_HTTP_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.parse()
                    .with_context(|| format!("GENIE_HTTP_TIMEOUT_SECS is not a number: {}", v))?,
            )),
            None => None,
        };

        Ok(Self {
            bind_addr,
            endpoints,
            default_credentials,
            default_options,
            concurrent_dispatch,
            session_idle,
            http_timeout,
        })
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(concat!("genie/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
