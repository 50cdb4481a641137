pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod google;
pub mod http;
pub mod openai;
pub mod render;
pub mod server;
pub mod session;
pub mod types;
pub mod youtube;

use config::GenieConfig;
use dispatch::Dispatcher;
use session::{Session, SessionStore};
use uuid::Uuid;

pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: GenieConfig,
    pub dispatcher: Dispatcher,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: GenieConfig) -> anyhow::Result<Self> {
        let dispatcher = Dispatcher::from_config(&config)?;
        let sessions = SessionStore::new(config.session_idle);
        Ok(Self {
            config,
            dispatcher,
            sessions,
        })
    }

    /// One-shot search. Missing credentials and options fall back to the
    /// server defaults.
    pub async fn search(&self, request: SearchRequest) -> error::Result<ResultBundle> {
        let query = Query::new(request.query)?;
        let credentials = request.credentials.or(&self.config.default_credentials);
        let options = request.options.unwrap_or(self.config.default_options);
        self.dispatcher.dispatch(&query, &credentials, &options).await
    }

    /// Search and replace the session's bundle. On error the session keeps
    /// whatever it showed before.
    pub async fn search_in_session(&self, id: Uuid, request: SearchRequest) -> error::Result<Session> {
        let ticket = self.sessions.begin_search(id).await?;
        let bundle = self.search(request).await?;
        self.sessions.store_bundle(id, ticket, bundle).await
    }
}
