use crate::error::{GenieError, Result};
use crate::types::{ResultBundle, SessionSnapshot, Tab};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const MAX_SESSIONS: u64 = 10_000;

/// State one user's interaction carries between queries.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub bundle: ResultBundle,
    pub active_tab: Tab,
    /// Ticket handed to the most recently started search.
    started: u64,
    /// Ticket of the search whose bundle is shown.
    shown: u64,
}

impl Session {
    pub fn snapshot(self, session_id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            session_id,
            active_tab: self.active_tab,
            bundle: self.bundle,
        }
    }
}

/// Sessions keyed by id; idle sessions expire on their own.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Session>,
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::default()).await;
        debug!(%id, "session created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<Session> {
        self.sessions
            .get(&id)
            .await
            .ok_or(GenieError::SessionNotFound(id))
    }

    /// Start a search in the session and return its ticket.
    pub async fn begin_search(&self, id: Uuid) -> Result<u64> {
        let session = self.update(id, |session| session.started += 1).await?;
        Ok(session.started)
    }

    /// Replace the session's bundle wholesale; the active tab is kept. A
    /// bundle from a search started before the one already shown is dropped.
    pub async fn store_bundle(&self, id: Uuid, ticket: u64, bundle: ResultBundle) -> Result<Session> {
        self.update(id, |session| {
            if ticket > session.shown {
                session.bundle = bundle;
                session.shown = ticket;
            } else {
                debug!(%id, ticket, shown = session.shown, "stale bundle dropped");
            }
        })
        .await
    }

    pub async fn set_active_tab(&self, id: Uuid, tab: Tab) -> Result<Session> {
        self.update(id, |session| session.active_tab = tab).await
    }

    /// Apply `f` to a live session in one step; a removed session stays removed.
    async fn update<F>(&self, id: Uuid, f: F) -> Result<Session>
    where
        F: FnOnce(&mut Session) + Send,
    {
        let result = self
            .sessions
            .entry(id)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) => {
                        let mut session = entry.into_value();
                        f(&mut session);
                        Op::Put(session)
                    }
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => Ok(entry.into_value()),
            _ => Err(GenieError::SessionNotFound(id)),
        }
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .remove(&id)
            .await
            .map(|_| ())
            .ok_or(GenieError::SessionNotFound(id))
    }
}
