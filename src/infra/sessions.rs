use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use crate::application::auth::{Session, SessionStore};

/// Process-local session table. Sessions do not survive a restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    /// Stores the session and drops every session that has already expired.
    async fn insert(&self, session: Session) {
        let now = OffsetDateTime::now_utc();
        self.sessions.retain(|_, existing| !existing.is_expired(now));
        self.sessions.insert(session.id.clone(), session);
    }

    async fn find(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    async fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }
}
