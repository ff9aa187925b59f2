//! Admin gate: session resolution, admin checks, and credential login.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("admin session required")]
    Unauthorized,
    #[error("invalid admin credentials")]
    InvalidCredentials,
    #[error("session lifetime exceeds the supported date range")]
    SessionTtlOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub expires_at: OffsetDateTime,
}

impl Session {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Identity resolved from a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
}

/// Proof that the current request belongs to the configured admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    email: String,
}

impl AdminUser {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session);

    async fn find(&self, id: &str) -> Option<Session>;

    async fn remove(&self, id: &str);
}

/// Admin identity: the contact email plus the SHA-256 digest of the access token.
#[derive(Clone)]
pub struct AdminCredentials {
    email: String,
    token_digest: Vec<u8>,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, token_digest: Vec<u8>) -> Self {
        Self {
            email: email.into(),
            token_digest,
        }
    }

    pub fn from_token(email: impl Into<String>, token: &str) -> Self {
        Self::new(email, hash_token(token))
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    fn matches_token(&self, token: &str) -> bool {
        self.token_digest.ct_eq(&hash_token(token)).unwrap_u8() == 1
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

#[derive(Clone)]
pub struct AdminGate {
    sessions: Arc<dyn SessionStore>,
    credentials: AdminCredentials,
    ttl: Duration,
}

impl AdminGate {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        credentials: AdminCredentials,
        ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            credentials,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve the user behind a session id. Expired sessions are evicted.
    pub async fn resolve_user(&self, session_id: Option<&str>) -> Option<SessionUser> {
        let id = session_id.filter(|id| !id.is_empty())?;
        let session = self.sessions.find(id).await?;

        if session.is_expired(OffsetDateTime::now_utc()) {
            debug!(target = "quill::auth", "evicting expired session");
            self.sessions.remove(id).await;
            return None;
        }

        Some(SessionUser {
            email: session.email,
        })
    }

    pub async fn optional_admin(&self, session_id: Option<&str>) -> Option<AdminUser> {
        self.resolve_user(session_id)
            .await
            .filter(|user| self.credentials.matches_email(&user.email))
            .map(|user| AdminUser { email: user.email })
    }

    pub async fn require_admin(&self, session_id: Option<&str>) -> Result<AdminUser, AuthError> {
        self.optional_admin(session_id)
            .await
            .ok_or(AuthError::Unauthorized)
    }

    /// Exchange admin credentials for a fresh session.
    pub async fn login(&self, email: &str, token: &str) -> Result<Session, AuthError> {
        let email_ok = self.credentials.matches_email(email);
        let token_ok = self.credentials.matches_token(token);
        if !(email_ok && token_ok) {
            info!(target = "quill::auth", "rejected admin login");
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = OffsetDateTime::now_utc()
            .checked_add(self.ttl)
            .ok_or(AuthError::SessionTtlOutOfRange)?;

        let session = Session {
            id: generate_session_id(),
            email: self.credentials.email().to_string(),
            expires_at,
        };
        self.sessions.insert(session.clone()).await;
        info!(target = "quill::auth", email = %session.email, "admin logged in");

        Ok(session)
    }

    pub async fn logout(&self, session_id: &str) {
        self.sessions.remove(session_id).await;
        info!(target = "quill::auth", "admin logged out");
    }
}

fn generate_session_id() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::sessions::InMemorySessionStore;

    fn gate(ttl: Duration) -> (AdminGate, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let gate = AdminGate::new(
            store.clone(),
            AdminCredentials::from_token("admin@example.com", "s3cret"),
            ttl,
        );
        (gate, store)
    }

    #[tokio::test]
    async fn login_creates_admin_session() {
        let (gate, _) = gate(Duration::hours(1));
        let session = gate
            .login("Admin@Example.com", "s3cret")
            .await
            .expect("login");

        let admin = gate
            .require_admin(Some(&session.id))
            .await
            .expect("admin");
        assert_eq!(admin.email(), "admin@example.com");
        assert_eq!(session.id.len(), 64);
    }

    #[tokio::test]
    async fn login_rejects_wrong_token_or_email() {
        let (gate, _) = gate(Duration::hours(1));
        assert!(matches!(
            gate.login("admin@example.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.login("other@example.com", "s3cret").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn missing_or_unknown_session_is_unauthorized() {
        let (gate, _) = gate(Duration::hours(1));
        assert!(matches!(
            gate.require_admin(None).await,
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            gate.require_admin(Some("unknown")).await,
            Err(AuthError::Unauthorized)
        ));
        assert_eq!(gate.optional_admin(Some("")).await, None);
    }

    #[tokio::test]
    async fn non_admin_session_is_not_admin() {
        let (gate, store) = gate(Duration::hours(1));
        store
            .insert(Session {
                id: "reader".into(),
                email: "reader@example.com".into(),
                expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
            })
            .await;

        let user = gate.resolve_user(Some("reader")).await;
        assert_eq!(
            user,
            Some(SessionUser {
                email: "reader@example.com".into()
            })
        );
        assert!(matches!(
            gate.require_admin(Some("reader")).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn expired_sessions_are_evicted() {
        let (gate, store) = gate(Duration::hours(1));
        store
            .insert(Session {
                id: "stale".into(),
                email: "admin@example.com".into(),
                expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
            })
            .await;

        assert_eq!(gate.resolve_user(Some("stale")).await, None);
        assert_eq!(store.find("stale").await, None);
    }

    #[tokio::test]
    async fn logout_revokes_session() {
        let (gate, _) = gate(Duration::hours(1));
        let session = gate
            .login("admin@example.com", "s3cret")
            .await
            .expect("login");
        gate.logout(&session.id).await;

        assert!(matches!(
            gate.require_admin(Some(&session.id)).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn oversized_ttl_fails_login_instead_of_overflowing() {
        let (gate, store) = gate(Duration::seconds(i64::MAX));

        assert!(matches!(
            gate.login("admin@example.com", "s3cret").await,
            Err(AuthError::SessionTtlOutOfRange)
        ));
        assert!(store.is_empty());
    }
}
