//! Server-side sessions for the cookie-authenticated vendor routes.
//!
//! A session only remembers which vendor logged in. The id handed to the
//! browser is an opaque random value; everything else stays on the server.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use vendorhub_core::VendorId;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub vendor_id: VendorId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a new session bound to `vendor_id`.
    async fn create(&self, vendor_id: VendorId, now: DateTime<Utc>) -> Result<SessionId, SessionError>;

    /// Load a live session. Expired sessions are dropped and reported as absent.
    async fn load(&self, id: &SessionId, now: DateTime<Utc>) -> Result<Option<SessionData>, SessionError>;

    /// Destroy a session. Returns whether it existed.
    async fn destroy(&self, id: &SessionId) -> Result<bool, SessionError>;
}

/// In-memory session store. Sessions do not survive a restart.
#[derive(Debug)]
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionId, SessionData>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, vendor_id: VendorId, now: DateTime<Utc>) -> Result<SessionId, SessionError> {
        let id = SessionId::generate();
        let data = SessionData {
            vendor_id,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().map_err(poisoned)?;
        // Sweep expired sessions.
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(id.clone(), data);
        Ok(id)
    }

    async fn load(&self, id: &SessionId, now: DateTime<Utc>) -> Result<Option<SessionData>, SessionError> {
        {
            let sessions = self.sessions.read().map_err(poisoned)?;
            match sessions.get(id) {
                None => return Ok(None),
                Some(s) if s.expires_at > now => return Ok(Some(s.clone())),
                Some(_) => {}
            }
        }

        self.sessions.write().map_err(poisoned)?.remove(id);
        Ok(None)
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.sessions.write().map_err(poisoned)?.remove(id).is_some())
    }
}
