// src/services/session_services.rs
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store lock poisoned")]
    Poisoned,
    #[error("session lifetime overflows the clock")]
    TtlOverflow,
}

#[derive(Debug, Clone)]
pub struct SessionData {
    pub logged_in: bool,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-process session storage keyed by random ids. Contents do not survive a
/// restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a session and returns its id.
    pub fn create(&self, logged_in: bool) -> Result<String, SessionError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(SessionError::TtlOverflow)?;
        let id = Uuid::new_v4().to_string();
        let data = SessionData {
            logged_in,
            expires_at,
        };

        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(id.clone(), data);
        Ok(id)
    }

    /// Looks up a live session. Expired entries are dropped and reported as absent.
    pub fn get(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
            match sessions.get(id) {
                None => return Ok(None),
                Some(s) if !s.is_expired(now) => return Ok(Some(s.clone())),
                Some(_) => {}
            }
        }

        self.destroy(id)?;
        Ok(None)
    }

    /// Removes a session. Returns whether it existed.
    pub fn destroy(&self, id: &str) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        Ok(sessions.remove(id).is_some())
    }

    pub fn len(&self) -> Result<usize, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        Ok(sessions.len())
    }
}
