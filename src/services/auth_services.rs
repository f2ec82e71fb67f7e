// src/services/auth_services.rs
use log::{info, warn};
use thiserror::Error;

use crate::services::session_services::{SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid password")]
    InvalidPassword,
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Password gate for the dashboard. There is one admin and one shared secret.
#[derive(Clone)]
pub struct AuthService {
    admin_password: String,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(admin_password: impl Into<String>, sessions: SessionStore) -> Self {
        Self {
            admin_password: admin_password.into(),
            sessions,
        }
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        candidate == self.admin_password
    }

    /// Checks `password` and, on a match, opens a logged-in session whose id
    /// is returned. Any previous session id is discarded so the caller never
    /// keeps a pre-login identifier.
    pub fn login(&self, password: &str, previous: Option<&str>) -> Result<String, AuthError> {
        if !self.verify_password(password) {
            warn!("Rejected dashboard login attempt");
            return Err(AuthError::InvalidPassword);
        }

        if let Some(old) = previous {
            self.sessions.destroy(old)?;
        }
        let id = self.sessions.create(true)?;
        info!("Admin logged in ({} active sessions)", self.sessions.len()?);
        Ok(id)
    }

    pub fn is_authenticated(&self, session_id: Option<&str>) -> Result<bool, AuthError> {
        let Some(id) = session_id else {
            return Ok(false);
        };
        Ok(self
            .sessions
            .get(id)?
            .map(|s| s.logged_in)
            .unwrap_or(false))
    }

    pub fn logout(&self, session_id: Option<&str>) -> Result<(), AuthError> {
        if let Some(id) = session_id {
            if self.sessions.destroy(id)? {
                info!("Admin logged out");
            }
        }
        Ok(())
    }
}
