//! Server-side session registry
//!
//! Login stores a [`Session`] keyed by its token; every dashboard request
//! looks the token up again. Expired sessions are treated as absent and are
//! dropped whenever a new session is issued.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};
use tracing::{debug, info};

use crate::telemetry::ids;
use crate::types::{Session, UserProfile};

/// Random characters after the issue timestamp.
const TOKEN_SUFFIX_LEN: usize = 9;

static TOKEN_SHAPE: OnceLock<Regex> = OnceLock::new();

/// `session_<millis>_<9 base-36 chars>`
#[allow(clippy::expect_used)]
pub fn is_well_formed_token(token: &str) -> bool {
    TOKEN_SHAPE
        .get_or_init(|| Regex::new(r"^session_\d+_[0-9a-z]{9}$").expect("static token pattern"))
        .is_match(token)
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl_hours: u32) -> Self {
        Self {
            ttl: Duration::hours(i64::from(ttl_hours)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create and remember a session for `user`, dropping expired ones.
    pub fn issue<R: Rng + ?Sized>(&self, user: UserProfile, now: DateTime<Utc>, rng: &mut R) -> Session {
        let session = Session {
            token: ids::timestamped("session", now, rng, TOKEN_SUFFIX_LEN),
            user,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        let purged = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let purged = Self::retain_live(&mut sessions, now);
            sessions.insert(session.token.clone(), session.clone());
            purged
        };
        if purged > 0 {
            debug!(purged, "Expired sessions dropped");
        }
        info!(user = %session.user.email, expires_at = %session.expires_at, "Session issued");
        session
    }

    /// The live session behind `token`, if any.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        if !is_well_formed_token(token) {
            return None;
        }
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get(token)?;
        if session.is_expired(now) {
            debug!("Rejected expired session");
            return None;
        }
        Some(session.clone())
    }

    /// Forget `token`. Returns whether it was known.
    pub fn revoke(&self, token: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some();
        if removed {
            info!("Session revoked");
        }
        removed
    }

    /// Drop every expired session. Returns how many were removed.
    fn retain_live(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
