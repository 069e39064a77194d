use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;

use super::clock::{Clock, SystemClock};

pub const SESSION_TTL_HOURS: i64 = 24;

const TOKEN_BYTES: usize = 32;

/// In-memory admin sessions: token -> expiry.
///
/// Clones share the same table. Expired entries are treated as absent by every
/// reader; `validate` evicts them lazily and `cleanup_expired` sweeps the rest.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            clock,
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn create(&self) -> String {
        let token = generate_token();
        let expires_at = self.clock.now() + self.ttl;

        self.sessions.insert(token.clone(), expires_at);

        log::info!(
            "Created admin session {}… (expires {})",
            token_prefix(&token),
            expires_at.to_rfc3339()
        );

        token
    }

    pub fn validate(&self, token: &str) -> bool {
        let now = self.clock.now();

        let expires_at = match self.sessions.get(token) {
            Some(entry) => *entry.value(),
            None => return false,
        };

        if now >= expires_at {
            if self
                .sessions
                .remove_if(token, |_, expiry| now >= *expiry)
                .is_some()
            {
                log::debug!("Evicted expired session {}…", token_prefix(token));
            }
            return false;
        }

        true
    }

    pub fn delete(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            log::info!("Deleted session {}…", token_prefix(token));
        }
    }

    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.sessions.retain(|_, expires_at| {
            if now >= *expires_at {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            log::info!("Cleaned up {} expired sessions", removed);
        }

        removed
    }

    pub fn active_session_count(&self) -> usize {
        let now = self.clock.now();
        self.sessions
            .iter()
            .filter(|entry| now < *entry.value())
            .count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Shortened token for log lines.
pub(crate) fn token_prefix(token: &str) -> String {
    token.chars().take(8).collect()
}
