//! Transient login sessions.
//!
//! A [`LoginSession`] is the only shared mutable state in the subsystem: it
//! carries the server's ephemeral secret between the Start and Finish round
//! trips and must be consumed exactly once. [`SessionCache::consume_if_valid`]
//! performs the load, the expiry and ownership checks, and the consumed-flag
//! flip in a single critical section so that two concurrent Finish calls can
//! never both succeed on the same session.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use uuid::Uuid;

/// Default lifetime of the Start→Finish window.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(300);

/// Server-side state for one in-flight login handshake.
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// Opaque handle returned to the client.
    pub session_id: Uuid,
    /// Normalized user identifier the session was started for.
    pub user_id: String,
    /// Credential salt returned in Start.
    pub salt: Vec<u8>,
    /// Verifier the proof will be checked against.
    pub verifier: BigUint,
    /// Client public ephemeral `A` received in Start.
    pub client_public: BigUint,
    /// Server ephemeral secret `b`.
    pub server_secret: BigUint,
    /// Server public ephemeral `B` returned in Start.
    pub server_public: BigUint,
    /// Optional device identifier supplied by the client.
    pub client_id: Option<String>,
    /// Optional device name supplied by the client.
    pub device_name: Option<String>,
    /// Optional device platform supplied by the client.
    pub device_platform: Option<String>,
    /// When the session was created.
    pub created_at: Instant,
    /// When the session stops being consumable.
    pub expires_at: Instant,
    /// Set once Finish has observed the session; `false` is a precondition
    /// for Finish to proceed.
    pub consumed: bool,
}

/// TTL-indexed store for in-flight login sessions.
pub struct SessionCache {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, LoginSession>>,
}

impl SessionCache {
    /// Create a cache whose sessions expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert a fresh session, assigning its id and expiry. Returns the id.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &self,
        user_id: String,
        salt: Vec<u8>,
        verifier: BigUint,
        client_public: BigUint,
        server_secret: BigUint,
        server_public: BigUint,
        client_id: Option<String>,
        device_name: Option<String>,
        device_platform: Option<String>,
    ) -> Uuid {
        let now = Instant::now();
        let session = LoginSession {
            session_id: Uuid::new_v4(),
            user_id,
            salt,
            verifier,
            client_public,
            server_secret,
            server_public,
            client_id,
            device_name,
            device_platform,
            created_at: now,
            expires_at: now + self.ttl,
            consumed: false,
        };
        let session_id = session.session_id;
        let mut sessions = self.sessions.lock().expect("session cache poisoned");
        sessions.insert(session_id, session);
        session_id
    }

    /// Atomically fetch-and-mark-consumed.
    ///
    /// Returns the session only when it exists, is unexpired, has not been
    /// consumed, and belongs to `user_id`. Whatever the outcome, a session
    /// that was observed under the wrong user is burned as well: a Finish
    /// attempt is a spend, never a probe.
    pub fn consume_if_valid(&self, session_id: Uuid, user_id: &str) -> Option<LoginSession> {
        let mut sessions = self.sessions.lock().expect("session cache poisoned");
        let session = sessions.get_mut(&session_id)?;
        if session.consumed || Instant::now() >= session.expires_at {
            return None;
        }
        session.consumed = true;
        if session.user_id != user_id {
            return None;
        }
        Some(session.clone())
    }

    /// Drop expired and consumed sessions; returns how many were evicted.
    /// Intended to be called from a periodic background task.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().expect("session cache poisoned");
        let before = sessions.len();
        sessions.retain(|_, session| !session.consumed && session.expires_at > now);
        before - sessions.len()
    }

    /// Number of sessions currently held, consumed or not.
    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session cache poisoned").len()
    }

    /// Whether the cache holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_session(cache: &SessionCache, user_id: &str) -> Uuid {
        cache.insert(
            user_id.to_owned(),
            vec![1; 16],
            BigUint::from(3u32),
            BigUint::from(5u32),
            BigUint::from(7u32),
            BigUint::from(11u32),
            None,
            None,
            None,
        )
    }

    #[test]
    fn consume_is_single_use() {
        let cache = SessionCache::default();
        let id = insert_session(&cache, "alice");
        assert!(cache.consume_if_valid(id, "alice").is_some());
        assert!(cache.consume_if_valid(id, "alice").is_none());
    }

    #[test]
    fn consume_checks_ownership_and_burns_on_mismatch() {
        let cache = SessionCache::default();
        let id = insert_session(&cache, "alice");
        assert!(cache.consume_if_valid(id, "mallory").is_none());
        // the mismatch burned the session for the rightful owner too
        assert!(cache.consume_if_valid(id, "alice").is_none());
    }

    #[test]
    fn expired_sessions_are_not_consumable() {
        let cache = SessionCache::new(Duration::ZERO);
        let id = insert_session(&cache, "alice");
        assert!(cache.consume_if_valid(id, "alice").is_none());
    }

    #[test]
    fn eviction_drops_expired_and_consumed() {
        let cache = SessionCache::new(Duration::ZERO);
        insert_session(&cache, "alice");
        insert_session(&cache, "bob");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evict_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn unknown_session_is_not_consumable() {
        let cache = SessionCache::default();
        assert!(cache.consume_if_valid(Uuid::new_v4(), "alice").is_none());
    }
}
