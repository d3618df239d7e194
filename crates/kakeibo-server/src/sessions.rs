//! In-memory session store
//!
//! Each session owns its conversation log behind its own async mutex, held
//! for the whole advice call, so a session never has two actions in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};

use kakeibo_core::Session;

/// Session timeout (30 minutes of inactivity)
const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// State of one interactive session
#[derive(Debug, Default)]
pub struct UiSession {
    pub log: Session,
    /// Message for the one-shot error banner
    pub flash: Option<String>,
}

impl UiSession {
    /// Take the pending banner message, leaving none behind
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

#[derive(Debug)]
struct SessionSlot {
    state: Arc<Mutex<UiSession>>,
    last_activity: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(UiSession::default())),
            last_activity: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > SESSION_TIMEOUT
    }
}

/// In-memory session manager
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionSlot>>,
    counter: AtomicU64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its ID
    pub async fn create(&self) -> String {
        // Timestamp plus a counter keeps IDs unique within one clock tick
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(seq.to_le_bytes());
        let session_id = format!("ses_{:x}", hasher.finalize())[..24].to_string();

        let mut sessions = self.sessions.write().await;

        // Clean up expired sessions while we're here
        sessions.retain(|_, s| !s.is_expired());

        sessions.insert(session_id.clone(), SessionSlot::new());
        session_id
    }

    /// Look up a live session, refreshing its activity time
    ///
    /// Expired sessions are dropped and reported as missing.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<UiSession>>> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(session_id)?;
        if slot.is_expired() {
            sessions.remove(session_id);
            return None;
        }
        slot.last_activity = Instant::now();
        Some(slot.state.clone())
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| !s.is_expired()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let manager = SessionManager::new();
        let id = manager.create().await;

        assert!(id.starts_with("ses_"));
        assert_eq!(id.len(), 24);
        assert!(manager.get(&id).await.is_some());
        assert!(manager.get("ses_unknown").await.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let manager = SessionManager::new();
        let a = manager.create().await;
        let b = manager.create().await;
        assert_ne!(a, b);
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn test_sessions_share_state_by_id() {
        let manager = SessionManager::new();
        let id = manager.create().await;

        {
            let handle = manager.get(&id).await.unwrap();
            handle.lock().await.flash = Some("Advice request failed".into());
        }

        let handle = manager.get(&id).await.unwrap();
        let mut session = handle.lock().await;
        assert_eq!(session.take_flash().as_deref(), Some("Advice request failed"));
        assert!(session.take_flash().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let manager = SessionManager::new();
        let id = manager.create().await;

        {
            let mut sessions = manager.sessions.write().await;
            let slot = sessions.get_mut(&id).unwrap();
            match Instant::now().checked_sub(SESSION_TIMEOUT + Duration::from_secs(1)) {
                Some(past) => slot.last_activity = past,
                // Monotonic clock too young to backdate; nothing to test
                None => return,
            }
        }

        assert!(manager.get(&id).await.is_none());
        assert_eq!(manager.len().await, 0);
    }
}
