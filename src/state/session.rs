//! In-memory session store
//!
//! One [`Session`] per chat, owned by a single store keyed by chat id. The
//! session carries the optional conversation [`Flow`] and the admin's
//! broadcast selection set; keying the selection by chat stops two admins
//! trampling each other's scratch. Sessions are stamped with a TTL on every
//! save and evicted by a background tick, so abandoned conversations cannot
//! accumulate. Everything here is process memory by contract: a restart drops
//! in-flight conversations.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::state::flow::Flow;

#[derive(Debug, Clone)]
pub struct Session {
    pub chat_id: i64,
    pub flow: Option<Flow>,
    /// Sheet rows the admin has toggled for broadcast, ordered for stable
    /// keyboard rendering.
    pub selection: BTreeSet<u32>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn new(chat_id: i64, ttl: chrono::Duration) -> Self {
        Self {
            chat_id,
            flow: None,
            selection: BTreeSet::new(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, Session>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Current flow for a chat; `None` when there is no live session.
    pub async fn flow(&self, chat_id: i64) -> Option<Flow> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&chat_id)
            .filter(|session| !session.is_expired())
            .and_then(|session| session.flow.clone())
    }

    /// Set the flow for a chat, refreshing the session TTL.
    pub async fn set_flow(&self, chat_id: i64, flow: Flow) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id, self.ttl));
        session.flow = Some(flow);
        session.expires_at = Utc::now() + self.ttl;
    }

    /// Drop the flow but keep the session (selection survives).
    pub async fn clear_flow(&self, chat_id: i64) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&chat_id) {
            session.flow = None;
        }
    }

    /// Toggle a directory row in the chat's selection set; returns the set
    /// after the flip.
    pub async fn toggle_selection(&self, chat_id: i64, row: u32) -> BTreeSet<u32> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id, self.ttl));
        if !session.selection.insert(row) {
            session.selection.remove(&row);
        }
        session.expires_at = Utc::now() + self.ttl;
        session.selection.clone()
    }

    /// Current selection without mutating it.
    pub async fn selection(&self, chat_id: i64) -> BTreeSet<u32> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&chat_id)
            .map(|session| session.selection.clone())
            .unwrap_or_default()
    }

    /// Take the selection, leaving it empty — broadcast consumes it exactly
    /// once.
    pub async fn take_selection(&self, chat_id: i64) -> BTreeSet<u32> {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_mut(&chat_id)
            .map(|session| std::mem::take(&mut session.selection))
            .unwrap_or_default()
    }

    /// Remove a chat's session entirely.
    pub async fn remove(&self, chat_id: i64) {
        self.sessions.write().await.remove(&chat_id);
    }

    /// Evict expired sessions; returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        let dropped = before - sessions.len();
        if dropped > 0 {
            debug!(dropped = dropped, "Evicted expired sessions");
        }
        dropped
    }

    /// Spawn the periodic eviction task.
    pub fn spawn_cleanup(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let dropped = store.cleanup_expired().await;
                if dropped > 0 {
                    info!(dropped = dropped, "Session cleanup tick");
                }
            }
        })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flow_roundtrip_and_clear() {
        let store = SessionStore::new(3600);
        assert!(store.flow(1).await.is_none());

        store.set_flow(1, Flow::AwaitingSearch).await;
        assert_eq!(store.flow(1).await, Some(Flow::AwaitingSearch));

        store.clear_flow(1).await;
        assert!(store.flow(1).await.is_none());
    }

    #[tokio::test]
    async fn toggle_flips_membership() {
        let store = SessionStore::new(3600);

        let selection = store.toggle_selection(1, 2).await;
        assert!(selection.contains(&2));

        let selection = store.toggle_selection(1, 3).await;
        assert_eq!(selection.len(), 2);

        let selection = store.toggle_selection(1, 2).await;
        assert!(!selection.contains(&2));
        assert!(selection.contains(&3));
    }

    #[tokio::test]
    async fn selection_is_per_chat() {
        let store = SessionStore::new(3600);
        store.toggle_selection(1, 2).await;
        store.toggle_selection(99, 5).await;

        assert_eq!(store.selection(1).await.len(), 1);
        assert!(store.selection(1).await.contains(&2));
        assert!(store.selection(99).await.contains(&5));
    }

    #[tokio::test]
    async fn take_selection_clears_it() {
        let store = SessionStore::new(3600);
        store.toggle_selection(1, 2).await;
        store.toggle_selection(1, 3).await;

        let taken = store.take_selection(1).await;
        assert_eq!(taken.len(), 2);
        assert!(store.selection(1).await.is_empty());
    }

    #[tokio::test]
    async fn expired_sessions_are_evicted() {
        let store = SessionStore::new(0);
        store.set_flow(1, Flow::AwaitingSearch).await;

        // ttl of zero expires immediately
        assert!(store.flow(1).await.is_none());
        assert_eq!(store.cleanup_expired().await, 1);
    }
}
