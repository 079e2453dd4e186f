//! In-memory session storage.
//!
//! Every transition runs under the write lock, so operations on one session are
//! serialized. Provider calls never happen while the lock is held; their
//! results are applied afterwards through [`SessionStore::apply`].

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use kqa_quiz::QuizSession;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: QuizSession,
    pub created_at: DateTime<Utc>,
    /// Last time the player acted on the session
    pub last_seen: DateTime<Utc>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            session: QuizSession::new(),
            created_at: now,
            last_seen: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle session and return its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, SessionEntry::new(Utc::now()));
        id
    }

    /// Run `f` against a session without touching it.
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&QuizSession) -> R) -> Option<R> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| f(&entry.session))
    }

    /// Run a player action against a session and mark it as seen.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Utc::now();
        Some(f(&mut entry.session))
    }

    /// Apply a background result to a session. Does not count as activity.
    pub async fn apply<R>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
        self.sessions
            .write()
            .await
            .get_mut(&id)
            .map(|entry| f(&mut entry.session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop sessions whose last activity is older than `now - idle`.
    ///
    /// Returns the number of sessions removed.
    pub async fn sweep_idle(&self, now: DateTime<Utc>, idle: chrono::Duration) -> usize {
        let cutoff = now - idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use kqa_quiz::{Category, SessionState};

    use super::*;

    #[tokio::test]
    async fn test_create_and_read() {
        let store = SessionStore::new();
        let id = store.create().await;

        let state = store.read(id, |s| s.state().clone()).await;
        assert_eq!(state, Some(SessionState::Idle));
        assert_eq!(store.read(Uuid::new_v4(), |_| ()).await, None);
    }

    #[tokio::test]
    async fn test_update_applies_transition() {
        let store = SessionStore::new();
        let id = store.create().await;

        let ticket = store.update(id, |s| s.start(Category::Birds)).await;
        assert!(matches!(ticket, Some(Ok(_))));

        let state = store.read(id, |s| s.state().clone()).await.unwrap();
        assert_eq!(
            state,
            SessionState::AwaitingQuestions {
                category: Category::Birds
            }
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        let id = store.create().await;

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_idle() {
        let store = SessionStore::new();
        let stale = store.create().await;
        let fresh = store.create().await;

        {
            let mut sessions = store.sessions.write().await;
            sessions.get_mut(&stale).unwrap().last_seen = Utc::now() - chrono::Duration::hours(3);
        }

        let removed = store
            .sweep_idle(Utc::now(), chrono::Duration::minutes(60))
            .await;

        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.read(fresh, |_| ()).await.is_some());
        assert!(store.read(stale, |_| ()).await.is_none());
    }
}
