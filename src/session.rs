//! Per-session location fields
//!
//! Each page visit owns a pair of mutable location strings, created empty on
//! first contact and kept for the lifetime of the session. The store is an
//! explicit dependency handed to the handlers rather than ambient state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The two location fields a session carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFields {
    pub start_location: String,
    pub end_location: String,
}

/// Process-wide store of per-session fields, keyed by the session cookie
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionFields>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the fields for a session, creating an empty pair on first contact
    pub async fn get_or_create(&self, id: Uuid) -> SessionFields {
        let mut sessions = self.sessions.write().await;
        sessions.entry(id).or_default().clone()
    }

    /// Overwrite both location fields for a session
    pub async fn update(&self, id: Uuid, fields: SessionFields) -> SessionFields {
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, fields.clone());
        fields
    }

    /// Swap the two location fields under a single write lock
    pub async fn swap(&self, id: Uuid) -> SessionFields {
        let mut sessions = self.sessions.write().await;
        let fields = sessions.entry(id).or_default();
        std::mem::swap(&mut fields.start_location, &mut fields.end_location);
        fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_contact_creates_empty_fields() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        let fields = store.get_or_create(id).await;
        assert_eq!(fields, SessionFields::default());
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        store
            .update(
                id,
                SessionFields {
                    start_location: "Pune".to_string(),
                    end_location: "Mumbai".to_string(),
                },
            )
            .await;

        let fields = store.get_or_create(id).await;
        assert_eq!(fields.start_location, "Pune");
        assert_eq!(fields.end_location, "Mumbai");
    }

    #[tokio::test]
    async fn test_swap_twice_restores_original() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        let original = SessionFields {
            start_location: "Pune".to_string(),
            end_location: "Mumbai".to_string(),
        };
        store.update(id, original.clone()).await;

        let swapped = store.swap(id).await;
        assert_eq!(swapped.start_location, "Mumbai");
        assert_eq!(swapped.end_location, "Pune");

        let restored = store.swap(id).await;
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store
            .update(
                a,
                SessionFields {
                    start_location: "Delhi".to_string(),
                    end_location: "Agra".to_string(),
                },
            )
            .await;

        let other = store.get_or_create(b).await;
        assert_eq!(other, SessionFields::default());

        store.swap(b).await;
        let unchanged = store.get_or_create(a).await;
        assert_eq!(unchanged.start_location, "Delhi");
    }
}
