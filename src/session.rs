//! Persisted login session.
//!
//! The session (profile + bearer token) is stored as one JSON blob and read
//! by the API client on every request through [`TokenSource`].

use std::sync::{Arc, RwLock};

use crate::api::TokenSource;
use crate::models::{Session, User};
use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Loads the saved session, if any. Unreadable sessions are logged and
    /// treated as signed out.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = match load_json::<Session>(storage.as_ref(), StorageKey::Session) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring saved session: {}", e);
                None
            }
        };

        Self {
            storage,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.user.id.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    /// Replaces the session and persists it.
    pub fn set(&self, session: Session) {
        if let Err(e) = save_json(self.storage.as_ref(), StorageKey::Session, &session) {
            tracing::warn!("Session will not survive a restart: {}", e);
        }
        *self.write() = Some(session);
    }

    /// Swaps in an updated profile, keeping the token.
    pub fn update_user(&self, user: User) {
        let updated = self.read().as_ref().map(|s| Session {
            user,
            token: s.token.clone(),
        });
        if let Some(session) = updated {
            self.set(session);
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(StorageKey::Session) {
            tracing::warn!("Failed to remove saved session: {}", e);
        }
        *self.write() = None;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }
}
