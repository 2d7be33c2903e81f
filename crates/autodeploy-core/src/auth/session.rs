use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::User;
use crate::storage::{KeyValueStore, MemoryStore, StorageError};

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "authToken";

/// Storage key holding the serialized user snapshot
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Refusing to establish a session with an empty token")]
    EmptyToken,

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Token and user snapshot. Always held together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub user: User,
}

/// Single source of truth for whether the current user is authenticated.
///
/// The session pair is persisted through a [`KeyValueStore`] and mirrored in
/// memory, so reads never touch storage. Share it behind an `Arc` between the
/// views and the [`ApiClient`](crate::api::ApiClient).
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Option<SessionData>>,
}

impl SessionStore {
    /// Open the session persisted in `store`.
    ///
    /// A partial or malformed pair (token without user, unparseable user JSON,
    /// empty token) is removed from storage and the store starts
    /// unauthenticated. Storage failures are logged, never returned.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let data = Self::load(store.as_ref());
        debug!(authenticated = data.is_some(), "Session opened");
        Self {
            store,
            data: RwLock::new(data),
        }
    }

    /// Session over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()))
    }

    fn load(store: &dyn KeyValueStore) -> Option<SessionData> {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted session");
                None
            }
        };

        match (read(TOKEN_KEY), read(USER_KEY)) {
            (None, None) => None,
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => Some(SessionData { token, user }),
                    Err(e) => {
                        warn!(error = %e, "Persisted user is malformed, clearing session");
                        Self::discard(store);
                        None
                    }
                }
            }
            _ => {
                warn!("Persisted session is incomplete, clearing session");
                Self::discard(store);
                None
            }
        }
    }

    fn discard(store: &dyn KeyValueStore) {
        if let Err(e) = store.remove_entries(&[TOKEN_KEY, USER_KEY]) {
            warn!(error = %e, "Failed to remove persisted session");
        }
    }

    /// Persist a token and user as one pair and mark the session
    /// authenticated. On failure the previous state is kept.
    pub fn establish(&self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let user_json = serde_json::to_string(&user)?;
        let mut data = self.write();
        self.store
            .set_entries(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;

        info!(user_id = user.id, "Session established");
        *data = Some(SessionData { token, user });
        Ok(())
    }

    /// True iff a non-empty token is held. No I/O.
    pub fn is_authenticated(&self) -> bool {
        self.read().as_ref().is_some_and(|d| !d.token.is_empty())
    }

    pub fn current_token(&self) -> Option<String> {
        self.read().as_ref().map(|d| d.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().as_ref().map(|d| d.user.clone())
    }

    pub fn snapshot(&self) -> Option<SessionData> {
        self.read().clone()
    }

    /// Remove token and user together. Idempotent.
    ///
    /// The in-memory state is cleared even if storage cannot be updated.
    pub fn clear(&self) {
        let mut data = self.write();
        let was_authenticated = data.take().is_some();
        Self::discard(self.store.as_ref());
        if was_authenticated {
            info!("Session cleared");
        }
    }

    /// Clear the session only if it still holds `token`. Returns whether it
    /// was cleared.
    ///
    /// A rejection for a token that has since been replaced must not end the
    /// newer session.
    pub fn clear_if_token(&self, token: &str) -> bool {
        let mut data = self.write();
        if data.as_ref().map(|d| d.token.as_str()) != Some(token) {
            debug!("Session token changed since dispatch, keeping session");
            return false;
        }
        *data = None;
        Self::discard(self.store.as_ref());
        info!("Session cleared");
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionData>> {
        self.data.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SessionData>> {
        self.data.write().unwrap_or_else(|p| p.into_inner())
    }
}
