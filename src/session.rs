use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

use crate::models::{AdminSession, Session, UserProfile};
use crate::storage::{Storage, StorageError};
use crate::types::{SessionReceiver, SharedStorage};
use crate::util::get_short_token;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_DATA_KEY: &str = "userData";
pub const ADMIN_TOKEN_KEY: &str = "admin_token";
pub const ADMIN_ROLE_KEY: &str = "admin_role";

/// Result of reading the persisted session through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Absent,
    Invalid(String),
    Active(Session),
}

impl SessionState {
    pub fn into_session(self) -> Option<Session> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::Absent | SessionState::Invalid(_) => None,
        }
    }
}

fn read_state(storage: &dyn Storage) -> SessionState {
    let token = storage.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty());
    let raw_user = storage.get(USER_DATA_KEY);
    match (token, raw_user) {
        (Some(token), Some(raw_user)) => match UserProfile::from_stored(&raw_user) {
            Ok(user) => SessionState::Active(Session { token, user }),
            Err(e) => {
                warn!("session:: ignoring cached user record: {e}");
                SessionState::Invalid(e.to_string())
            }
        },
        _ => SessionState::Absent,
    }
}

/// The member session, persisted in storage and observable by every view.
/// Writes and clears notify subscribers before returning.
#[derive(Clone)]
pub struct SessionContext {
    storage: SharedStorage,
    notifier: Arc<watch::Sender<Option<Session>>>,
}

impl SessionContext {
    pub fn new(storage: SharedStorage) -> SessionContext {
        let current = read_state(storage.as_ref()).into_session();
        let (notifier, _) = watch::channel(current);
        SessionContext {
            storage,
            notifier: Arc::new(notifier),
        }
    }

    pub fn inspect(&self) -> SessionState {
        read_state(self.storage.as_ref())
    }

    pub fn get_session(&self) -> Option<Session> {
        self.inspect().into_session()
    }

    /// The bearer token alone; a token is usable even if the cached profile is stale.
    pub fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_session(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(AUTH_TOKEN_KEY, &session.token)?;
        self.storage.set(USER_DATA_KEY, &user)?;
        info!(
            "session:: signed in {} as {} (token ...{})",
            session.user.full_name(),
            session.user.role,
            get_short_token(&session.token)
        );
        self.notifier.send_replace(Some(session.clone()));
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_DATA_KEY)?;
        info!("session:: signed out");
        self.notifier.send_replace(None);
        Ok(())
    }

    pub fn subscribe(&self) -> SessionReceiver {
        self.notifier.subscribe()
    }
}

#[derive(Clone)]
pub struct AdminSessionStore {
    storage: SharedStorage,
}

impl AdminSessionStore {
    pub fn new(storage: SharedStorage) -> AdminSessionStore {
        AdminSessionStore { storage }
    }

    pub fn get(&self) -> Option<AdminSession> {
        let token = self.token()?;
        let role = self.storage.get(ADMIN_ROLE_KEY).unwrap_or_default();
        Some(AdminSession { token, role })
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(ADMIN_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set(&self, session: &AdminSession) -> Result<(), StorageError> {
        self.storage.set(ADMIN_TOKEN_KEY, &session.token)?;
        self.storage.set(ADMIN_ROLE_KEY, &session.role)?;
        info!("session:: admin console signed in as {}", session.role);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(ADMIN_TOKEN_KEY)?;
        self.storage.remove(ADMIN_ROLE_KEY)?;
        Ok(())
    }
}
