use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

use consentlens_core_types::UserId;
use consentlens_event_bus::Session;

use crate::errors::AuthError;
use crate::ports::{IdentityPort, KeyValuePort};

/// Identity provider stub for wiring and tests: whoever is set is
/// signed in.
pub struct MemoryIdentity {
    user: RwLock<Option<UserId>>,
    session_tx: watch::Sender<Option<Session>>,
}

impl MemoryIdentity {
    pub fn signed_out() -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            user: RwLock::new(None),
            session_tx,
        }
    }

    pub fn signed_in(user: UserId) -> Self {
        let identity = Self::signed_out();
        *identity.user.write() = Some(user);
        identity
    }

    pub fn set_session(&self, user: Option<UserId>, session: Option<Session>) {
        *self.user.write() = user;
        let _ = self.session_tx.send(session);
    }
}

#[async_trait]
impl IdentityPort for MemoryIdentity {
    async fn current_user(&self) -> Result<Option<UserId>, AuthError> {
        Ok(self.user.read().clone())
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}

/// Page-local storage stub.
#[derive(Default)]
pub struct MemoryKeyValue {
    entries: RwLock<HashMap<String, String>>,
}

impl KeyValuePort for MemoryKeyValue {
    fn set(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn remove_prefixed(&self, prefix: &str) {
        self.entries.write().retain(|key, _| !key.starts_with(prefix));
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}
