use async_trait::async_trait;
use tokio::sync::watch;

use consentlens_core_types::UserId;
use consentlens_event_bus::Session;

use crate::errors::AuthError;

/// The identity provider as the background process sees it. The full
/// sign-up/sign-in surface lives in the companion app; the core only
/// needs the session gate and change notifications.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// The signed-in user, if any. A `None` turns a detection delivery
    /// into a "not logged in" rejection.
    async fn current_user(&self) -> Result<Option<UserId>, AuthError>;

    /// Session-changed notifications, latest value retained.
    fn on_auth_state_change(&self) -> watch::Receiver<Option<Session>>;
}

/// Page-local storage as the content script sees it.
pub trait KeyValuePort: Send + Sync {
    fn set(&self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    fn remove_prefixed(&self, prefix: &str);
    fn keys(&self) -> Vec<String>;
}
