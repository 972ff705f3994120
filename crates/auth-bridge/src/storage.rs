use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::debug;

use consentlens_event_bus::AuthStateChange;

use crate::errors::AuthError;
use crate::ports::KeyValuePort;

/// Prefix the vendor SDK uses for its per-project storage keys.
pub const VENDOR_PREFIX: &str = "sb-";

/// Legacy fallback key older SDK versions read.
pub const FALLBACK_KEY: &str = "supabase.auth.token";

/// Applies a received `AuthStateChange` to page-local storage under the
/// vendor key conventions: stale vendor keys are cleared, the wrapped
/// session lands under `sb-<host>` with a one-hour expiry, and the raw
/// session is mirrored to the fallback key.
pub fn apply_auth_state_change(
    kv: &dyn KeyValuePort,
    host: &str,
    change: &AuthStateChange,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    kv.remove_prefixed(VENDOR_PREFIX);

    let wrapped = json!({
        "currentSession": change.session,
        "expiresAt": (now + Duration::hours(1)).timestamp(),
    });
    kv.set(&format!("{VENDOR_PREFIX}{host}"), wrapped.to_string());
    kv.set(FALLBACK_KEY, serde_json::to_string(&change.session)?);

    debug!(
        target: "auth.events",
        host,
        "auth.session.propagated"
    );
    Ok(())
}
