pub mod errors;
pub mod memory;
pub mod ports;
pub mod storage;

pub use errors::AuthError;
pub use memory::{MemoryIdentity, MemoryKeyValue};
pub use ports::{IdentityPort, KeyValuePort};
pub use storage::{apply_auth_state_change, FALLBACK_KEY, VENDOR_PREFIX};
