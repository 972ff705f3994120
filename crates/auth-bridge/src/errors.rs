use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("identity backend error: {0}")]
    Backend(String),
}
