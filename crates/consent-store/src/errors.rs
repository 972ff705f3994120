use thiserror::Error;

use consentlens_core_types::ConsentId;
use consentlens_revoke_engine::RuleError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("consent {0:?} not found")]
    NotFound(ConsentId),
    #[error("record store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Rule(#[from] RuleError),
}
