use thiserror::Error;

use consentlens_core_types::ElementId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("element {0} is detached from the document")]
    Detached(ElementId),
    #[error("no computed style for element {0}")]
    StyleUnavailable(ElementId),
}
