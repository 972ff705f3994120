use thiserror::Error;

use crate::model::RuleTemplate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("unknown option {value:?} for template {template:?}")]
    UnknownOption {
        template: RuleTemplate,
        value: String,
    },
    #[error("expiry computation overflowed the calendar range")]
    Overflow,
}
