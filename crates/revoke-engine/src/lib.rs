pub mod engine;
pub mod errors;
pub mod model;


pub use engine::{compute_expiry, is_expired};
pub use errors::RuleError;
pub use model::{RuleSpec, RuleTemplate};
