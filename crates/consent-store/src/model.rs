use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use consentlens_core_types::{ConsentId, ConsentKind, PolicyId, UserId};
use consentlens_revoke_engine::RuleSpec;

/// One persisted consent decision. Field names serialize as the backing
/// table's columns. Duplicate detections create duplicate rows; there is
/// no uniqueness over (user, url, type).
///
/// Invariant, maintained by the gateway's rule operations: `expiry_date`
/// equals the attached rule's computed expiry and is null exactly when
/// `auto_revoke_rule` is null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub id: ConsentId,
    pub user_id: UserId,
    pub website_url: String,
    pub consent_type: ConsentKind,
    pub status: bool,
    pub auto_revoke_rule: Option<RuleSpec>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub policy_id: Option<PolicyId>,
    pub created_at: DateTime<Utc>,
}

/// Captured privacy-policy text referenced by policy-type consents.
/// Immutable once inserted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyText {
    pub id: PolicyId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewConsent {
    pub user_id: UserId,
    pub website_url: String,
    pub consent_type: ConsentKind,
    pub status: bool,
    pub policy_id: Option<PolicyId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPolicy {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Row selection: always scoped to one user, optionally narrowed by
/// consent type. Results come back ordered by creation time, newest
/// first.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsentFilter {
    pub user_id: UserId,
    pub consent_type: Option<ConsentKind>,
}

/// Whole-field updates only; last writer wins. The rule variant carries
/// rule and expiry together so they change as one logical write.
#[derive(Clone, Debug, PartialEq)]
pub enum ConsentUpdate {
    Status(bool),
    Rule {
        rule: Option<RuleSpec>,
        expiry_date: Option<DateTime<Utc>>,
    },
}
