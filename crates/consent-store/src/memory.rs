use async_trait::async_trait;
use parking_lot::RwLock;

use consentlens_core_types::{ConsentId, PolicyId};

use crate::errors::StoreError;
use crate::model::{ConsentFilter, ConsentRecord, ConsentUpdate, NewConsent, NewPolicy, PolicyText};
use crate::port::RecordStore;

/// In-memory record store for wiring, offline replay and tests.
#[derive(Default)]
pub struct MemoryRecordStore {
    consents: RwLock<Vec<ConsentRecord>>,
    policies: RwLock<Vec<PolicyText>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(&self, id: &PolicyId) -> Option<PolicyText> {
        self.policies
            .read()
            .iter()
            .find(|policy| &policy.id == id)
            .cloned()
    }

    pub fn policy_count(&self) -> usize {
        self.policies.read().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_consent(&self, row: NewConsent) -> Result<ConsentRecord, StoreError> {
        let record = ConsentRecord {
            id: ConsentId::new(),
            user_id: row.user_id,
            website_url: row.website_url,
            consent_type: row.consent_type,
            status: row.status,
            auto_revoke_rule: None,
            expiry_date: None,
            policy_id: row.policy_id,
            created_at: row.created_at,
        };
        self.consents.write().push(record.clone());
        Ok(record)
    }

    async fn update_consent(
        &self,
        id: &ConsentId,
        update: ConsentUpdate,
    ) -> Result<ConsentRecord, StoreError> {
        let mut consents = self.consents.write();
        let record = consents
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        match update {
            ConsentUpdate::Status(status) => record.status = status,
            ConsentUpdate::Rule { rule, expiry_date } => {
                record.auto_revoke_rule = rule;
                record.expiry_date = expiry_date;
            }
        }
        Ok(record.clone())
    }

    async fn delete_consent(&self, id: &ConsentId) -> Result<(), StoreError> {
        let mut consents = self.consents.write();
        let before = consents.len();
        consents.retain(|record| &record.id != id);
        if consents.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn select_consents(
        &self,
        filter: ConsentFilter,
    ) -> Result<Vec<ConsentRecord>, StoreError> {
        let mut rows: Vec<ConsentRecord> = self
            .consents
            .read()
            .iter()
            .filter(|record| {
                record.user_id == filter.user_id
                    && filter
                        .consent_type
                        .map(|kind| record.consent_type == kind)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_policy(&self, row: NewPolicy) -> Result<PolicyText, StoreError> {
        let policy = PolicyText {
            id: PolicyId::new(),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        };
        self.policies.write().push(policy.clone());
        Ok(policy)
    }
}
