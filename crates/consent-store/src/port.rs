use async_trait::async_trait;

use consentlens_core_types::ConsentId;

use crate::errors::StoreError;
use crate::model::{ConsentFilter, ConsentRecord, ConsentUpdate, NewConsent, NewPolicy, PolicyText};

/// The queryable table store behind the gateway. Operations are
/// whole-row; there are no partial-field transactions and no optimistic
/// concurrency tokens.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_consent(&self, row: NewConsent) -> Result<ConsentRecord, StoreError>;

    async fn update_consent(
        &self,
        id: &ConsentId,
        update: ConsentUpdate,
    ) -> Result<ConsentRecord, StoreError>;

    async fn delete_consent(&self, id: &ConsentId) -> Result<(), StoreError>;

    /// Matching rows ordered by `created_at` descending.
    async fn select_consents(&self, filter: ConsentFilter)
        -> Result<Vec<ConsentRecord>, StoreError>;

    async fn insert_policy(&self, row: NewPolicy) -> Result<PolicyText, StoreError>;
}
