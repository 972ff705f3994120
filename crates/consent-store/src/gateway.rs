use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use consentlens_auth_bridge::IdentityPort;
use consentlens_core_types::{ConsentId, ConsentKind, UserId};
use consentlens_event_bus::{ConsentEvent, DeliveryAck, DeliveryError, MessageHandler};
use consentlens_revoke_engine::{is_expired, RuleSpec, RuleTemplate};

use crate::errors::{GatewayError, StoreError};
use crate::model::{ConsentFilter, ConsentRecord, ConsentUpdate, NewConsent, NewPolicy};
use crate::port::RecordStore;

/// Translates detection events and dashboard rule operations into store
/// calls. Failures propagate to the caller untouched; there is no retry
/// and no partial write.
pub struct ConsentGateway<S>
where
    S: RecordStore,
{
    store: Arc<S>,
}

impl<S> ConsentGateway<S>
where
    S: RecordStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persists one delivered detection for `user`. A policy detection
    /// captures the policy text first, then the consent row referencing
    /// it.
    pub async fn handle_event(
        &self,
        event: ConsentEvent,
        user: &UserId,
    ) -> Result<ConsentRecord, StoreError> {
        let record = match event {
            ConsentEvent::CookieBannerDetected {
                url,
                timestamp,
                status,
                ..
            } => {
                self.store
                    .insert_consent(NewConsent {
                        user_id: user.clone(),
                        website_url: url,
                        consent_type: ConsentKind::Cookie,
                        status,
                        policy_id: None,
                        created_at: timestamp,
                    })
                    .await?
            }
            ConsentEvent::PrivacyPolicyDetected {
                url,
                text,
                timestamp,
                status,
            } => {
                let policy = self
                    .store
                    .insert_policy(NewPolicy {
                        title: "Privacy Policy".into(),
                        content: text,
                        created_at: timestamp,
                    })
                    .await?;
                self.store
                    .insert_consent(NewConsent {
                        user_id: user.clone(),
                        website_url: url,
                        consent_type: ConsentKind::Policy,
                        status,
                        policy_id: Some(policy.id),
                        created_at: timestamp,
                    })
                    .await?
            }
        };
        debug!(
            target: "gateway.events",
            consent = %record.id.0,
            kind = %record.consent_type,
            url = record.website_url,
            "gateway.consent.recorded"
        );
        Ok(record)
    }

    /// Manual dashboard entry, recorded at call time.
    pub async fn add_consent(
        &self,
        user: &UserId,
        website_url: impl Into<String>,
        consent_type: ConsentKind,
        status: bool,
    ) -> Result<ConsentRecord, StoreError> {
        self.store
            .insert_consent(NewConsent {
                user_id: user.clone(),
                website_url: website_url.into(),
                consent_type,
                status,
                policy_id: None,
                created_at: Utc::now(),
            })
            .await
    }

    /// All of a user's consents, newest first, optionally narrowed by
    /// type.
    pub async fn list_consents(
        &self,
        user: &UserId,
        consent_type: Option<ConsentKind>,
    ) -> Result<Vec<ConsentRecord>, StoreError> {
        self.store
            .select_consents(ConsentFilter {
                user_id: user.clone(),
                consent_type,
            })
            .await
    }

    pub async fn toggle_consent(
        &self,
        id: &ConsentId,
        status: bool,
    ) -> Result<ConsentRecord, StoreError> {
        self.store
            .update_consent(id, ConsentUpdate::Status(status))
            .await
    }

    /// Attaches or clears the auto-revoke rule. Attaching replaces any
    /// existing rule wholesale and derives the expiry at call time;
    /// clearing drops rule and expiry in the same update.
    pub async fn set_auto_revoke_rule(
        &self,
        id: &ConsentId,
        rule: Option<(RuleTemplate, String)>,
        now: DateTime<Utc>,
    ) -> Result<ConsentRecord, GatewayError> {
        let update = match rule {
            Some((template, value)) => {
                let spec = RuleSpec::attach(template, value, now)?;
                ConsentUpdate::Rule {
                    expiry_date: spec.computed_expiry,
                    rule: Some(spec),
                }
            }
            None => ConsentUpdate::Rule {
                rule: None,
                expiry_date: None,
            },
        };
        Ok(self.store.update_consent(id, update).await?)
    }

    pub async fn delete_consent(&self, id: &ConsentId) -> Result<(), StoreError> {
        self.store.delete_consent(id).await
    }

    /// Advisory view of consents whose expiry has passed. Nothing is
    /// mutated here; revocation stays an explicit dashboard action.
    pub async fn expired_consents(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<ConsentRecord>, StoreError> {
        let rows = self.list_consents(user, None).await?;
        Ok(rows
            .into_iter()
            .filter(|record| record.status && is_expired(record.expiry_date, now))
            .collect())
    }
}

/// Background-side message handler: gates every delivery on the signed-in
/// user, then hands the event to the gateway.
pub struct BackgroundHandler<S, I>
where
    S: RecordStore,
    I: IdentityPort,
{
    gateway: ConsentGateway<S>,
    identity: Arc<I>,
}

impl<S, I> BackgroundHandler<S, I>
where
    S: RecordStore,
    I: IdentityPort,
{
    pub fn new(gateway: ConsentGateway<S>, identity: Arc<I>) -> Self {
        Self { gateway, identity }
    }

    pub fn gateway(&self) -> &ConsentGateway<S> {
        &self.gateway
    }
}

#[async_trait]
impl<S, I> MessageHandler for BackgroundHandler<S, I>
where
    S: RecordStore,
    I: IdentityPort,
{
    async fn handle(&self, event: ConsentEvent) -> Result<DeliveryAck, DeliveryError> {
        let user = self
            .identity
            .current_user()
            .await
            .map_err(|err| DeliveryError::Unreachable(err.to_string()))?
            .ok_or(DeliveryError::NotLoggedIn)?;

        match self.gateway.handle_event(event, &user).await {
            Ok(record) => Ok(DeliveryAck {
                consent_id: record.id,
            }),
            Err(err) => {
                warn!(
                    target: "gateway.events",
                    %err,
                    "gateway.detection.rejected"
                );
                Err(DeliveryError::Rejected(err.to_string()))
            }
        }
    }
}
