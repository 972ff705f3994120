use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use consentlens_auth_bridge::MemoryIdentity;
use consentlens_core_types::{ConsentKind, UserId};
use consentlens_event_bus::{ConsentEvent, DeliveryError, MessageHandler};
use consentlens_revoke_engine::{compute_expiry, RuleTemplate};

use crate::errors::{GatewayError, StoreError};
use crate::gateway::{BackgroundHandler, ConsentGateway};
use crate::memory::MemoryRecordStore;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

fn gateway() -> ConsentGateway<MemoryRecordStore> {
    ConsentGateway::new(Arc::new(MemoryRecordStore::new()))
}

fn banner_event(url: &str, timestamp: DateTime<Utc>) -> ConsentEvent {
    ConsentEvent::CookieBannerDetected {
        url: url.into(),
        text: "We use cookies".into(),
        timestamp,
        has_accept_all: true,
        has_reject_all: false,
        has_customize: false,
        status: true,
    }
}

#[tokio::test]
async fn cookie_detection_inserts_one_row_without_a_rule() {
    let gateway = gateway();
    let user = UserId::new();

    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
        .await
        .unwrap();

    assert_eq!(record.consent_type, ConsentKind::Cookie);
    assert!(record.status);
    assert_eq!(record.auto_revoke_rule, None);
    assert_eq!(record.expiry_date, None);
    assert_eq!(record.policy_id, None);
}

#[tokio::test]
async fn policy_detection_captures_text_then_consent() {
    let store = Arc::new(MemoryRecordStore::new());
    let gateway = ConsentGateway::new(Arc::clone(&store));
    let user = UserId::new();

    let record = gateway
        .handle_event(
            ConsentEvent::PrivacyPolicyDetected {
                url: "https://example.com/privacy".into(),
                text: "Full policy text".into(),
                timestamp: at(2024, 5, 1),
                status: true,
            },
            &user,
        )
        .await
        .unwrap();

    assert_eq!(record.consent_type, ConsentKind::Policy);
    let policy_id = record.policy_id.expect("policy reference");
    let policy = store.policy(&policy_id).expect("captured policy");
    assert_eq!(policy.title, "Privacy Policy");
    assert_eq!(policy.content, "Full policy text");
}

#[tokio::test]
async fn duplicate_detections_create_duplicate_rows() {
    let gateway = gateway();
    let user = UserId::new();

    for _ in 0..2 {
        gateway
            .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
            .await
            .unwrap();
    }

    let rows = gateway.list_consents(&user, None).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn list_orders_newest_first_and_filters_by_kind() {
    let gateway = gateway();
    let user = UserId::new();

    gateway
        .handle_event(banner_event("https://old.example.com", at(2024, 1, 1)), &user)
        .await
        .unwrap();
    gateway
        .handle_event(banner_event("https://new.example.com", at(2024, 6, 1)), &user)
        .await
        .unwrap();
    gateway
        .add_consent(&user, "https://manual.example.com", ConsentKind::Policy, true)
        .await
        .unwrap();

    let all = gateway.list_consents(&user, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].website_url, "https://manual.example.com");

    let cookies = gateway
        .list_consents(&user, Some(ConsentKind::Cookie))
        .await
        .unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].website_url, "https://new.example.com");
    assert_eq!(cookies[1].website_url, "https://old.example.com");
}

#[tokio::test]
async fn toggle_flips_only_status() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
        .await
        .unwrap();

    let revoked = gateway.toggle_consent(&record.id, false).await.unwrap();
    assert!(!revoked.status);
    assert_eq!(revoked.website_url, record.website_url);
}

#[tokio::test]
async fn set_rule_derives_expiry_and_clear_drops_both() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 1, 1)), &user)
        .await
        .unwrap();

    let now = at(2024, 1, 31);
    let updated = gateway
        .set_auto_revoke_rule(
            &record.id,
            Some((RuleTemplate::TimeBased, "1 month".into())),
            now,
        )
        .await
        .unwrap();
    let expected = compute_expiry(RuleTemplate::TimeBased, "1 month", now).unwrap();
    assert_eq!(updated.expiry_date, expected);
    assert_eq!(
        updated.auto_revoke_rule.as_ref().map(|rule| rule.template),
        Some(RuleTemplate::TimeBased)
    );

    let cleared = gateway
        .set_auto_revoke_rule(&record.id, None, now)
        .await
        .unwrap();
    assert_eq!(cleared.auto_revoke_rule, None);
    assert_eq!(cleared.expiry_date, None);
}

#[tokio::test]
async fn counter_rule_attaches_without_expiry() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
        .await
        .unwrap();

    let updated = gateway
        .set_auto_revoke_rule(
            &record.id,
            Some((RuleTemplate::VisitBased, "10 visits".into())),
            at(2024, 5, 2),
        )
        .await
        .unwrap();
    assert!(updated.auto_revoke_rule.is_some());
    assert_eq!(updated.expiry_date, None);
}

#[tokio::test]
async fn invalid_rule_value_never_reaches_the_store() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
        .await
        .unwrap();

    let err = gateway
        .set_auto_revoke_rule(
            &record.id,
            Some((RuleTemplate::TimeBased, "2 days".into())),
            at(2024, 5, 2),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Rule(_)));

    let rows = gateway.list_consents(&user, None).await.unwrap();
    assert_eq!(rows[0].auto_revoke_rule, None);
}

#[tokio::test]
async fn expired_view_is_advisory_and_read_only() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 1, 1)), &user)
        .await
        .unwrap();
    gateway
        .set_auto_revoke_rule(
            &record.id,
            Some((RuleTemplate::TimeBased, "1 day".into())),
            at(2024, 1, 1),
        )
        .await
        .unwrap();

    let before = gateway
        .expired_consents(&user, at(2024, 1, 1))
        .await
        .unwrap();
    assert!(before.is_empty());

    let after = gateway
        .expired_consents(&user, at(2024, 1, 3))
        .await
        .unwrap();
    assert_eq!(after.len(), 1);

    // The record itself is untouched: still active, still carrying the rule.
    let rows = gateway.list_consents(&user, None).await.unwrap();
    assert!(rows[0].status);
    assert!(rows[0].auto_revoke_rule.is_some());
}

#[tokio::test]
async fn delete_removes_the_row() {
    let gateway = gateway();
    let user = UserId::new();
    let record = gateway
        .handle_event(banner_event("https://example.com", at(2024, 5, 1)), &user)
        .await
        .unwrap();

    gateway.delete_consent(&record.id).await.unwrap();
    assert!(gateway.list_consents(&user, None).await.unwrap().is_empty());

    let err = gateway.delete_consent(&record.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn background_handler_rejects_signed_out_deliveries() {
    let handler = BackgroundHandler::new(gateway(), Arc::new(MemoryIdentity::signed_out()));
    let err = handler
        .handle(banner_event("https://example.com", at(2024, 5, 1)))
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::NotLoggedIn);
}

#[tokio::test]
async fn background_handler_records_for_the_signed_in_user() {
    let user = UserId::new();
    let store = Arc::new(MemoryRecordStore::new());
    let handler = BackgroundHandler::new(
        ConsentGateway::new(Arc::clone(&store)),
        Arc::new(MemoryIdentity::signed_in(user.clone())),
    );

    let ack = handler
        .handle(banner_event("https://example.com", at(2024, 5, 1)))
        .await
        .unwrap();

    let rows = handler
        .gateway()
        .list_consents(&user, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, ack.consent_id);
}
