use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use consentlens_core_types::ConsentId;

/// A detection crossing the content-script/background boundary. Tags are
/// stable wire literals so recorded traffic stays readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsentEvent {
    #[serde(rename = "COOKIE_BANNER_DETECTED")]
    CookieBannerDetected {
        url: String,
        text: String,
        timestamp: DateTime<Utc>,
        #[serde(rename = "hasAcceptAll")]
        has_accept_all: bool,
        #[serde(rename = "hasRejectAll")]
        has_reject_all: bool,
        #[serde(rename = "hasCustomize")]
        has_customize: bool,
        status: bool,
    },
    #[serde(rename = "PRIVACY_POLICY_DETECTED")]
    PrivacyPolicyDetected {
        url: String,
        text: String,
        timestamp: DateTime<Utc>,
        status: bool,
    },
}

impl ConsentEvent {
    pub fn url(&self) -> &str {
        match self {
            ConsentEvent::CookieBannerDetected { url, .. } => url,
            ConsentEvent::PrivacyPolicyDetected { url, .. } => url,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ConsentEvent::CookieBannerDetected { .. } => "cookie_banner",
            ConsentEvent::PrivacyPolicyDetected { .. } => "privacy_policy",
        }
    }
}

/// Session material pushed from the companion app into the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Message propagating a freshly established session into the content
/// script's local storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "AUTH_STATE_CHANGE")]
pub struct AuthStateChange {
    pub session: Session,
}

/// Positive background response for one delivered detection.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryAck {
    pub consent_id: ConsentId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("user not logged in")]
    NotLoggedIn,
    #[error("background rejected detection: {0}")]
    Rejected(String),
    #[error("background unreachable: {0}")]
    Unreachable(String),
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn cookie_event_uses_original_wire_shape() {
        let event = ConsentEvent::CookieBannerDetected {
            url: "https://example.com".into(),
            text: "We use cookies".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            has_accept_all: true,
            has_reject_all: false,
            has_customize: true,
            status: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "COOKIE_BANNER_DETECTED");
        assert_eq!(json["hasAcceptAll"], true);
        assert_eq!(json["hasRejectAll"], false);
        assert_eq!(json["hasCustomize"], true);
        assert_eq!(json["status"], true);
    }

    #[test]
    fn auth_state_change_carries_the_literal_tag() {
        let change = AuthStateChange {
            session: Session {
                access_token: "a".into(),
                refresh_token: "r".into(),
                expires_at: 1_700_000_000,
            },
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "AUTH_STATE_CHANGE");
        assert_eq!(json["session"]["access_token"], "a");
    }

    #[test]
    fn policy_event_round_trips() {
        let event = ConsentEvent::PrivacyPolicyDetected {
            url: "https://example.com/privacy".into(),
            text: "Privacy".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            status: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ConsentEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
