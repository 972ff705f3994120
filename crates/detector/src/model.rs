use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use consentlens_core_types::ElementId;

/// Upper bound on extracted banner/policy text carried in an artifact.
pub const RAW_TEXT_MAX: usize = 2000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ArtifactKind {
    CookieBanner,
    PrivacyPolicyLink,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::CookieBanner => "cookie_banner",
            ArtifactKind::PrivacyPolicyLink => "privacy_policy",
        }
    }
}

/// Button intents extracted from a cookie banner's descendants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BannerSignals {
    pub has_accept_all: bool,
    pub has_reject_all: bool,
    pub has_customize: bool,
}

/// One scan match. Transient: converted into a `ConsentEvent` and dropped;
/// never persisted. The matched element is marked processed in the
/// scanner's side table so it is emitted at most once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedArtifact {
    pub kind: ArtifactKind,
    pub source_url: String,
    pub raw_text: String,
    pub target_url: Option<String>,
    pub signals: Option<BannerSignals>,
    pub detected_at: DateTime<Utc>,
    /// The decision recorded for the detection. Always true: the recorded
    /// default is "accepted" regardless of which button signals are
    /// present. Wiring signals into the decision needs product sign-off.
    pub default_decision: bool,
}

/// One observed batch of subtree mutations under the document body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationBatch {
    pub inserted: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

/// Cosmetic page annotation applied to a matched element: a highlight
/// marker plus an informational badge and tooltip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub marker_class: &'static str,
    pub badge_class: &'static str,
    pub tooltip_class: &'static str,
    pub tooltip_text: &'static str,
}

impl Annotation {
    pub fn for_kind(kind: ArtifactKind) -> Self {
        Self {
            marker_class: "consentlens-highlight",
            badge_class: "consentlens-badge",
            tooltip_class: "consentlens-tooltip",
            tooltip_text: match kind {
                ArtifactKind::CookieBanner => "Cookie Banner Detected",
                ArtifactKind::PrivacyPolicyLink => "Privacy Policy Detected",
            },
        }
    }
}

/// Truncates extracted text to the artifact bound on a char boundary.
pub fn bounded_text(text: &str) -> String {
    if text.chars().count() <= RAW_TEXT_MAX {
        text.to_string()
    } else {
        text.chars().take(RAW_TEXT_MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through_untouched() {
        assert_eq!(bounded_text("We use cookies"), "We use cookies");
        assert_eq!(bounded_text(&"a".repeat(RAW_TEXT_MAX)).len(), RAW_TEXT_MAX);
    }

    #[test]
    fn overlong_text_is_cut_at_the_char_bound() {
        let long = "b".repeat(RAW_TEXT_MAX + 50);
        assert_eq!(bounded_text(&long).chars().count(), RAW_TEXT_MAX);
    }

    #[test]
    fn multibyte_char_at_the_bound_survives_whole() {
        // The 2000th char is multi-byte; the cut must keep it intact,
        // not split its encoding.
        let text = format!("{}ä{}", "a".repeat(RAW_TEXT_MAX - 1), "ö".repeat(30));
        let bounded = bounded_text(&text);
        assert_eq!(bounded.chars().count(), RAW_TEXT_MAX);
        assert_eq!(bounded.chars().last(), Some('ä'));
        assert!(!bounded.contains('ö'));
    }
}
