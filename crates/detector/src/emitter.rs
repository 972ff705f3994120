use consentlens_event_bus::ConsentEvent;

use crate::model::{ArtifactKind, DetectedArtifact};

/// Flattens an artifact into the message that crosses the extension
/// boundary. The artifact is consumed; nothing retains it afterwards.
///
/// For policy links the event carries the link destination when one was
/// extracted, falling back to the page URL.
pub fn emit(artifact: DetectedArtifact) -> ConsentEvent {
    match artifact.kind {
        ArtifactKind::CookieBanner => {
            let signals = artifact.signals.unwrap_or_default();
            ConsentEvent::CookieBannerDetected {
                url: artifact.source_url,
                text: artifact.raw_text,
                timestamp: artifact.detected_at,
                has_accept_all: signals.has_accept_all,
                has_reject_all: signals.has_reject_all,
                has_customize: signals.has_customize,
                status: artifact.default_decision,
            }
        }
        ArtifactKind::PrivacyPolicyLink => ConsentEvent::PrivacyPolicyDetected {
            url: artifact.target_url.unwrap_or(artifact.source_url),
            text: artifact.raw_text,
            timestamp: artifact.detected_at,
            status: artifact.default_decision,
        },
    }
}
