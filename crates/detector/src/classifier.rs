use chrono::{DateTime, Utc};

use consentlens_core_types::ElementId;

use crate::errors::DetectError;
use crate::model::{bounded_text, ArtifactKind, BannerSignals, DetectedArtifact};
use crate::ports::DomPort;
use crate::selectors::{
    ACCEPT_VOCAB, BANNER_VOCAB, CUSTOMIZE_VOCAB, POLICY_CLASS_MARK, POLICY_HREF_VOCAB, REJECT_VOCAB,
};

/// Decides whether an element is a cookie-consent banner or a
/// privacy-policy reference and extracts the structured signals. Pure
/// with respect to the port: reads only, never mutates the document.
///
/// Banner classification wins over policy classification when both
/// vocabularies match, mirroring the scan order of the two families.
pub fn classify<D>(
    dom: &D,
    el: ElementId,
    detected_at: DateTime<Utc>,
) -> Result<Option<DetectedArtifact>, DetectError>
where
    D: DomPort + ?Sized,
{
    if dom.tag_name(el).is_none() {
        return Err(DetectError::Detached(el));
    }

    if matches_banner_vocab(dom, el) {
        let signals = BannerSignals {
            has_accept_all: has_button_intent(dom, el, ACCEPT_VOCAB),
            has_reject_all: has_button_intent(dom, el, REJECT_VOCAB),
            has_customize: has_button_intent(dom, el, CUSTOMIZE_VOCAB),
        };
        return Ok(Some(DetectedArtifact {
            kind: ArtifactKind::CookieBanner,
            source_url: dom.page_url(),
            raw_text: bounded_text(&dom.inner_text(el).unwrap_or_default()),
            target_url: None,
            signals: Some(signals),
            detected_at,
            default_decision: true,
        }));
    }

    if let Some(target_url) = policy_target(dom, el) {
        return Ok(Some(DetectedArtifact {
            kind: ArtifactKind::PrivacyPolicyLink,
            source_url: dom.page_url(),
            raw_text: bounded_text(&dom.inner_text(el).unwrap_or_default()),
            target_url,
            signals: None,
            detected_at,
            default_decision: true,
        }));
    }

    Ok(None)
}

/// True when the element, or any ancestor, carries one of the banner
/// vocabulary words in its class list or id.
fn matches_banner_vocab<D>(dom: &D, el: ElementId) -> bool
where
    D: DomPort + ?Sized,
{
    let mut current = Some(el);
    while let Some(node) = current {
        if element_has_banner_mark(dom, node) {
            return true;
        }
        current = dom.parent(node);
    }
    false
}

fn element_has_banner_mark<D>(dom: &D, el: ElementId) -> bool
where
    D: DomPort + ?Sized,
{
    let classes = dom.classes(el);
    let id = dom.attribute(el, "id").unwrap_or_default().to_lowercase();
    BANNER_VOCAB.iter().any(|word| {
        classes
            .iter()
            .any(|class| class.to_lowercase().contains(word))
            || id.contains(word)
    })
}

/// Policy match: an anchor whose href carries the policy vocabulary, or
/// any element whose class list carries the policy mark. Returns the
/// link destination when the element has one.
fn policy_target<D>(dom: &D, el: ElementId) -> Option<Option<String>>
where
    D: DomPort + ?Sized,
{
    let href = dom.attribute(el, "href");
    let is_anchor = dom
        .tag_name(el)
        .map(|tag| tag.eq_ignore_ascii_case("a"))
        .unwrap_or(false);

    if is_anchor {
        if let Some(href) = &href {
            let lower = href.to_lowercase();
            if POLICY_HREF_VOCAB.iter().any(|word| lower.contains(word)) {
                return Some(Some(href.clone()));
            }
        }
    }

    let marked = dom
        .classes(el)
        .iter()
        .any(|class| class.to_lowercase().contains(POLICY_CLASS_MARK));
    if marked {
        return Some(href);
    }

    None
}

/// True iff any `button`/`a` descendant's visible text matches the intent
/// vocabulary, case-insensitive.
fn has_button_intent<D>(dom: &D, el: ElementId, vocab: &[&str]) -> bool
where
    D: DomPort + ?Sized,
{
    dom.descendants(el, &["button", "a"]).iter().any(|button| {
        let text = dom
            .inner_text(*button)
            .unwrap_or_default()
            .to_lowercase();
        vocab.iter().any(|word| text.contains(word))
    })
}
