//! Scanning a document snapshot loaded from disk, the way the `scan`
//! subcommand consumes recorded pages.

use std::io::Write;
use std::sync::Arc;

use consentlens_detector::{ArtifactKind, MemoryDom, NodeSpec, Scanner};

const SNAPSHOT: &str = r#"{
    "children": [
        {
            "classes": ["site-header"],
            "children": [
                {
                    "tag": "a",
                    "attrs": { "href": "/datenschutz" },
                    "text": "Datenschutz"
                }
            ]
        },
        {
            "id": "cookie-notice",
            "text": "This site uses cookies",
            "children": [
                { "tag": "button", "text": "Accept all" },
                { "tag": "button", "text": "Cookie settings" }
            ]
        },
        {
            "classes": ["newsletter-modal"],
            "style": { "display": "none" },
            "text": "Subscribe!"
        }
    ]
}"#;

#[test]
fn snapshot_file_round_trips_into_detections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    let spec: NodeSpec = serde_json::from_str(&raw).unwrap();
    let dom = Arc::new(MemoryDom::from_spec("https://example.com/", &spec));
    let scanner = Scanner::new(dom);

    let artifacts = scanner.scan();
    assert_eq!(artifacts.len(), 2);

    let banner = artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::CookieBanner)
        .unwrap();
    assert!(banner.raw_text.contains("uses cookies"));
    let signals = banner.signals.unwrap();
    assert!(signals.has_accept_all);
    assert!(signals.has_customize);
    assert!(!signals.has_reject_all);

    let policy = artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::PrivacyPolicyLink)
        .unwrap();
    assert_eq!(policy.target_url.as_deref(), Some("/datenschutz"));

    // The hidden modal never matched a family, and rescanning the same
    // snapshot adds nothing.
    assert!(scanner.scan().is_empty());
}
