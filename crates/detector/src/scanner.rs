use std::sync::Arc;

use chrono::Utc;
use dashmap::DashSet;

use consentlens_core_types::ElementId;

use crate::classifier::classify;
use crate::events;
use crate::model::{Annotation, DetectedArtifact};
use crate::ports::DomPort;
use crate::selectors::{COOKIE_BANNER_FAMILY, PRIVACY_POLICY_FAMILY};
use crate::visibility::is_visible;

/// Orchestrates idempotent sweeps over the document. The processed set is
/// a side table of element handles owned here, so bookkeeping never
/// leaks into application-visible markup. `DashSet::insert` is the
/// atomic check-and-mark step; an element yields at most one artifact
/// for its whole lifetime in the document.
pub struct Scanner<D>
where
    D: DomPort,
{
    dom: Arc<D>,
    processed: DashSet<ElementId>,
}

impl<D> Scanner<D>
where
    D: DomPort,
{
    pub fn new(dom: Arc<D>) -> Self {
        Self {
            dom,
            processed: DashSet::new(),
        }
    }

    pub fn dom(&self) -> &Arc<D> {
        &self.dom
    }

    /// One full pass over both selector families. Runs to completion
    /// synchronously over the current document; an empty result is a
    /// valid outcome. A classification failure skips that element only.
    pub fn scan(&self) -> Vec<DetectedArtifact> {
        let mut artifacts = Vec::new();
        let mut candidates = 0usize;

        for selector in COOKIE_BANNER_FAMILY.iter().chain(PRIVACY_POLICY_FAMILY) {
            for el in self.dom.query(selector) {
                candidates += 1;
                if self.processed.contains(&el) {
                    continue;
                }
                let style = match self.dom.computed_style(el) {
                    Some(style) => style,
                    None => {
                        events::emit_detection_failure(&format!("{el}: no computed style"));
                        continue;
                    }
                };
                if !is_visible(&style) {
                    continue;
                }
                match classify(self.dom.as_ref(), el, Utc::now()) {
                    Ok(Some(artifact)) => {
                        if self.processed.insert(el) {
                            self.dom.annotate(el, &Annotation::for_kind(artifact.kind));
                            events::emit_artifact(artifact.kind, &artifact.source_url);
                            artifacts.push(artifact);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        events::emit_detection_failure(&err.to_string());
                    }
                }
            }
        }

        events::emit_scan(candidates, artifacts.len());
        artifacts
    }
}
