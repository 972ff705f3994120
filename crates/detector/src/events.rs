use tracing::{debug, warn};

use consentlens_event_bus::DeliveryError;

use crate::model::ArtifactKind;

pub fn emit_scan(candidates: usize, artifacts: usize) {
    debug!(
        target: "detector.events",
        candidates,
        artifacts,
        "detector.scan.completed"
    );
}

pub fn emit_artifact(kind: ArtifactKind, url: &str) {
    debug!(
        target: "detector.events",
        kind = kind.label(),
        url,
        "detector.artifact.emitted"
    );
}

pub fn emit_detection_failure(detail: &str) {
    debug!(
        target: "detector.events",
        detail,
        "detector.element.skipped"
    );
}

pub fn emit_delivery_failure(kind: ArtifactKind, err: &DeliveryError) {
    warn!(
        target: "detector.events",
        kind = kind.label(),
        %err,
        "detector.delivery.failed"
    );
}
