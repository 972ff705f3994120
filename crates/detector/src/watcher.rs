use std::sync::Arc;

use tracing::debug;

use consentlens_event_bus::ContentEndpoint;

use crate::emitter::emit;
use crate::events;
use crate::ports::DomPort;
use crate::scanner::Scanner;

/// Drives the scanner from observed DOM mutations. Batches are processed
/// strictly in observation order, one full scan pass per batch, after an
/// initial load-time pass. A failed delivery is reported and the loop
/// continues; the scan itself never stops for boundary trouble.
pub struct ChangeWatcher<D>
where
    D: DomPort,
{
    scanner: Arc<Scanner<D>>,
    content: ContentEndpoint,
}

impl<D> ChangeWatcher<D>
where
    D: DomPort,
{
    pub fn new(scanner: Arc<Scanner<D>>, content: ContentEndpoint) -> Self {
        Self { scanner, content }
    }

    /// Runs until the mutation feed closes.
    pub async fn run(self) {
        let mut mutations = self.scanner.dom().subscribe_mutations();
        self.sweep().await;
        while let Some(batch) = mutations.recv().await {
            debug!(
                target: "detector.events",
                inserted = batch.inserted.len(),
                removed = batch.removed.len(),
                "detector.mutations.observed"
            );
            self.sweep().await;
        }
    }

    async fn sweep(&self) {
        for artifact in self.scanner.scan() {
            let kind = artifact.kind;
            let event = emit(artifact);
            match self.content.deliver(event).await {
                Ok(ack) => {
                    debug!(
                        target: "detector.events",
                        kind = kind.label(),
                        consent = %ack.consent_id.0,
                        "detector.delivery.acknowledged"
                    );
                }
                Err(err) => events::emit_delivery_failure(kind, &err),
            }
        }
    }
}
