use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::messages::{ConsentEvent, DeliveryAck, DeliveryError};

/// Background-side processing of one delivered detection.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, event: ConsentEvent) -> Result<DeliveryAck, DeliveryError>;
}

type Exchange = (
    ConsentEvent,
    oneshot::Sender<Result<DeliveryAck, DeliveryError>>,
);

/// Content-script end of the extension messaging boundary. One
/// request/response exchange per detection, no ordering guarantee
/// across channels.
#[derive(Clone)]
pub struct ContentEndpoint {
    tx: mpsc::Sender<Exchange>,
}

impl ContentEndpoint {
    pub async fn deliver(&self, event: ConsentEvent) -> Result<DeliveryAck, DeliveryError> {
        let (respond, response) = oneshot::channel();
        self.tx
            .send((event, respond))
            .await
            .map_err(|_| DeliveryError::Unreachable("background channel closed".into()))?;
        response
            .await
            .map_err(|_| DeliveryError::Unreachable("background dropped the exchange".into()))?
    }
}

/// Background end: drains exchanges in arrival order and answers each one.
pub struct BackgroundEndpoint {
    rx: mpsc::Receiver<Exchange>,
}

impl BackgroundEndpoint {
    /// Serves until every content endpoint is dropped.
    pub async fn serve<H>(mut self, handler: Arc<H>)
    where
        H: MessageHandler + ?Sized,
    {
        while let Some((event, respond)) = self.rx.recv().await {
            debug!(
                target: "bus.events",
                kind = event.kind_label(),
                url = event.url(),
                "bus.exchange.received"
            );
            let outcome = handler.handle(event).await;
            // A caller that gave up waiting is not an error here.
            let _ = respond.send(outcome);
        }
    }
}

pub fn boundary_channel(capacity: usize) -> (ContentEndpoint, BackgroundEndpoint) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ContentEndpoint { tx }, BackgroundEndpoint { rx })
}
