pub mod boundary;
pub mod messages;

pub use boundary::{boundary_channel, BackgroundEndpoint, ContentEndpoint, MessageHandler};
pub use messages::{AuthStateChange, ConsentEvent, DeliveryAck, DeliveryError, Session};
