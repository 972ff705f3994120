pub mod errors;
pub mod gateway;
pub mod memory;
pub mod model;
pub mod port;

#[cfg(test)]
mod tests;

pub use errors::{GatewayError, StoreError};
pub use gateway::{BackgroundHandler, ConsentGateway};
pub use memory::MemoryRecordStore;
pub use model::{ConsentFilter, ConsentRecord, ConsentUpdate, NewConsent, NewPolicy, PolicyText};
pub use port::RecordStore;
