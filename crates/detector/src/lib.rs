pub mod classifier;
pub mod emitter;
pub mod errors;
pub mod events;
pub mod memory_dom;
pub mod model;
pub mod ports;
pub mod scanner;
pub mod selectors;
pub mod visibility;
pub mod watcher;

pub use classifier::classify;
pub use emitter::emit;
pub use errors::DetectError;
pub use memory_dom::{MemoryDom, NodeSpec};
pub use model::{Annotation, ArtifactKind, BannerSignals, DetectedArtifact, MutationBatch};
pub use ports::{ComputedStyle, DomPort};
pub use scanner::Scanner;
pub use visibility::is_visible;
pub use watcher::ChangeWatcher;
