pub mod context;
pub mod error;
pub mod service;

pub use context::{CompletedGeneration, GenerationContext};
pub use error::GenerationError;
pub use service::GenerationService;
