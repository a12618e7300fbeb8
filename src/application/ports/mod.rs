//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod language_model;
pub mod repository;

// Re-export common types
pub use config::ConfigStore;
pub use language_model::{
    AdapterOutput, BlockingLanguageModel, LanguageModel, LanguageModelError, ResultShape,
    StructuredRequest,
};
pub use repository::AnalysisRepository;
