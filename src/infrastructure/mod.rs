//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the OpenAI API and the filesystem.

pub mod config;
pub mod language_model;
pub mod repository;

// Re-export adapters
pub use config::XdgConfigStore;
pub use language_model::{OpenAiBlockingLanguageModel, OpenAiLanguageModel, OpenAiSettings};
pub use repository::InMemoryAnalysisRepository;
