//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod analysis;
pub mod config;
pub mod error;

// Re-export common types
pub use analysis::{AnalysisDraft, AnalysisId, PromptTemplates, Transcript, TranscriptAnalysis};
pub use config::{AdapterMode, AppConfig};
pub use error::*;
