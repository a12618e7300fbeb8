//! Analysis domain module

mod draft;
mod prompt;
mod transcript;
mod transcript_analysis;

pub use draft::{AnalysisDraft, DRAFT_SHAPE_NAME};
pub use prompt::{
    PromptTemplates, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT_TEMPLATE, TRANSCRIPT_PLACEHOLDER,
};
pub use transcript::Transcript;
pub use transcript_analysis::{AnalysisId, TranscriptAnalysis};
