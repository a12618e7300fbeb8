//! Language model port interface

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::analysis::{AnalysisDraft, DRAFT_SHAPE_NAME};

/// Language model errors
#[derive(Debug, Clone, Error)]
pub enum LanguageModelError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Worker pool failure: {0}")]
    Worker(String),

    #[error("Empty model response")]
    EmptyResponse,

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl LanguageModelError {
    /// True when the backend answered but the answer cannot be interpreted,
    /// as opposed to the backend being unreachable or refusing the call.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EmptyResponse | Self::ParseError(_))
    }
}

/// Descriptor of the shape the backend must produce
#[derive(Debug, Clone, PartialEq)]
pub struct ResultShape {
    pub name: String,
    pub schema: Value,
}

impl ResultShape {
    /// The `summary` + `next_actions` shape
    pub fn analysis_draft() -> Self {
        Self {
            name: DRAFT_SHAPE_NAME.to_string(),
            schema: AnalysisDraft::json_schema(),
        }
    }
}

/// One structured-output call: prompts plus the requested shape
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub shape: ResultShape,
}

/// What an adapter hands back.
///
/// Adapters that can decode into the requested shape return `Structured`;
/// adapters that only have the backend's JSON return `Json` and leave
/// normalization to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutput {
    Structured(AnalysisDraft),
    Json(Value),
}

/// Port for non-blocking structured output
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Produce output conforming to `request.shape`.
    ///
    /// # Arguments
    /// * `request` - System prompt, user prompt and target shape
    ///
    /// # Returns
    /// The adapter's output or an error
    async fn structured_output(
        &self,
        request: &StructuredRequest,
    ) -> Result<AdapterOutput, LanguageModelError>;
}

/// Port for blocking structured output.
///
/// Implementations may block the calling thread; the service only ever calls
/// them from its worker pool.
pub trait BlockingLanguageModel: Send + Sync {
    fn structured_output_blocking(
        &self,
        request: &StructuredRequest,
    ) -> Result<AdapterOutput, LanguageModelError>;
}
