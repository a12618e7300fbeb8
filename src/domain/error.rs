//! Domain error types

use thiserror::Error;

/// Error when a transcript is empty or whitespace-only
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transcript cannot be empty")]
pub struct EmptyTranscriptError;

/// Error when a user prompt template is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("User prompt template must contain exactly one {{transcript}} placeholder, found {found}")]
pub struct PromptTemplateError {
    pub found: usize,
}

/// Error when an invalid adapter mode is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid adapter mode: \"{input}\". Valid modes are: async, blocking")]
pub struct InvalidAdapterModeError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
