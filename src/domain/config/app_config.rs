//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{PromptTemplates, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT_TEMPLATE};
use crate::domain::error::PromptTemplateError;

use super::adapter_mode::AdapterMode;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8010;
pub const DEFAULT_BLOCKING_WORKERS: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub adapter_mode: Option<String>,
    pub blocking_workers: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub system_prompt: Option<String>,
    pub user_prompt_template: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            adapter_mode: Some(AdapterMode::default().to_string()),
            blocking_workers: Some(DEFAULT_BLOCKING_WORKERS),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            system_prompt: None,
            user_prompt_template: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            base_url: other.base_url.or(self.base_url),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            adapter_mode: other.adapter_mode.or(self.adapter_mode),
            blocking_workers: other.blocking_workers.or(self.blocking_workers),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            system_prompt: other.system_prompt.or(self.system_prompt),
            user_prompt_template: other.user_prompt_template.or(self.user_prompt_template),
        }
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Worker pool size for blocking adapters, never zero
    pub fn blocking_workers_or_default(&self) -> usize {
        self.blocking_workers
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BLOCKING_WORKERS)
    }

    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Build the prompt templates, falling back to the compiled-in texts for
    /// unset fields. A configured template without exactly one placeholder is
    /// an error rather than a silent fallback.
    pub fn prompt_templates(&self) -> Result<PromptTemplates, PromptTemplateError> {
        PromptTemplates::new(
            self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT),
            self.user_prompt_template
                .as_deref()
                .unwrap_or(DEFAULT_USER_PROMPT_TEMPLATE),
        )
    }
}
