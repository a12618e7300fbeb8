//! Prompt templates value object

use crate::domain::error::PromptTemplateError;

use super::transcript::Transcript;

/// Placeholder replaced by the transcript text in the user prompt template
pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Default system instruction for all analyses
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an assistant that summarizes conversation transcripts and extracts next actions.

Instructions:
- Write a concise, factual summary of what was discussed
- List concrete next actions, most important first
- Each next action is a single short imperative sentence
- Do NOT invent facts that are not in the transcript"#;

/// Default user prompt template
pub const DEFAULT_USER_PROMPT_TEMPLATE: &str = "Analyze the following transcript and return a short summary and 3-7 next actions.\n\nTranscript:\n{transcript}";

/// The fixed system prompt and the user prompt template used for every analysis.
///
/// Construction validates that the template has exactly one placeholder, so
/// rendering is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    system: String,
    user_template: String,
}

impl PromptTemplates {
    pub fn new(
        system: impl Into<String>,
        user_template: impl Into<String>,
    ) -> Result<Self, PromptTemplateError> {
        let user_template = user_template.into();
        let found = user_template.matches(TRANSCRIPT_PLACEHOLDER).count();
        if found != 1 {
            return Err(PromptTemplateError { found });
        }
        Ok(Self {
            system: system.into(),
            user_template,
        })
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user_template(&self) -> &str {
        &self.user_template
    }

    /// Substitute the transcript into the user prompt template
    pub fn render_user(&self, transcript: &Transcript) -> String {
        self.user_template
            .replacen(TRANSCRIPT_PLACEHOLDER, transcript.as_str(), 1)
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_template: DEFAULT_USER_PROMPT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_valid() {
        let defaults = PromptTemplates::default();
        let rebuilt =
            PromptTemplates::new(defaults.system(), defaults.user_template()).unwrap();
        assert_eq!(defaults, rebuilt);
    }

    #[test]
    fn render_substitutes_transcript() {
        let templates = PromptTemplates::default();
        let transcript = Transcript::new("Customer asked for a refund.").unwrap();
        let prompt = templates.render_user(&transcript);
        assert!(prompt.ends_with("Transcript:\nCustomer asked for a refund."));
        assert!(!prompt.contains(TRANSCRIPT_PLACEHOLDER));
    }

    #[test]
    fn render_leaves_placeholder_text_inside_transcript() {
        let templates = PromptTemplates::new("sys", "<<{transcript}>>").unwrap();
        let transcript = Transcript::new("say {transcript}").unwrap();
        assert_eq!(templates.render_user(&transcript), "<<say {transcript}>>");
    }

    #[test]
    fn rejects_missing_placeholder() {
        let err = PromptTemplates::new("sys", "no placeholder").unwrap_err();
        assert_eq!(err.found, 0);
    }

    #[test]
    fn rejects_repeated_placeholder() {
        let err = PromptTemplates::new("sys", "{transcript} and {transcript}").unwrap_err();
        assert_eq!(err.found, 2);
    }
}
