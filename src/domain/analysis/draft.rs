//! Structured output shape requested from the language model

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Name under which the result shape is declared to the backend
pub const DRAFT_SHAPE_NAME: &str = "transcript_analysis";

/// The two fields a backend must produce for one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDraft {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub next_actions: Vec<String>,
}

impl AnalysisDraft {
    pub fn new(summary: impl Into<String>, next_actions: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            next_actions,
        }
    }

    /// Trimmed summary and trimmed, non-empty next actions in their original order
    pub fn canonical(self) -> Self {
        Self {
            summary: self.summary.trim().to_string(),
            next_actions: self
                .next_actions
                .into_iter()
                .map(|action| action.trim().to_string())
                .filter(|action| !action.is_empty())
                .collect(),
        }
    }

    /// JSON Schema describing this shape (strict structured-output dialect)
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Short summary of the transcript"
                },
                "next_actions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Recommended next actions, most important first"
                }
            },
            "required": ["summary", "next_actions"],
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_defaults_missing_fields() {
        let draft: AnalysisDraft = serde_json::from_str(r#"{"summary":"S"}"#).unwrap();
        assert_eq!(draft, AnalysisDraft::new("S", vec![]));

        let draft: AnalysisDraft = serde_json::from_str(r#"{"next_actions":["a"]}"#).unwrap();
        assert_eq!(draft, AnalysisDraft::new("", vec!["a".to_string()]));
    }

    #[test]
    fn canonical_trims_and_drops_blank_actions() {
        let draft = AnalysisDraft::new(
            " Refund request\n",
            vec![
                " Process refund ".to_string(),
                "".to_string(),
                "  ".to_string(),
                "Notify".to_string(),
            ],
        );
        assert_eq!(
            draft.canonical(),
            AnalysisDraft::new(
                "Refund request",
                vec!["Process refund".to_string(), "Notify".to_string()]
            )
        );
    }

    #[test]
    fn schema_requires_both_fields() {
        let schema = AnalysisDraft::json_schema();
        assert_eq!(schema["required"], json!(["summary", "next_actions"]));
        assert_eq!(schema["properties"]["next_actions"]["items"]["type"], "string");
    }
}
