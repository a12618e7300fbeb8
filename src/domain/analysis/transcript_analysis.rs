//! Transcript analysis entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::draft::AnalysisDraft;

/// Opaque identifier of a stored analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnalysisId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Result of analyzing one transcript.
///
/// Fields are private: an analysis is created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptAnalysis {
    id: AnalysisId,
    summary: String,
    next_actions: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TranscriptAnalysis {
    /// Create a new analysis with a freshly generated id
    pub fn new(summary: impl Into<String>, next_actions: Vec<String>) -> Self {
        Self {
            id: AnalysisId::generate(),
            summary: summary.into(),
            next_actions,
            created_at: Utc::now(),
        }
    }

    /// Create a new analysis from a normalized draft
    pub fn from_draft(draft: AnalysisDraft) -> Self {
        Self::new(draft.summary, draft.next_actions)
    }

    pub fn id(&self) -> AnalysisId {
        self.id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn next_actions(&self) -> &[String] {
        &self.next_actions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_sets_fields() {
        let analysis = TranscriptAnalysis::new(
            "Refund request",
            vec!["Process refund".to_string(), "Notify customer".to_string()],
        );
        assert_eq!(analysis.summary(), "Refund request");
        assert_eq!(
            analysis.next_actions(),
            &["Process refund".to_string(), "Notify customer".to_string()]
        );
        assert!(analysis.created_at() <= Utc::now());
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<AnalysisId> = (0..1000)
            .map(|_| TranscriptAnalysis::new("s", vec![]).id())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn from_draft_keeps_action_order() {
        let draft = AnalysisDraft {
            summary: "S".to_string(),
            next_actions: vec!["z".to_string(), "a".to_string(), "m".to_string()],
        };
        let analysis = TranscriptAnalysis::from_draft(draft);
        assert_eq!(analysis.next_actions(), &["z", "a", "m"]);
    }

    #[test]
    fn id_display_parses_back() {
        let id = AnalysisId::generate();
        let parsed: AnalysisId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn id_rejects_garbage() {
        assert!("not-a-uuid".parse::<AnalysisId>().is_err());
    }
}
