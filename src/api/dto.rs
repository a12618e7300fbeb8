//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::analysis::TranscriptAnalysis;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeQuery {
    pub transcript: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeBody {
    pub transcript: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchAnalyzeBody {
    pub transcripts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub summary: String,
    pub next_actions: Vec<String>,
}

impl From<&TranscriptAnalysis> for AnalysisResponse {
    fn from(analysis: &TranscriptAnalysis) -> Self {
        Self {
            id: analysis.id().to_string(),
            summary: analysis.summary().to_string(),
            next_actions: analysis.next_actions().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
