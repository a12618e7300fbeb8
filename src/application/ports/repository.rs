//! Analysis repository port interface

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisId, TranscriptAnalysis};

/// Port for storing completed analyses.
///
/// Implementations must be safe for concurrent use from many requests.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Insert or replace the analysis stored under its id
    async fn save(&self, analysis: TranscriptAnalysis);

    /// Look up an analysis by id
    async fn get(&self, id: AnalysisId) -> Option<TranscriptAnalysis>;
}
