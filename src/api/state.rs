//! Shared application state

use std::sync::Arc;

use crate::application::ports::AnalysisRepository;
use crate::application::TranscriptAnalyzer;

/// State handed to every handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<TranscriptAnalyzer>,
    pub repository: Arc<dyn AnalysisRepository>,
}

impl AppState {
    pub fn new(analyzer: TranscriptAnalyzer, repository: impl AnalysisRepository + 'static) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            repository: Arc::new(repository),
        }
    }
}
