//! In-memory analysis repository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::AnalysisRepository;
use crate::domain::analysis::{AnalysisId, TranscriptAnalysis};

/// Process-lifetime storage for analyses
#[derive(Debug, Default)]
pub struct InMemoryAnalysisRepository {
    store: RwLock<HashMap<AnalysisId, TranscriptAnalysis>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored analyses
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn save(&self, analysis: TranscriptAnalysis) {
        self.store.write().await.insert(analysis.id(), analysis);
    }

    async fn get(&self, id: AnalysisId) -> Option<TranscriptAnalysis> {
        self.store.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn analysis(summary: &str) -> TranscriptAnalysis {
        TranscriptAnalysis::new(summary, vec!["act".to_string()])
    }

    #[tokio::test]
    async fn save_then_get() {
        let repo = InMemoryAnalysisRepository::new();
        let saved = analysis("S");
        repo.save(saved.clone()).await;

        assert_eq!(repo.get(saved.id()).await, Some(saved));
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let repo = InMemoryAnalysisRepository::new();
        assert!(repo.is_empty().await);
        assert_eq!(repo.get(AnalysisId::generate()).await, None);
    }

    #[tokio::test]
    async fn save_is_idempotent() {
        let repo = InMemoryAnalysisRepository::new();
        let saved = analysis("S");

        repo.save(saved.clone()).await;
        repo.save(saved.clone()).await;

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get(saved.id()).await, Some(saved));
    }

    #[tokio::test]
    async fn concurrent_saves() {
        let repo = Arc::new(InMemoryAnalysisRepository::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    let a = analysis(&format!("summary {}", i));
                    let id = a.id();
                    repo.save(a).await;
                    id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        assert_eq!(repo.len().await, 50);
        for id in ids {
            assert!(repo.get(id).await.is_some());
        }
    }
}
