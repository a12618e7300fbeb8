//! Adapter binding: how the service reaches its language model

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::config::AdapterMode;

use super::ports::{
    AdapterOutput, BlockingLanguageModel, LanguageModel, LanguageModelError, StructuredRequest,
};

/// A language model bound either as an awaitable call or as a blocking call
/// bridged onto a bounded worker pool.
///
/// The choice is made once at wiring time; callers always see a single
/// awaitable [`AdapterBinding::invoke`].
#[derive(Clone)]
pub enum AdapterBinding {
    Async(Arc<dyn LanguageModel>),
    Blocking {
        model: Arc<dyn BlockingLanguageModel>,
        pool: Arc<Semaphore>,
    },
}

impl AdapterBinding {
    /// Bind a non-blocking adapter
    pub fn non_blocking(model: impl LanguageModel + 'static) -> Self {
        Self::Async(Arc::new(model))
    }

    /// Bind a blocking adapter behind a pool of `workers` threads (at least one)
    pub fn blocking(model: impl BlockingLanguageModel + 'static, workers: usize) -> Self {
        Self::Blocking {
            model: Arc::new(model),
            pool: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn mode(&self) -> AdapterMode {
        match self {
            Self::Async(_) => AdapterMode::Async,
            Self::Blocking { .. } => AdapterMode::Blocking,
        }
    }

    /// Invoke the adapter and await its single result.
    ///
    /// Dropping the returned future abandons an async call. A blocking call
    /// that already started runs to completion on its worker and its result
    /// is discarded.
    pub async fn invoke(
        &self,
        request: StructuredRequest,
    ) -> Result<AdapterOutput, LanguageModelError> {
        match self {
            Self::Async(model) => model.structured_output(&request).await,
            Self::Blocking { model, pool } => {
                let permit = Arc::clone(pool)
                    .acquire_owned()
                    .await
                    .map_err(|e| LanguageModelError::Worker(e.to_string()))?;
                debug!(
                    available = pool.available_permits(),
                    "dispatching blocking adapter call"
                );

                let model = Arc::clone(model);
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    model.structured_output_blocking(&request)
                })
                .await
                .map_err(|e| LanguageModelError::Worker(e.to_string()))?
            }
        }
    }
}

impl std::fmt::Debug for AdapterBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Async(_) => f.write_str("AdapterBinding::Async"),
            Self::Blocking { pool, .. } => f
                .debug_struct("AdapterBinding::Blocking")
                .field("available_workers", &pool.available_permits())
                .finish(),
        }
    }
}
