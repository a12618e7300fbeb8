//! Analyze transcript use case

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::analysis::{PromptTemplates, Transcript, TranscriptAnalysis};
use crate::domain::error::EmptyTranscriptError;

use super::binding::AdapterBinding;
use super::normalize::{normalize, UnrecognizedOutput};
use super::ports::{LanguageModelError, ResultShape, StructuredRequest};

/// Errors from the analyze use case
#[derive(Debug, Clone, Error)]
pub enum AnalyzeError {
    #[error("{0}")]
    InvalidInput(#[from] EmptyTranscriptError),

    #[error("Language model unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Language model returned an unusable response: {0}")]
    AdapterContractViolation(String),
}

impl From<LanguageModelError> for AnalyzeError {
    fn from(err: LanguageModelError) -> Self {
        if err.is_contract_violation() {
            Self::AdapterContractViolation(err.to_string())
        } else {
            Self::AdapterUnavailable(err.to_string())
        }
    }
}

impl From<UnrecognizedOutput> for AnalyzeError {
    fn from(err: UnrecognizedOutput) -> Self {
        Self::AdapterContractViolation(err.to_string())
    }
}

/// Turns raw transcripts into normalized analyses.
///
/// Stateless apart from its adapter binding and prompts; share it behind an
/// `Arc` and call it from any number of tasks. Persisting results is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct TranscriptAnalyzer {
    binding: AdapterBinding,
    prompts: PromptTemplates,
}

impl TranscriptAnalyzer {
    pub fn new(binding: AdapterBinding, prompts: PromptTemplates) -> Self {
        Self { binding, prompts }
    }

    pub fn binding(&self) -> &AdapterBinding {
        &self.binding
    }

    /// Analyze one transcript.
    ///
    /// Blank input fails with [`AnalyzeError::InvalidInput`] before the
    /// adapter is called.
    pub async fn analyze(&self, transcript: &str) -> Result<TranscriptAnalysis, AnalyzeError> {
        let transcript = Transcript::new(transcript)?;
        let request = self.build_request(&transcript);

        debug!(
            chars = transcript.as_str().len(),
            mode = %self.binding.mode(),
            "invoking language model"
        );

        let output = self.binding.invoke(request).await.map_err(|e| {
            warn!(error = %e, "language model call failed");
            AnalyzeError::from(e)
        })?;

        let draft = normalize(output).map_err(|e| {
            warn!(error = %e, "language model output could not be normalized");
            AnalyzeError::from(e)
        })?;

        let analysis = TranscriptAnalysis::from_draft(draft);
        debug!(
            id = %analysis.id(),
            actions = analysis.next_actions().len(),
            "transcript analyzed"
        );
        Ok(analysis)
    }

    /// Analyze every transcript concurrently.
    ///
    /// Results come back in input order. The first failure fails the whole
    /// batch and the remaining in-flight analyses are dropped.
    pub async fn analyze_many<S: AsRef<str>>(
        &self,
        transcripts: &[S],
    ) -> Result<Vec<TranscriptAnalysis>, AnalyzeError> {
        try_join_all(transcripts.iter().map(|t| self.analyze(t.as_ref()))).await
    }

    fn build_request(&self, transcript: &Transcript) -> StructuredRequest {
        StructuredRequest {
            system_prompt: self.prompts.system().to_string(),
            user_prompt: self.prompts.render_user(transcript),
            shape: ResultShape::analysis_draft(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AdapterOutput, BlockingLanguageModel, LanguageModel};
    use crate::domain::analysis::AnalysisDraft;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    // Mock implementations for testing

    /// Returns a fixed JSON value and counts calls
    struct MockLanguageModel {
        output: Value,
        calls: Arc<AtomicUsize>,
    }

    impl MockLanguageModel {
        fn returning(output: Value) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    output,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl LanguageModel for MockLanguageModel {
        async fn structured_output(
            &self,
            _request: &StructuredRequest,
        ) -> Result<AdapterOutput, LanguageModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AdapterOutput::Json(self.output.clone()))
        }
    }

    /// Echoes the transcript back as the summary; later inputs finish first
    struct SlowEchoModel;

    #[async_trait]
    impl LanguageModel for SlowEchoModel {
        async fn structured_output(
            &self,
            request: &StructuredRequest,
        ) -> Result<AdapterOutput, LanguageModelError> {
            let transcript = request.user_prompt.clone();
            let delay = match transcript.as_str() {
                "first" => 60,
                "second" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(AdapterOutput::Structured(AnalysisDraft::new(transcript, vec![])))
        }
    }

    struct FailingModel(LanguageModelError);

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn structured_output(
            &self,
            _request: &StructuredRequest,
        ) -> Result<AdapterOutput, LanguageModelError> {
            Err(self.0.clone())
        }
    }

    /// Fails only for the transcript "bad"
    struct PickyModel;

    #[async_trait]
    impl LanguageModel for PickyModel {
        async fn structured_output(
            &self,
            request: &StructuredRequest,
        ) -> Result<AdapterOutput, LanguageModelError> {
            if request.user_prompt == "bad" {
                return Err(LanguageModelError::RequestFailed("boom".to_string()));
            }
            Ok(AdapterOutput::Structured(AnalysisDraft::new("ok", vec![])))
        }
    }

    struct BlockingEchoModel;

    impl BlockingLanguageModel for BlockingEchoModel {
        fn structured_output_blocking(
            &self,
            request: &StructuredRequest,
        ) -> Result<AdapterOutput, LanguageModelError> {
            std::thread::sleep(Duration::from_millis(5));
            Ok(AdapterOutput::Json(json!({
                "summary": request.user_prompt,
                "next_actions": ["one", "two"]
            })))
        }
    }

    /// Prompts that pass the transcript through unchanged
    fn bare_prompts() -> PromptTemplates {
        PromptTemplates::new("system", "{transcript}").unwrap()
    }

    fn analyzer(model: impl LanguageModel + 'static) -> TranscriptAnalyzer {
        TranscriptAnalyzer::new(AdapterBinding::non_blocking(model), bare_prompts())
    }

    #[tokio::test]
    async fn analyze_refund_scenario() {
        let (model, calls) = MockLanguageModel::returning(json!({
            "summary": "Refund request",
            "next_actions": ["Process refund", "Notify customer"]
        }));
        let analyzer = analyzer(model);

        let analysis = analyzer.analyze("Customer asked for a refund.").await.unwrap();
        assert_eq!(analysis.summary(), "Refund request");
        assert_eq!(analysis.next_actions(), &["Process refund", "Notify customer"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_input_never_reaches_adapter() {
        let (model, calls) = MockLanguageModel::returning(json!({"summary": "S"}));
        let analyzer = analyzer(model);

        for input in ["", "   ", "\n\t"] {
            let err = analyzer.analyze(input).await.unwrap_err();
            assert!(matches!(err, AnalyzeError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Transcript cannot be empty");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_calls_get_fresh_ids() {
        let (model, _) = MockLanguageModel::returning(json!({"summary": "S"}));
        let analyzer = analyzer(model);

        let mut ids = HashSet::new();
        for _ in 0..20 {
            ids.insert(analyzer.analyze("hello").await.unwrap().id());
        }
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn unrecognized_output_is_contract_violation() {
        let (model, _) = MockLanguageModel::returning(json!(42));
        let err = analyzer(model).analyze("hello").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::AdapterContractViolation(_)));
    }

    #[tokio::test]
    async fn adapter_errors_are_classified() {
        let err = analyzer(FailingModel(LanguageModelError::InvalidApiKey))
            .analyze("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::AdapterUnavailable(_)));

        let err = analyzer(FailingModel(LanguageModelError::ParseError("x".into())))
            .analyze("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::AdapterContractViolation(_)));
    }

    #[tokio::test]
    async fn prompts_are_rendered_into_request() {
        struct CapturingModel(Arc<std::sync::Mutex<Option<StructuredRequest>>>);

        #[async_trait]
        impl LanguageModel for CapturingModel {
            async fn structured_output(
                &self,
                request: &StructuredRequest,
            ) -> Result<AdapterOutput, LanguageModelError> {
                *self.0.lock().unwrap() = Some(request.clone());
                Ok(AdapterOutput::Structured(AnalysisDraft::default()))
            }
        }

        let captured = Arc::new(std::sync::Mutex::new(None));
        let analyzer = TranscriptAnalyzer::new(
            AdapterBinding::non_blocking(CapturingModel(Arc::clone(&captured))),
            PromptTemplates::new("Be brief.", "Transcript: {transcript}").unwrap(),
        );
        analyzer.analyze("hi there").await.unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(request.system_prompt, "Be brief.");
        assert_eq!(request.user_prompt, "Transcript: hi there");
        assert_eq!(request.shape, ResultShape::analysis_draft());
    }

    #[tokio::test]
    async fn analyze_many_keeps_input_order() {
        let analyzer = analyzer(SlowEchoModel);

        let results = analyzer
            .analyze_many(&["first", "second", "third"])
            .await
            .unwrap();

        let summaries: Vec<&str> = results.iter().map(|a| a.summary()).collect();
        assert_eq!(summaries, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn analyze_many_hello_world() {
        let (model, calls) = MockLanguageModel::returning(json!({"summary": "S"}));
        let results = analyzer(model)
            .analyze_many(&["hello".to_string(), "world".to_string()])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_ne!(results[0].id(), results[1].id());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn analyze_many_fails_fast() {
        let err = analyzer(PickyModel)
            .analyze_many(&["good", "bad", "good"])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::AdapterUnavailable(_)));
    }

    #[tokio::test]
    async fn analyze_many_fails_on_blank_item() {
        let (model, _) = MockLanguageModel::returning(json!({"summary": "S"}));
        let err = analyzer(model)
            .analyze_many(&["hello", " "])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn analyze_many_empty_batch() {
        let (model, calls) = MockLanguageModel::returning(json!({"summary": "S"}));
        let results = analyzer(model).analyze_many::<&str>(&[]).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blocking_binding_analyzes() {
        let analyzer =
            TranscriptAnalyzer::new(AdapterBinding::blocking(BlockingEchoModel, 2), bare_prompts());

        let results = analyzer.analyze_many(&["a", "b", "c", "d"]).await.unwrap();
        let summaries: Vec<&str> = results.iter().map(|a| a.summary()).collect();
        assert_eq!(summaries, vec!["a", "b", "c", "d"]);
        assert_eq!(results[0].next_actions(), &["one", "two"]);
    }
}
