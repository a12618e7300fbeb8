//! OpenAI-compatible chat completions adapter (structured output)

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{
    AdapterOutput, BlockingLanguageModel, LanguageModel, LanguageModelError, StructuredRequest,
};
use crate::domain::analysis::AnalysisDraft;
use crate::domain::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};

// Request types for the chat completions API

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

// Response types for the chat completions API

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Both fields present with the right types
#[derive(Debug, Deserialize)]
struct StrictDraft {
    summary: String,
    next_actions: Vec<String>,
}

/// Connection settings shared by both client flavours
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiSettings {
    /// Settings with the default model, endpoint and timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), LanguageModelError> {
        if self.api_key.trim().is_empty() {
            return Err(LanguageModelError::MissingApiKey);
        }
        Ok(())
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build the request body
    fn build_request(&self, request: &StructuredRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: request.system_prompt.clone(),
                },
                Message {
                    role: "user",
                    content: request.user_prompt.clone(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.shape.name.clone(),
                    schema: request.shape.schema.clone(),
                    strict: true,
                },
            },
        }
    }
}

/// Map an HTTP status and body to adapter output
fn interpret_response(status: StatusCode, body: &str) -> Result<AdapterOutput, LanguageModelError> {
    // Handle HTTP errors
    if status == StatusCode::UNAUTHORIZED {
        return Err(LanguageModelError::InvalidApiKey);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LanguageModelError::RateLimited);
    }

    if !status.is_success() {
        return Err(LanguageModelError::ApiError(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LanguageModelError::ParseError(e.to_string()))?;

    // Check for API error in response body
    if let Some(error) = response.error {
        return Err(LanguageModelError::ApiError(error.message));
    }

    let message = response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .ok_or(LanguageModelError::EmptyResponse)?;

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(LanguageModelError::ApiError(format!("Model refused: {}", refusal)));
    }

    let content = message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(LanguageModelError::EmptyResponse)?;

    Ok(decode_content(content))
}

/// Typed draft when the content matches the schema exactly, raw JSON otherwise
fn decode_content(content: String) -> AdapterOutput {
    match serde_json::from_str::<Value>(&content) {
        Ok(value) => match serde_json::from_value::<StrictDraft>(value.clone()) {
            Ok(strict) => AdapterOutput::Structured(AnalysisDraft::new(
                strict.summary,
                strict.next_actions,
            )),
            Err(_) => AdapterOutput::Json(value),
        },
        Err(_) => AdapterOutput::Json(Value::String(content)),
    }
}

fn request_error(err: reqwest::Error) -> LanguageModelError {
    if err.is_timeout() {
        LanguageModelError::Timeout
    } else {
        LanguageModelError::RequestFailed(err.to_string())
    }
}

/// Non-blocking OpenAI adapter
pub struct OpenAiLanguageModel {
    settings: OpenAiSettings,
    client: reqwest::Client,
}

impl OpenAiLanguageModel {
    /// Create a new adapter; fails when the API key is blank
    pub fn new(settings: OpenAiSettings) -> Result<Self, LanguageModelError> {
        settings.validate()?;
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LanguageModelError::RequestFailed(e.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl LanguageModel for OpenAiLanguageModel {
    async fn structured_output(
        &self,
        request: &StructuredRequest,
    ) -> Result<AdapterOutput, LanguageModelError> {
        let body = self.settings.build_request(request);
        debug!(model = %self.settings.model, "sending chat completion request");

        let response = self
            .client
            .post(self.settings.api_url())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        interpret_response(status, &text)
    }
}

/// Blocking OpenAI adapter for the worker-pool binding.
///
/// The underlying client is created lazily on the first call, which always
/// happens on a worker thread: a blocking client cannot be built from inside
/// the async runtime.
pub struct OpenAiBlockingLanguageModel {
    settings: OpenAiSettings,
    client: Mutex<Option<reqwest::blocking::Client>>,
}

impl OpenAiBlockingLanguageModel {
    /// Create a new adapter; fails when the API key is blank
    pub fn new(settings: OpenAiSettings) -> Result<Self, LanguageModelError> {
        settings.validate()?;
        Ok(Self {
            settings,
            client: Mutex::new(None),
        })
    }

    fn client(&self) -> Result<reqwest::blocking::Client, LanguageModelError> {
        let mut slot = self.client.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.settings.timeout)
            .build()
            .map_err(|e| LanguageModelError::RequestFailed(e.to_string()))?;
        *slot = Some(client.clone());
        Ok(client)
    }
}

impl BlockingLanguageModel for OpenAiBlockingLanguageModel {
    fn structured_output_blocking(
        &self,
        request: &StructuredRequest,
    ) -> Result<AdapterOutput, LanguageModelError> {
        let body = self.settings.build_request(request);
        debug!(model = %self.settings.model, "sending blocking chat completion request");

        let response = self
            .client()?
            .post(self.settings.api_url())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        let text = response.text().map_err(request_error)?;

        interpret_response(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ResultShape;
    use serde_json::json;

    fn request() -> StructuredRequest {
        StructuredRequest {
            system_prompt: "sys".to_string(),
            user_prompt: "user".to_string(),
            shape: ResultShape::analysis_draft(),
        }
    }

    fn completion(content: &str) -> String {
        json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn build_request_has_correct_structure() {
        let settings = OpenAiSettings::new("test-key");
        let body = serde_json::to_value(settings.build_request(&request())).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "transcript_analysis");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn api_url_trims_trailing_slash() {
        let settings = OpenAiSettings::new("k").with_base_url("http://localhost:9999/v1/");
        assert_eq!(settings.api_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn custom_model() {
        let settings = OpenAiSettings::new("k").with_model("custom-model");
        let body = serde_json::to_value(settings.build_request(&request())).unwrap();
        assert_eq!(body["model"], "custom-model");
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(matches!(
            OpenAiLanguageModel::new(OpenAiSettings::new("  ")),
            Err(LanguageModelError::MissingApiKey)
        ));
        assert!(matches!(
            OpenAiBlockingLanguageModel::new(OpenAiSettings::new("")),
            Err(LanguageModelError::MissingApiKey)
        ));
    }

    #[test]
    fn exact_schema_content_is_structured() {
        let body = completion(r#"{"summary":"S","next_actions":["a","b"]}"#);
        let output = interpret_response(StatusCode::OK, &body).unwrap();
        assert_eq!(
            output,
            AdapterOutput::Structured(AnalysisDraft::new(
                "S",
                vec!["a".to_string(), "b".to_string()]
            ))
        );
    }

    #[test]
    fn partial_content_is_raw_json() {
        let body = completion(r#"{"summary":"S"}"#);
        let output = interpret_response(StatusCode::OK, &body).unwrap();
        assert_eq!(output, AdapterOutput::Json(json!({"summary": "S"})));
    }

    #[test]
    fn non_json_content_is_raw_string() {
        let body = completion("not json");
        let output = interpret_response(StatusCode::OK, &body).unwrap();
        assert_eq!(output, AdapterOutput::Json(json!("not json")));
    }

    #[test]
    fn status_errors() {
        assert!(matches!(
            interpret_response(StatusCode::UNAUTHORIZED, ""),
            Err(LanguageModelError::InvalidApiKey)
        ));
        assert!(matches!(
            interpret_response(StatusCode::TOO_MANY_REQUESTS, ""),
            Err(LanguageModelError::RateLimited)
        ));
        assert!(matches!(
            interpret_response(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            Err(LanguageModelError::ApiError(msg)) if msg.contains("500") && msg.contains("oops")
        ));
    }

    #[test]
    fn empty_and_malformed_bodies() {
        assert!(matches!(
            interpret_response(StatusCode::OK, "<html>"),
            Err(LanguageModelError::ParseError(_))
        ));
        assert!(matches!(
            interpret_response(StatusCode::OK, r#"{"choices":[]}"#),
            Err(LanguageModelError::EmptyResponse)
        ));
        assert!(matches!(
            interpret_response(StatusCode::OK, &completion("  ")),
            Err(LanguageModelError::EmptyResponse)
        ));
    }

    #[test]
    fn error_envelope_and_refusal() {
        let body = json!({"error": {"message": "model overloaded"}}).to_string();
        assert!(matches!(
            interpret_response(StatusCode::OK, &body),
            Err(LanguageModelError::ApiError(msg)) if msg == "model overloaded"
        ));

        let body = json!({
            "choices": [{ "message": { "content": null, "refusal": "I can't help with that" } }]
        })
        .to_string();
        assert!(matches!(
            interpret_response(StatusCode::OK, &body),
            Err(LanguageModelError::ApiError(msg)) if msg.contains("refused")
        ));
    }
}
