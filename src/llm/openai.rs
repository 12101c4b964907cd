//! OpenAI Chat Completions client with automatic retry for transient errors.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{sanitize_tasks, RawCandidate, Task, MAX_MINUTES, MIN_MINUTES};

use super::error::{RetryConfig, UpstreamError};
use super::TaskClassifier;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a productivity assistant. Extract actionable tasks \
from user input and return strict JSON only. Respect exact schema and keep \
urgency/importance values to low|medium|high.";

/// OpenAI API client implementing the classifier boundary.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    retry: RetryConfig,
}

impl OpenAiClient {
    /// Create a client with the default retry policy.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            retry: RetryConfig::default(),
        }
    }

    /// Create a client with a custom retry policy.
    pub fn with_retry_config(api_key: String, model: String, retry: RetryConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            retry,
        }
    }

    fn user_prompt(input: &str) -> String {
        format!(
            "Convert the following raw input into structured tasks.\n\n\
             Input: \"{input}\"\n\n\
             Return JSON with this shape:\n\
             {{ \"tasks\": [{{ \"task\": string, \"urgency\": \"low|medium|high\", \
             \"importance\": \"low|medium|high\", \"estimated_time_minutes\": number }}] }}\n\n\
             Rules:\n\
             - Split compound input into separate tasks\n\
             - Keep task names short and action-oriented\n\
             - estimated_time_minutes should be an integer between {MIN_MINUTES} and {MAX_MINUTES}"
        )
    }

    fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Execute a single completion request without retry.
    async fn execute_request(&self, request: &ChatRequest) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Network(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    UpstreamError::Network(format!("connection failed: {e}"))
                } else {
                    UpstreamError::Network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let retry_after = Self::parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(UpstreamError::from_status(status.as_u16(), body, retry_after));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Parse(format!("invalid completion payload: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| UpstreamError::Parse("empty completion content".to_string()))
    }

    /// Execute a request, retrying transient failures with backoff.
    async fn execute_with_retry(&self, request: &ChatRequest) -> Result<String, UpstreamError> {
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            match self.execute_request(request).await {
                Ok(content) => {
                    if attempt > 0 {
                        tracing::info!(
                            "Provider request succeeded after {} retries ({:?})",
                            attempt,
                            start.elapsed()
                        );
                    }
                    return Ok(content);
                }
                Err(error) => {
                    if !self.retry.should_retry(&error, attempt) {
                        return Err(error);
                    }

                    let delay = error.suggested_delay(attempt);
                    let remaining = self.retry.max_retry_duration.saturating_sub(start.elapsed());
                    if delay >= remaining {
                        tracing::warn!("Retry budget exhausted after attempt {}: {}", attempt + 1, error);
                        return Err(error);
                    }

                    tracing::warn!(
                        "Provider attempt {} failed, retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl TaskClassifier for OpenAiClient {
    async fn classify_tasks(&self, input: &str) -> Result<Vec<Task>, UpstreamError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.2,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                RequestMessage {
                    role: "user",
                    content: Self::user_prompt(input),
                },
            ],
        };

        tracing::debug!("Sending classification request: model={}", self.model);

        let content = self.execute_with_retry(&request).await?;
        let candidates = parse_task_payload(&content)?;
        Ok(sanitize_tasks(&candidates))
    }
}

/// Extract the `tasks` array from the model's JSON answer.
///
/// The model is asked for strict JSON but treated leniently: a missing or
/// non-array `tasks` field yields an empty batch, and elements that are
/// not objects coerce to an all-defaults record (which the normalizer
/// then drops for having no task text).
fn parse_task_payload(content: &str) -> Result<Vec<RawCandidate>, UpstreamError> {
    let payload: Value = serde_json::from_str(content)
        .map_err(|e| UpstreamError::Parse(format!("completion is not valid JSON: {e}")))?;

    let candidates = match payload.get("tasks") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };

    Ok(candidates)
}

/// Chat Completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    response_format: ResponseFormat,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

/// Chat Completions response body (only the parts we read).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_with_tasks_array_is_extracted() {
        let content = r#"{ "tasks": [
            { "task": "Email Sam", "urgency": "high", "importance": "low", "estimated_time_minutes": 10 },
            { "task": "Plan sprint" }
        ] }"#;

        let candidates = parse_task_payload(content).unwrap();
        assert_eq!(candidates.len(), 2);

        let tasks = sanitize_tasks(&candidates);
        assert_eq!(tasks[0].task, "Email Sam");
        assert_eq!(tasks[1].estimated_time_minutes, crate::engine::DEFAULT_MINUTES);
    }

    #[test]
    fn missing_or_non_array_tasks_yield_empty_batch() {
        assert!(parse_task_payload("{}").unwrap().is_empty());
        assert!(parse_task_payload(r#"{ "tasks": "none" }"#).unwrap().is_empty());
        assert!(parse_task_payload(r#"{ "tasks": null }"#).unwrap().is_empty());
    }

    #[test]
    fn non_object_elements_are_dropped_by_the_normalizer() {
        let content = r#"{ "tasks": ["just a string", 42, { "task": "Real one" }] }"#;
        let candidates = parse_task_payload(content).unwrap();
        assert_eq!(candidates.len(), 3);

        let tasks = sanitize_tasks(&candidates);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Real one");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_task_payload("not json").unwrap_err();
        assert!(matches!(err, UpstreamError::Parse(_)));
    }

    #[test]
    fn user_prompt_embeds_the_input_and_bounds() {
        let prompt = OpenAiClient::user_prompt("call the bank");
        assert!(prompt.contains("Input: \"call the bank\""));
        assert!(prompt.contains("between 5 and 240"));
    }
}
