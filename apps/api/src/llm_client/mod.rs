/// LLM Client — the single point of entry for all oracle calls in the skill matcher.
///
/// ARCHITECTURAL RULE: No other module may call an LLM provider directly.
/// Pipeline stages depend on the `Oracle` trait; `LlmClient` is the production implementation.
///
/// Two wire formats are supported: OpenAI-compatible chat completions (the default, with a
/// configurable base URL for self-hosted gateways) and the Anthropic Messages API.
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

#[cfg(test)]
pub mod mock;

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4.5-preview";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} attempts")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Which provider wire format `LlmClient` speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            other => Err(anyhow::anyhow!("unknown LLM provider '{other}'")),
        }
    }
}

/// One request to the oracle: a system instruction, a user prompt and an optional temperature.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: Option<f32>,
}

impl<'a> OracleRequest<'a> {
    pub fn new(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system,
            prompt,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// The language-understanding oracle as seen by pipeline stages: prompt in, text out.
///
/// Carried in `AppState` as `Arc<dyn Oracle>`.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, request: OracleRequest<'_>) -> Result<String, LlmError>;
}

/// Calls the oracle and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    oracle: &dyn Oracle,
    request: OracleRequest<'_>,
) -> Result<T, LlmError> {
    let text = oracle.complete(request).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production oracle. Wraps one provider endpoint behind `Oracle`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: Provider,
    api_key: String,
    endpoint: String,
    model: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        let (endpoint, model) = match config.llm_provider {
            Provider::OpenAi => {
                let base = config
                    .llm_base_url
                    .as_deref()
                    .unwrap_or(OPENAI_DEFAULT_BASE_URL)
                    .trim_end_matches('/');
                (
                    format!("{base}/chat/completions"),
                    config
                        .llm_model
                        .clone()
                        .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
                )
            }
            Provider::Anthropic => (
                config
                    .llm_base_url
                    .clone()
                    .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
                config
                    .llm_model
                    .clone()
                    .unwrap_or_else(|| ANTHROPIC_DEFAULT_MODEL.to_string()),
            ),
        };

        Ok(Self {
            client,
            provider: config.llm_provider,
            api_key: config.llm_api_key.clone(),
            endpoint,
            model,
            max_attempts: config.llm_max_attempts.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Makes one exchange with the provider. With `max_attempts > 1`, retries on
    /// 429 (rate limit), 5xx and transport errors with exponential backoff.
    async fn call(&self, request: OracleRequest<'_>) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.send(request).await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return self.read_text(response).await;
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.max_attempts,
        }))
    }

    async fn send(&self, request: OracleRequest<'_>) -> Result<reqwest::Response, reqwest::Error> {
        match self.provider {
            Provider::OpenAi => {
                let body = OpenAiRequest {
                    model: &self.model,
                    messages: vec![
                        ChatMessage {
                            role: "system",
                            content: request.system,
                        },
                        ChatMessage {
                            role: "user",
                            content: request.prompt,
                        },
                    ],
                    temperature: request.temperature,
                };
                self.client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await
            }
            Provider::Anthropic => {
                let body = AnthropicRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    system: request.system,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: request.prompt,
                    }],
                    temperature: request.temperature,
                };
                self.client
                    .post(&self.endpoint)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .await
            }
        }
    }

    async fn read_text(&self, response: reqwest::Response) -> Result<String, LlmError> {
        match self.provider {
            Provider::OpenAi => {
                let parsed: OpenAiResponse = response.json().await?;
                if let Some(usage) = &parsed.usage {
                    debug!(
                        "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .ok_or(LlmError::EmptyContent)
            }
            Provider::Anthropic => {
                let parsed: AnthropicResponse = response.json().await?;
                debug!(
                    "LLM call succeeded: input_tokens={}, output_tokens={}",
                    parsed.usage.input_tokens, parsed.usage.output_tokens
                );
                parsed
                    .text()
                    .map(str::to_string)
                    .ok_or(LlmError::EmptyContent)
            }
        }
    }
}

#[async_trait]
impl Oracle for LlmClient {
    async fn complete(&self, request: OracleRequest<'_>) -> Result<String, LlmError> {
        self.call(request).await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedOracle;
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[\"Python\"]\n```";
        assert_eq!(strip_json_fences(input), "[\"Python\"]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"core\": []}\n```";
        assert_eq!(strip_json_fences(input), "{\"core\": []}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "[\"Git\"]";
        assert_eq!(strip_json_fences(input), "[\"Git\"]");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("gemini".parse::<Provider>().is_err());
    }

    #[test]
    fn test_openai_request_omits_missing_temperature() {
        let body = OpenAiRequest {
            model: "m",
            messages: vec![],
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_anthropic_response_text_picks_text_block() {
        let json = r#"{
            "content": [{"type": "tool_use"}, {"type": "text", "text": "yes"}],
            "usage": {"input_tokens": 3, "output_tokens": 1}
        }"#;
        let parsed: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), Some("yes"));
    }

    #[tokio::test]
    async fn test_call_json_strips_fences_before_parsing() {
        let oracle = ScriptedOracle::new(["```json\n[\"Rust\", \"SQL\"]\n```"]);
        let parsed: Vec<String> = call_json(&oracle, OracleRequest::new("s", "p"))
            .await
            .unwrap();
        assert_eq!(parsed, vec!["Rust", "SQL"]);
    }

    #[tokio::test]
    async fn test_call_json_reports_prose_as_parse_error() {
        let oracle = ScriptedOracle::new(["Sure! Here are the skills: Rust"]);
        let result: Result<Vec<String>, _> = call_json(&oracle, OracleRequest::new("s", "p")).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_call_json_reports_blank_reply_as_empty_content() {
        let oracle = ScriptedOracle::new(["   "]);
        let result: Result<serde_json::Value, _> =
            call_json(&oracle, OracleRequest::new("s", "p")).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
