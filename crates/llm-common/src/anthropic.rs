use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::generator::TextGenerator;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_USER_AGENT: &str = concat!("llm-common/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct AnthropicClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_timeout: Duration,
    pub max_error_body_bytes: usize,
    pub user_agent: String,
}

impl AnthropicClientConfig {
    /// Reads `ANTHROPIC_API_KEY` (required), `ANTHROPIC_BASE_URL` and
    /// `ANTHROPIC_TIMEOUT_SECS`. Blank values count as unset; an unparseable
    /// timeout is an error.
    pub fn from_env() -> Result<Self, LlmClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmClientError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("ANTHROPIC_API_KEY").ok_or(LlmClientError::MissingApiKey)?;

        let base_url = var("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let default_timeout = match var("ANTHROPIC_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| {
                    LlmClientError::InvalidConfig(format!(
                        "ANTHROPIC_TIMEOUT_SECS={raw:?} is invalid: {e}"
                    ))
                })?,
            None => Duration::from_secs(60),
        };

        Ok(Self::new(api_key).with_base_url(base_url).with_timeout(default_timeout))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            default_timeout: Duration::from_secs(60),
            max_error_body_bytes: 8 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// The key never reaches logs.
impl fmt::Debug for AnthropicClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("default_timeout", &self.default_timeout)
            .field("max_error_body_bytes", &self.max_error_body_bytes)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("ANTHROPIC_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} kind={kind} message={message}")]
    Upstream {
        status: StatusCode,
        kind: String,
        message: String,
    },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

/// Thin client for the Anthropic Messages API. One request per call, no retries.
#[derive(Clone)]
pub struct AnthropicClient {
    config: AnthropicClientConfig,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(config: AnthropicClientConfig) -> Result<Self, LlmClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AnthropicClientConfig {
        &self.config
    }

    pub async fn messages(
        &self,
        request: MessagesRequest,
    ) -> Result<MessagesResponse, LlmClientError> {
        let url = format!("{}/v1/messages", self.config.base_url);
        debug!(model = %request.model, max_tokens = request.max_tokens, "sending messages request");
        let resp = self
            .http
            .post(&url)
            .timeout(self.config.default_timeout)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;
        Self::parse_json_response(resp, self.config.max_error_body_bytes).await
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, LlmClientError> {
        if resp.status().is_success() {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }
        Err(Self::to_upstream_error(resp, max_error_body_bytes).await)
    }

    async fn to_upstream_error(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> LlmClientError {
        let status = resp.status();
        let body = read_limited_text(resp, max_error_body_bytes).await;
        upstream_error(status, body)
    }
}

impl TextGenerator for AnthropicClient {
    fn create_message(
        &self,
        request: MessagesRequest,
    ) -> BoxFuture<'_, Result<MessagesResponse, LlmClientError>> {
        Box::pin(self.messages(request))
    }
}

fn upstream_error(status: StatusCode, body: String) -> LlmClientError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(parsed) => LlmClientError::Upstream {
            status,
            kind: parsed.error.r#type.unwrap_or_else(|| "unknown".to_string()),
            message: parsed
                .error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string()),
        },
        Err(_) => LlmClientError::UpstreamBody { status, body },
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    r#type: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    pub role: Option<String>,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<MessagesUsage>,
}

impl MessagesResponse {
    /// Text of the first content segment, if that segment carries text.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesUsage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}
