//! Wire transport
//!
//! Executes one fully-resolved outbound call against an OpenAI-compatible
//! `chat/completions` endpoint. Credentials arrive explicitly on every call;
//! the transport never consults the process environment.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::core::types::requests::{CallParams, ChatMessage, ToolDef};
use crate::utils::error::TransportError;

/// One outbound call: endpoint, explicit credentials, and the merged
/// request body inputs.
#[derive(Debug, Clone)]
pub struct WireCall {
    pub base_url: String,
    pub api_key: Option<String>,
    pub extra_headers: HashMap<String, String>,
    /// Resolved model identifier.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDef>,
    pub params: CallParams,
}

/// Decoded response body, OpenAI chat-completion shape.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<WireChoice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireChoice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFunction {
    pub name: String,
    /// JSON-encoded arguments, as backends return them.
    pub arguments: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The suspension point of a dispatch call.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, call: &WireCall) -> Result<WireResponse, TransportError>;
}

/// Process-shared connection pool; `reqwest::Client` clones share it.
static SHARED_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// HTTP implementation of [`ChatTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport over the process-shared connection pool, with no intrinsic
    /// timeout. Timeout enforcement belongs to the caller's configuration.
    pub fn new() -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Transport with a dedicated client enforcing a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, call: &WireCall) -> Result<WireResponse, TransportError> {
        let url = format!("{}/chat/completions", call.base_url.trim_end_matches('/'));

        let mut request = self.client.post(&url).json(&build_body(call));
        if let Some(api_key) = &call.api_key {
            request = request.bearer_auth(api_key);
        }
        for (name, value) in &call.extra_headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = extract_error_message(&bytes)
                .unwrap_or_else(|| "unknown API error".to_string());
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn build_body(call: &WireCall) -> Value {
    let mut body = serde_json::json!({
        "model": call.model,
        "messages": call.messages,
    });

    if !call.tools.is_empty() {
        let tools: Vec<Value> = call
            .tools
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect();
        body["tools"] = Value::from(tools);
    }

    let params = &call.params;
    if let Some(temperature) = params.temperature {
        body["temperature"] = temperature.into();
    }
    if let Some(top_p) = params.top_p {
        body["top_p"] = top_p.into();
    }
    if let Some(max_tokens) = params.max_tokens {
        body["max_tokens"] = max_tokens.into();
    }
    if let Some(frequency_penalty) = params.frequency_penalty {
        body["frequency_penalty"] = frequency_penalty.into();
    }
    if let Some(presence_penalty) = params.presence_penalty {
        body["presence_penalty"] = presence_penalty.into();
    }
    if let Some(stop) = &params.stop {
        body["stop"] = serde_json::json!(stop);
    }

    body
}

/// Pull a human-readable message out of an error body, accepting both the
/// OpenAI `{"error": {"message": …}}` envelope and a bare `{"message": …}`.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
