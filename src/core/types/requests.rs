//! Request types
//!
//! Input contract of the dispatch layer: a model name, an ordered message
//! history, optional tool schemas, and caller-supplied call parameters.

use serde::{Deserialize, Serialize};

/// Message role (OpenAI wire convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry in the conversation history handed to a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,

    /// Participant name, when the caller distinguishes several users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// For `Tool` role messages: the call this message answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
        }
    }
}

/// A tool definition exposed to the model.
///
/// `parameters` is a JSON Schema object; the transport wraps it into the
/// backend's function-calling envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Caller-supplied call parameters.
///
/// Merged before dispatch: these values form the base, and any matching
/// catalog [`ModelOverride`](crate::core::catalog::ModelOverride) is applied
/// last, so overrides always win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// One dispatch attempt.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    /// Caller-supplied model identifier, before resolution.
    pub model: String,
    /// Conversation history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Tool schemas advertised to the model.
    pub tools: Vec<ToolDef>,
    /// Base call parameters; catalog overrides are applied on top.
    pub params: CallParams,
    /// Explicit backend name; overrides classification by inference.
    pub backend: Option<String>,
}

impl DispatchRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDef>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_params(mut self, params: CallParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }
}
