//! Response types
//!
//! Every dispatch outcome — success or transport failure — is folded into
//! [`NormalizedResponse`]. There is no code path that surfaces a raised
//! transport fault instead of a response with `finish_reason = error`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why the backend stopped generating.
///
/// `Error` marks a transport failure normalized at the dispatcher boundary;
/// callers that need to distinguish a genuine model answer from a fault
/// inspect this field rather than the content text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Length limit reached
    Length,
    /// The model requested one or more tool invocations
    ToolCalls,
    /// Transport failure converted into a response
    Error,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Decoded arguments object. When a backend returns arguments that are
    /// not valid JSON, the raw text is preserved as a JSON string.
    pub arguments: serde_json::Value,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The single response shape all dispatch outcomes are converted into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Assistant text, possibly empty. On transport failure this carries a
    /// human-readable `"Error: …"` description.
    pub content: String,

    /// Tool invocations, in the order the model emitted them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    pub finish_reason: FinishReason,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Auxiliary reasoning text some backends return alongside the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,

    /// Resolved model identifier the call was executed with.
    pub model: String,

    /// Creation time of this response object.
    pub created: DateTime<Utc>,
}

impl NormalizedResponse {
    /// Fold a fault into the normalized shape.
    pub fn from_error(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            content: format!("Error: {message}"),
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Error,
            usage: None,
            reasoning_content: None,
            model: model.into(),
            created: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.finish_reason == FinishReason::Error
    }
}
