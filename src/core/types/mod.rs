//! Unified type system for dispatch requests and normalized responses.

pub mod requests;
pub mod responses;

pub use requests::{CallParams, ChatMessage, DispatchRequest, MessageRole, ToolDef};
pub use responses::{FinishReason, NormalizedResponse, ToolCall, Usage};
