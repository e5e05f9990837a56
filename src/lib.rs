//! # llmrelay-rs
//!
//! Model resolution and dispatch for multi-backend LLM assistants: one
//! uniform call against many independent backends, each with its own
//! authentication scheme, base URL, and model-naming convention.
//!
//! The layer does five things per request:
//!
//! - **Classify** — deterministically pick the backend servicing the
//!   request (explicit name, gateway/local detection rules, then model-name
//!   keywords).
//! - **Resolve** — rewrite the model identifier into the backend's wire
//!   format (idempotent prefixing, gateway prefix stripping).
//! - **Configure** — establish credential environment variables without
//!   clobbering state other backends rely on.
//! - **Override** — force backend- and model-specific parameters over
//!   whatever the caller supplied.
//! - **Normalize** — fold every outcome, success or transport failure, into
//!   one [`NormalizedResponse`] shape. A dispatch call never raises a
//!   transport fault; callers check [`FinishReason`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use llmrelay_rs::{complete, user_message};
//!
//! #[tokio::main]
//! async fn main() -> llmrelay_rs::Result<()> {
//!     // Backend inferred from configured credentials and the model name.
//!     let response = complete(
//!         "claude-3-5-sonnet",
//!         vec![user_message("What is the capital of France?")],
//!         None,
//!     )
//!     .await?;
//!
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Explicit dispatcher
//!
//! ```rust,no_run
//! use llmrelay_rs::{Config, DispatchRequest, Dispatcher, user_message};
//!
//! #[tokio::main]
//! async fn main() -> llmrelay_rs::Result<()> {
//!     let config = Config::from_env()?;
//!     let dispatcher = Dispatcher::new();
//!     let request = DispatchRequest::new(
//!         "anthropic/claude-3-opus",
//!         vec![user_message("Hello!")],
//!     )
//!     .with_backend("openrouter");
//!     let response = dispatcher.dispatch(request, &config).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

pub use crate::config::{BackendCredentials, Config};
pub use crate::core::catalog::{
    BackendDescriptor, BackendKind, Detection, ModelOverride, OverrideValue, catalog,
    lookup_by_name,
};
pub use crate::core::classifier::{classify, classify_by_model};
pub use crate::core::dispatcher::Dispatcher;
pub use crate::core::resolver::resolve_model;
pub use crate::core::transport::{ChatTransport, HttpTransport, WireCall, WireResponse};
pub use crate::core::types::requests::{
    CallParams, ChatMessage, DispatchRequest, MessageRole, ToolDef,
};
pub use crate::core::types::responses::{FinishReason, NormalizedResponse, ToolCall, Usage};
pub use crate::utils::error::{RelayError, Result, TransportError};
pub use crate::utils::logging::init_logging;

use tokio::sync::OnceCell;

/// Global dispatcher for the free-function entry points, configured from
/// the environment at first use.
static GLOBAL: OnceCell<(Dispatcher, Config)> = OnceCell::const_new();

async fn global_dispatcher() -> &'static (Dispatcher, Config) {
    GLOBAL
        .get_or_init(|| async {
            let config = Config::from_env().unwrap_or_else(|err| {
                tracing::warn!(
                    error = %err,
                    "failed to load configuration from environment, starting empty"
                );
                Config::default()
            });
            (Dispatcher::new(), config)
        })
        .await
}

/// One-call completion entry point.
///
/// Backend selection, model resolution, and credential handling all come
/// from the environment-derived global configuration. For per-call control
/// construct a [`Dispatcher`] and [`Config`] explicitly.
pub async fn complete(
    model: &str,
    messages: Vec<ChatMessage>,
    params: Option<CallParams>,
) -> Result<NormalizedResponse> {
    let (dispatcher, config) = global_dispatcher().await;
    let request = DispatchRequest {
        model: model.to_string(),
        messages,
        tools: Vec::new(),
        params: params.unwrap_or_default(),
        backend: None,
    };
    dispatcher.dispatch(request, config).await
}

/// Helper to create a user message
pub fn user_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::new(MessageRole::User, content)
}

/// Helper to create a system message
pub fn system_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::new(MessageRole::System, content)
}

/// Helper to create an assistant message
pub fn assistant_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::new(MessageRole::Assistant, content)
}
