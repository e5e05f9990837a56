//! Dispatch
//!
//! Ties the layer together: classify the backend, resolve the model name,
//! configure authentication state, merge call parameters, execute the
//! transport with explicit credentials, and normalize the outcome.
//!
//! Failure contract: any transport-level fault is converted into a
//! [`NormalizedResponse`] with `finish_reason = error`. The only hard
//! failure a dispatch call returns is a classification miss
//! ([`RelayError::NoBackendConfigured`]) or an unknown explicit backend
//! name — without a backend there is no wire format to normalize into.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::core::catalog::{BackendDescriptor, OverrideValue};
use crate::core::environment;
use crate::core::resolver;
use crate::core::transport::{ChatTransport, HttpTransport, WireCall, WireResponse};
use crate::core::types::requests::{CallParams, DispatchRequest};
use crate::core::types::responses::{FinishReason, NormalizedResponse, ToolCall, Usage};
use crate::utils::error::Result;

/// Executes dispatch requests over a pluggable transport.
pub struct Dispatcher {
    transport: Box<dyn ChatTransport>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            transport: Box::new(HttpTransport::new()),
        }
    }

    /// Swap the wire transport; the seam used by tests and embedders with
    /// their own HTTP stack.
    pub fn with_transport(transport: Box<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Dispatch one request and normalize the outcome.
    pub async fn dispatch(
        &self,
        request: DispatchRequest,
        config: &Config,
    ) -> Result<NormalizedResponse> {
        let request_id = Uuid::new_v4();

        let (backend, credentials) =
            config.select_backend(request.backend.as_deref(), &request.model)?;
        let model = resolver::resolve_model(&request.model, backend);
        debug!(
            %request_id,
            backend = backend.name,
            model = %model,
            "dispatching completion request"
        );

        // Synchronous, before the cancellable transport call: a dispatch
        // cancelled mid-flight never leaves the environment half-mutated.
        environment::configure(backend, &credentials);

        let params = merge_overrides(request.params, &model, backend);
        let call = WireCall {
            base_url: credentials
                .base_url
                .unwrap_or_else(|| backend.default_base_url.to_string()),
            api_key: credentials.api_key,
            extra_headers: credentials.extra_headers,
            model: model.clone(),
            messages: request.messages,
            tools: request.tools,
            params,
        };

        let response = match self.transport.send(&call).await {
            Ok(wire) => normalize(wire, &model),
            Err(err) => {
                warn!(
                    %request_id,
                    backend = backend.name,
                    error = %err,
                    "transport failure normalized into error response"
                );
                NormalizedResponse::from_error(&model, err)
            }
        };

        info!(
            %request_id,
            backend = backend.name,
            finish_reason = ?response.finish_reason,
            "dispatch complete"
        );
        Ok(response)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply catalog overrides whose substring matches the resolved model name.
/// Overrides are applied after caller parameters, so they always win.
fn merge_overrides(
    mut params: CallParams,
    resolved_model: &str,
    backend: &BackendDescriptor,
) -> CallParams {
    for entry in backend.overrides {
        if !resolved_model.contains(entry.model_substring) {
            continue;
        }
        for (key, value) in entry.params {
            apply_override(&mut params, key, *value, backend.name);
        }
    }
    params
}

/// An override naming a parameter this layer does not know is a
/// configuration mistake, not a fault: warn and continue.
fn apply_override(params: &mut CallParams, key: &str, value: OverrideValue, backend: &str) {
    match (key, value) {
        ("temperature", OverrideValue::Float(v)) => params.temperature = Some(v as f32),
        ("top_p", OverrideValue::Float(v)) => params.top_p = Some(v as f32),
        ("frequency_penalty", OverrideValue::Float(v)) => params.frequency_penalty = Some(v as f32),
        ("presence_penalty", OverrideValue::Float(v)) => params.presence_penalty = Some(v as f32),
        ("max_tokens", OverrideValue::Int(v)) => params.max_tokens = Some(v as u32),
        _ => warn!(backend, key, "override references unknown parameter, ignoring"),
    }
}

fn normalize(wire: WireResponse, resolved_model: &str) -> NormalizedResponse {
    let model = wire.model.unwrap_or_else(|| resolved_model.to_string());

    let Some(choice) = wire.choices.into_iter().next() else {
        return NormalizedResponse::from_error(model, "response contained no choices");
    };

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: decode_arguments(call.function.arguments),
        })
        .collect();

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("length") => FinishReason::Length,
        Some("tool_calls") | Some("function_call") => FinishReason::ToolCalls,
        _ if !tool_calls.is_empty() => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    };

    let usage = wire.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: if u.total_tokens != 0 {
            u.total_tokens
        } else {
            u.prompt_tokens + u.completion_tokens
        },
    });

    NormalizedResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        finish_reason,
        usage,
        reasoning_content: choice.message.reasoning_content,
        model,
        created: Utc::now(),
    }
}

/// Backends return tool arguments as a JSON-encoded string; a payload that
/// fails to decode is preserved verbatim as a string value.
fn decode_arguments(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or_else(|_| serde_json::Value::String(raw))
}
