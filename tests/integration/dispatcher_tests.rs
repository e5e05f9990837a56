//! Dispatch integration tests
//!
//! Full dispatch flow against a mock HTTP backend, plus the never-raise
//! contract against a transport stub that fails every call.

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{completion_body, init, single_backend_config, tool_call_body};
use llmrelay_rs::core::transport::{ChatTransport, WireCall, WireResponse};
use llmrelay_rs::{
    CallParams, Config, DispatchRequest, Dispatcher, FinishReason, RelayError, TransportError,
    user_message,
};

/// Transport stub that fails on every call.
struct FailingTransport;

#[async_trait]
impl ChatTransport for FailingTransport {
    async fn send(&self, _call: &WireCall) -> Result<WireResponse, TransportError> {
        Err(TransportError::Api {
            status: 500,
            message: "backend exploded".to_string(),
        })
    }
}

/// A transport that throws on every call still yields a normalized
/// response with `finish_reason = error` — dispatch never raises.
#[tokio::test]
async fn test_dispatch_never_raises() {
    init();
    let dispatcher = Dispatcher::with_transport(Box::new(FailingTransport));
    let config = single_backend_config("anthropic", "sk-ant-x", None);

    let request = DispatchRequest::new("claude-3-5-sonnet", vec![user_message("hi")]);
    let response = dispatcher.dispatch(request, &config).await.unwrap();

    assert_eq!(response.finish_reason, FinishReason::Error);
    assert_eq!(response.content, "Error: API error [500]: backend exploded");
    assert!(response.tool_calls.is_empty());
}

/// Classification with no backend is the one hard failure.
#[tokio::test]
async fn test_dispatch_without_backends_fails_hard() {
    let dispatcher = Dispatcher::with_transport(Box::new(FailingTransport));
    let request = DispatchRequest::new("claude-3-5-sonnet", vec![user_message("hi")]);
    let result = dispatcher.dispatch(request, &Config::default()).await;
    assert!(matches!(result, Err(RelayError::NoBackendConfigured)));
}

/// A claude model with only an Anthropic key lands on the anthropic
/// backend: resolved model id on the wire, bearer credentials passed
/// explicitly.
#[tokio::test]
async fn test_successful_dispatch_through_vendor() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-ant-integration"))
        .and(body_partial_json(
            json!({"model": "anthropic/claude-3-5-sonnet"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "anthropic/claude-3-5-sonnet",
            "Paris.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = single_backend_config("anthropic", "sk-ant-integration", Some(&server.uri()));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new(
        "claude-3-5-sonnet",
        vec![user_message("What is the capital of France?")],
    );

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.content, "Paris.");
    assert_eq!(response.model, "anthropic/claude-3-5-sonnet");
    assert_eq!(response.usage.unwrap().total_tokens, 16);
}

/// A catalog override outranks the caller's temperature for matching
/// models; the forced value is what reaches the wire.
#[tokio::test]
async fn test_model_override_forces_temperature() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "moonshot/kimi-k2.5-preview",
            "temperature": 1.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "moonshot/kimi-k2.5-preview",
            "ok",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = single_backend_config("moonshot", "sk-moonshot-x", Some(&server.uri()));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("kimi-k2.5-preview", vec![user_message("hi")]).with_params(
        CallParams {
            temperature: Some(0.2),
            ..CallParams::default()
        },
    );

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::Stop);
}

/// A vendor-prefixed model dispatched through a stripping gateway reaches
/// the wire with the gateway's own prefix.
#[tokio::test]
async fn test_gateway_rewrites_model_on_wire() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "openai/claude-3-opus"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "openai/claude-3-opus",
            "routed",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = single_backend_config("aihubmix", "hub-key", Some(&server.uri()));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("anthropic/claude-3-opus", vec![user_message("hi")])
        .with_backend("aihubmix");

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.content, "routed");
}

/// Tool calls come back decoded, with the finish reason normalized.
#[tokio::test]
async fn test_tool_calls_normalized() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_body(
            "openai/gpt-4o",
            "call_abc",
            "get_weather",
            "{\"location\": \"Paris\"}",
        )))
        .mount(&server)
        .await;

    let config = single_backend_config("openai", "sk-openai-x", Some(&server.uri()));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("gpt-4o", vec![user_message("weather in paris?")]);

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.id, "call_abc");
    assert_eq!(call.name, "get_weather");
    assert_eq!(call.arguments["location"], "Paris");
}

/// Non-2xx statuses are folded into the normalized error shape with the
/// backend's message preserved.
#[tokio::test]
async fn test_api_error_normalized() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"message": "rate limit exceeded"}})),
        )
        .mount(&server)
        .await;

    let config = single_backend_config("deepseek", "sk-ds-x", Some(&server.uri()));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("deepseek-chat", vec![user_message("hi")]);

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::Error);
    assert_eq!(
        response.content,
        "Error: API error [429]: rate limit exceeded"
    );
}

/// Configured extra headers reach the wire verbatim.
#[tokio::test]
async fn test_extra_headers_forwarded() {
    init();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "anthropic/claude-3-5-sonnet",
            "ok",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = single_backend_config("anthropic", "sk-ant-x", Some(&server.uri()));
    config
        .backends
        .get_mut("anthropic")
        .unwrap()
        .extra_headers
        .insert("anthropic-version".to_string(), "2023-06-01".to_string());

    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("claude-3-5-sonnet", vec![user_message("hi")]);
    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::Stop);
}

/// A dead endpoint (connection refused) is still a normalized error, not a
/// raised fault.
#[tokio::test]
async fn test_connection_failure_normalized() {
    init();
    let config = single_backend_config("mistral", "sk-mistral-x", Some("http://127.0.0.1:9"));
    let dispatcher = Dispatcher::new();
    let request = DispatchRequest::new("mistral-large", vec![user_message("hi")]);

    let response = dispatcher.dispatch(request, &config).await.unwrap();
    assert_eq!(response.finish_reason, FinishReason::Error);
    assert!(response.content.starts_with("Error: "));
}
