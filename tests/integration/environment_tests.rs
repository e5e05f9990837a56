//! Environment configurator precedence tests
//!
//! Each test owns a distinct catalog variable so the suite stays safe under
//! the default parallel test runner.

use llmrelay_rs::core::environment;
use llmrelay_rs::{BackendCredentials, lookup_by_name};

fn credentials(api_key: &str) -> BackendCredentials {
    BackendCredentials {
        api_key: Some(api_key.to_string()),
        ..BackendCredentials::default()
    }
}

fn set(key: &str, value: &str) {
    // SAFETY: test-only process environment mutation.
    unsafe { std::env::set_var(key, value) };
}

fn remove(key: &str) {
    // SAFETY: test-only process environment mutation.
    unsafe { std::env::remove_var(key) };
}

/// A standard backend never overwrites a variable the surrounding process
/// already exported.
#[test]
fn test_standard_backend_preserves_existing_value() {
    let anthropic = lookup_by_name("anthropic").unwrap();
    set(anthropic.credential_env_key, "user-exported-key");

    environment::configure(anthropic, &credentials("configured-key"));

    assert_eq!(
        std::env::var(anthropic.credential_env_key).unwrap(),
        "user-exported-key"
    );
    remove(anthropic.credential_env_key);
}

/// A standard backend fills the variable when nothing exported it.
#[test]
fn test_standard_backend_sets_when_unset() {
    let dashscope = lookup_by_name("dashscope").unwrap();
    remove(dashscope.credential_env_key);

    environment::configure(dashscope, &credentials("configured-key"));

    assert_eq!(
        std::env::var(dashscope.credential_env_key).unwrap(),
        "configured-key"
    );
    remove(dashscope.credential_env_key);
}

/// A gateway overwrites unconditionally: its credentials are explicit user
/// intent and may differ from a standard-vendor key occupying the name.
#[test]
fn test_gateway_overwrites_existing_value() {
    let openrouter = lookup_by_name("openrouter").unwrap();
    set(openrouter.credential_env_key, "stale-key");

    let creds = BackendCredentials {
        api_key: Some("sk-or-v1-fresh".to_string()),
        base_url: Some("https://gw.example/v1".to_string()),
        ..BackendCredentials::default()
    };
    environment::configure(openrouter, &creds);

    assert_eq!(
        std::env::var(openrouter.credential_env_key).unwrap(),
        "sk-or-v1-fresh"
    );
    assert_eq!(
        std::env::var(openrouter.base_url_env_key.unwrap()).unwrap(),
        "https://gw.example/v1"
    );
    remove(openrouter.credential_env_key);
    remove(openrouter.base_url_env_key.unwrap());
}

/// Local deployments get the same overwrite precedence as gateways.
#[test]
fn test_local_overwrites_existing_value() {
    let vllm = lookup_by_name("vllm").unwrap();
    set(vllm.credential_env_key, "stale-token");

    environment::configure(vllm, &credentials("fresh-token"));

    assert_eq!(std::env::var(vllm.credential_env_key).unwrap(), "fresh-token");
    remove(vllm.credential_env_key);
}

/// Absent credentials mutate nothing.
#[test]
fn test_missing_credentials_leave_environment_alone() {
    let lmstudio = lookup_by_name("lmstudio").unwrap();
    remove(lmstudio.credential_env_key);

    environment::configure(lmstudio, &BackendCredentials::default());

    assert!(std::env::var(lmstudio.credential_env_key).is_err());
}
