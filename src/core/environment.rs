//! Environment configuration
//!
//! The one place the dispatch layer mutates shared process state: credential
//! environment variables for transport libraries that insist on reading
//! them. The dispatcher itself always passes credentials explicitly and
//! never reads these back, so the variables are a compatibility shim, not
//! the source of truth for a request.

use crate::config::BackendCredentials;
use crate::core::catalog::BackendDescriptor;
use parking_lot::Mutex;
use tracing::debug;

/// Serializes all credential-variable writes across concurrent dispatch
/// calls; backends may share a variable name.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Establish the authentication state for a call.
///
/// Gateway and local backends overwrite their variables unconditionally —
/// they are explicit user intent and may differ from a previously-set
/// standard-vendor key occupying the same name. Standard backends set a
/// variable only if unset, preserving anything the surrounding process
/// already exported.
///
/// Synchronous and non-suspending: the mutation completes before the
/// cancellable transport call begins.
pub fn configure(backend: &BackendDescriptor, credentials: &BackendCredentials) {
    let _guard = ENV_LOCK.lock();
    let force = backend.is_gateway() || backend.is_local();

    if let Some(api_key) = &credentials.api_key {
        set_var(backend.credential_env_key, api_key, force);
    }
    if let (Some(env_key), Some(base_url)) = (backend.base_url_env_key, &credentials.base_url) {
        set_var(env_key, base_url, force);
    }
}

/// Values are secrets; log lines carry the variable name only.
fn set_var(key: &str, value: &str, force: bool) {
    if !force && std::env::var_os(key).is_some() {
        debug!(var = key, "environment variable already set, leaving untouched");
        return;
    }
    debug!(var = key, force, "setting credential environment variable");
    // SAFETY: every write to the process environment in this crate goes
    // through ENV_LOCK, held by the caller.
    unsafe { std::env::set_var(key, value) };
}
