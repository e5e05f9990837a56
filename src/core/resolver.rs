//! Model-name resolution
//!
//! Rewrites a caller-supplied model identifier into the wire-format
//! identifier the chosen backend expects. Resolution is idempotent: the
//! already-prefixed check always runs before prefixing, so
//! `resolve_model(resolve_model(m, b), b) == resolve_model(m, b)` for every
//! backend.

use crate::core::catalog::{self, BackendDescriptor, BackendKind};

/// True when `model` starts with `prefix` followed by a `/` separator.
fn starts_with_prefix(model: &str, prefix: &str) -> bool {
    model
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// True when `model` already carries any catalog prefix. Such names must
/// never be double-prefixed.
fn has_known_prefix(model: &str) -> bool {
    catalog::catalog()
        .iter()
        .any(|backend| !backend.model_prefix.is_empty() && starts_with_prefix(model, backend.model_prefix))
}

/// Rewrite `model` into the wire format of `backend`.
pub fn resolve_model(model: &str, backend: &BackendDescriptor) -> String {
    if backend.model_prefix.is_empty() {
        return model.to_string();
    }

    match backend.kind {
        BackendKind::Gateway {
            strip_existing_prefix: true,
            ..
        } => {
            // Drop everything up to and including the first separator, then
            // apply the gateway's own prefix.
            let bare = model.split_once('/').map_or(model, |(_, rest)| rest);
            format!("{}/{}", backend.model_prefix, bare)
        }
        _ => {
            if starts_with_prefix(model, backend.model_prefix) || has_known_prefix(model) {
                model.to_string()
            } else {
                format!("{}/{}", backend.model_prefix, model)
            }
        }
    }
}
