//! Backend classification
//!
//! Picks exactly one backend descriptor for a request. Explicit
//! configuration always overrides inference; gateways and local deployments
//! are tried before keyword matching, because they forward arbitrary model
//! names and a vendor-style model string flowing through them would
//! otherwise misfire on a keyword.

use crate::core::catalog::{self, BackendDescriptor, BackendKind, Detection};
use crate::utils::error::{RelayError, Result};
use tracing::debug;

/// Whether a gateway/local detection rule is satisfied by a credential pair.
pub fn matches_detection(
    backend: &BackendDescriptor,
    api_key: Option<&str>,
    base_url: Option<&str>,
) -> bool {
    match backend.detection() {
        Some(Detection::KeyPrefix(prefix)) => api_key.is_some_and(|key| key.starts_with(prefix)),
        Some(Detection::BaseUrlContains(needle)) => {
            base_url.is_some_and(|url| url.contains(needle))
        }
        None => false,
    }
}

/// Classify against a single credential pair.
///
/// Resolution order, first match wins:
/// 1. an explicit name naming a gateway or local descriptor;
/// 2. gateway detection rules, in catalog order;
/// 3. local-deployment detection rules, in catalog order.
///
/// Keyword-based classification is a separate path ([`classify_by_model`]);
/// when neither applies the caller receives
/// [`RelayError::NoBackendConfigured`].
pub fn classify(
    explicit_name: Option<&str>,
    api_key: Option<&str>,
    base_url: Option<&str>,
) -> Result<&'static BackendDescriptor> {
    if let Some(name) = explicit_name {
        if let Some(backend) = catalog::lookup_by_name(name) {
            if backend.is_gateway() || backend.is_local() {
                debug!(backend = backend.name, "classified by explicit name");
                return Ok(backend);
            }
        }
    }

    for backend in catalog::catalog() {
        if matches!(backend.kind, BackendKind::Gateway { .. })
            && matches_detection(backend, api_key, base_url)
        {
            debug!(backend = backend.name, "classified as gateway");
            return Ok(backend);
        }
    }

    for backend in catalog::catalog() {
        if matches!(backend.kind, BackendKind::Local { .. })
            && matches_detection(backend, api_key, base_url)
        {
            debug!(backend = backend.name, "classified as local deployment");
            return Ok(backend);
        }
    }

    Err(RelayError::NoBackendConfigured)
}

/// Keyword classification over standard descriptors, in catalog order.
///
/// Gateways and local descriptors are never returned from this path.
pub fn classify_by_model(model: &str) -> Option<&'static BackendDescriptor> {
    catalog::catalog().iter().find(|backend| {
        backend.is_standard()
            && backend
                .keywords
                .iter()
                .any(|keyword| model.contains(keyword))
    })
}
