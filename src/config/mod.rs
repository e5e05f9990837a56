//! Configuration surface consumed by the dispatch layer.
//!
//! Credentials live here and nowhere else: a top-level unattributed
//! credential pair for single-provider setups (the classifier infers which
//! backend owns it), plus per-backend entries keyed by catalog name. The
//! dispatch layer reads this configuration per attempt and never caches it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::catalog::{self, BackendDescriptor};
use crate::core::classifier;
use crate::utils::error::{RelayError, Result};

/// Credentials for one backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Headers added verbatim to every wire request for this backend.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra_headers: HashMap<String, String>,
}

impl BackendCredentials {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.base_url.is_none() && self.extra_headers.is_empty()
    }
}

/// Dispatch-layer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend used when a request does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<String>,

    /// Unattributed API key for single-provider setups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Unattributed base URL for single-provider setups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-backend credentials, keyed by catalog name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub backends: HashMap<String, BackendCredentials>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RelayError::Config(format!("failed to read config file: {e}")))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| RelayError::Config(format!("failed to parse config: {e}")))?;

        config.validate()?;
        debug!("configuration loaded");
        Ok(config)
    }

    /// Build configuration from the process environment, scanning every
    /// catalog descriptor's conventional variables. Honors a `.env` file in
    /// the working directory.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut backends = HashMap::new();
        for backend in catalog::catalog() {
            let api_key = non_empty_var(backend.credential_env_key);
            let base_url = backend.base_url_env_key.and_then(non_empty_var);
            if api_key.is_some() || base_url.is_some() {
                backends.insert(
                    backend.name.to_string(),
                    BackendCredentials {
                        api_key,
                        base_url,
                        extra_headers: HashMap::new(),
                    },
                );
            }
        }

        let config = Self {
            default_backend: non_empty_var("LLMRELAY_BACKEND"),
            api_key: None,
            base_url: None,
            backends,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject backend names absent from the catalog and base URLs that do
    /// not parse.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default_backend {
            if catalog::lookup_by_name(name).is_none() {
                return Err(RelayError::UnknownBackend(name.clone()));
            }
        }
        for name in self.backends.keys() {
            if catalog::lookup_by_name(name).is_none() {
                return Err(RelayError::UnknownBackend(name.clone()));
            }
        }
        for base_url in self
            .base_url
            .iter()
            .chain(self.backends.values().filter_map(|c| c.base_url.as_ref()))
        {
            Url::parse(base_url)
                .map_err(|e| RelayError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        }
        Ok(())
    }

    /// Credentials for `backend`, with missing fields filled from the
    /// top-level pair.
    pub fn credentials_for(&self, backend: &BackendDescriptor) -> BackendCredentials {
        let mut credentials = self
            .backends
            .get(backend.name)
            .cloned()
            .unwrap_or_default();
        if credentials.api_key.is_none() {
            credentials.api_key = self.api_key.clone();
        }
        if credentials.base_url.is_none() {
            credentials.base_url = self.base_url.clone();
        }
        credentials
    }

    fn has_credentials(&self, backend: &BackendDescriptor) -> bool {
        self.backends
            .get(backend.name)
            .is_some_and(|c| !c.is_empty())
            || self.api_key.is_some()
            || self.base_url.is_some()
    }

    /// Pick the backend servicing a request, and the credentials to call it
    /// with.
    ///
    /// Resolution order: explicit name (request argument, else the
    /// configured default) — immediate for gateways and locals, honored for
    /// a standard backend when it has credentials; then gateway detection
    /// rules; then local detection rules; then keyword classification on the
    /// model name; then the fallback policy (first backend with its own
    /// credentials entry, catalog order — gateways before locals before
    /// standard vendors).
    pub fn select_backend(
        &self,
        explicit: Option<&str>,
        model: &str,
    ) -> Result<(&'static BackendDescriptor, BackendCredentials)> {
        if let Some(name) = explicit.or(self.default_backend.as_deref()) {
            let backend = catalog::lookup_by_name(name)
                .ok_or_else(|| RelayError::UnknownBackend(name.to_string()))?;
            if backend.is_gateway() || backend.is_local() || self.has_credentials(backend) {
                debug!(backend = backend.name, "selected by explicit name");
                return Ok((backend, self.credentials_for(backend)));
            }
            warn!(
                backend = backend.name,
                "explicitly named backend has no credentials, falling back to inference"
            );
        }

        for backend in catalog::catalog().iter().filter(|b| b.is_gateway()) {
            let credentials = self.credentials_for(backend);
            if classifier::matches_detection(
                backend,
                credentials.api_key.as_deref(),
                credentials.base_url.as_deref(),
            ) {
                debug!(backend = backend.name, "selected by gateway detection");
                return Ok((backend, credentials));
            }
        }

        for backend in catalog::catalog().iter().filter(|b| b.is_local()) {
            let credentials = self.credentials_for(backend);
            if classifier::matches_detection(
                backend,
                credentials.api_key.as_deref(),
                credentials.base_url.as_deref(),
            ) {
                debug!(backend = backend.name, "selected by local detection");
                return Ok((backend, credentials));
            }
        }

        if let Some(backend) = classifier::classify_by_model(model) {
            if self.has_credentials(backend) {
                debug!(backend = backend.name, model, "selected by model keyword");
                return Ok((backend, self.credentials_for(backend)));
            }
        }

        // Fallback policy: first backend with any credentials of its own.
        for backend in catalog::catalog() {
            if self
                .backends
                .get(backend.name)
                .is_some_and(|c| !c.is_empty())
            {
                debug!(backend = backend.name, "selected by fallback policy");
                return Ok((backend, self.credentials_for(backend)));
            }
        }

        Err(RelayError::NoBackendConfigured)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
