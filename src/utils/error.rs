//! Error handling for the dispatch layer.
//!
//! Two disjoint taxonomies: [`RelayError`] for failures that reach the
//! caller (classification and configuration), and [`TransportError`] for
//! wire-level faults, which the dispatcher converts into a normalized error
//! response and never propagates.

use thiserror::Error;

/// Result type alias for the dispatch layer
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors surfaced to callers of the dispatch layer.
///
/// `NoBackendConfigured` is the only failure a `dispatch` call itself can
/// return; the other variants arise while loading or validating
/// configuration, before any dispatch is attempted.
#[derive(Error, Debug)]
pub enum RelayError {
    /// No catalog entry matches the configured credentials, the explicit
    /// backend hint, or the requested model name.
    #[error("no backend configured for this request")]
    NoBackendConfigured,

    /// A backend name in the configuration does not exist in the catalog.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Configuration load or validation errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Faults raised by the wire transport.
///
/// Callers never see these: the dispatcher catches every variant and folds
/// it into a [`NormalizedResponse`](crate::core::types::responses::NormalizedResponse)
/// with `finish_reason = error`.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the backend
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Response body did not decode into the expected shape
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}
