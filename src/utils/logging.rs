//! Logging initialization.
//!
//! The library itself only emits `tracing` events; embedding processes (or
//! tests) that want console output can call [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber honoring `RUST_LOG`.
///
/// Defaults to `info` when no filter is set in the environment. Safe to call
/// more than once; subsequent calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
