//! Core dispatch-layer functionality.
//!
//! Data flow: caller → [`classifier`] (selects backend) → [`resolver`]
//! (rewrites model id) → [`environment`] (prepares auth) → [`dispatcher`]
//! (executes over [`transport`], normalizes) → caller.

pub mod catalog;
pub mod classifier;
pub mod dispatcher;
pub mod environment;
pub mod resolver;
pub mod transport;
pub mod types;
