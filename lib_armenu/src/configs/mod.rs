//! # Configuration Modules
//!
//! Client configuration shared by the CLI front-end, the integration tests
//! and anything else that talks to the menu backend.

/// Layered client configuration: defaults, JSON file and environment.
pub mod client_config;
