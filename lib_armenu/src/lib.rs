//! # lib_armenu
//!
//! Client-side library for the AR menu application. The remote backend only
//! exposes a flat "list all items" endpoint, so filtering, search, pagination
//! and category derivation happen here, in memory, after every fetch.
//!
//! Modules are feature gated by folder, the same way the rest of the
//! workspace consumes them:
//!
//! - **`configs`**: layered `ClientConfig` (defaults, JSON file, environment).
//! - **`loggers`**: `tracing` subscriber setup with optional file output.
//! - **`retrieve`**: the HTTP `ApiClient` and the typed error model.
//! - **`menu`**: per-resource APIs (items, AR, QR, nutrition, admin, health).
//! - **`hooks`**: stateful loaders publishing `FetchState` over `watch` channels.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "configs")]
pub mod configs;
#[cfg(feature = "hooks")]
pub mod hooks;
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "menu")]
pub mod menu;
#[cfg(feature = "retrieve")]
pub mod retrieve;

#[cfg(feature = "configs")]
pub use configs::client_config::{ClientConfig, ItemRetryConfig};
#[cfg(feature = "retrieve")]
pub use retrieve::errors::{ApiError, ErrorCode, FieldError, MenuError, MenuResult, ValidationApiError};
#[cfg(feature = "retrieve")]
pub use retrieve::ky_http::ApiClient;
