//! # Data Retrieval Module
//!
//! The single place where the library talks HTTP. The per-resource APIs in
//! `menu` only build paths and interpret payloads; request building,
//! correlation ids, retries, logging and error normalisation live here.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: the `ApiClient` built on `reqwest` and
//!   `reqwest-middleware`, with transient retries and typed failures.
//! - **`envelope`**: decoding of the `{ success, data, message }` envelope
//!   and of error bodies, including the 422 validation shape.
//! - **`errors`**: `ApiError`, `ValidationApiError` and `MenuError`.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

/// Response envelope and error body decoding.
pub mod envelope;
/// Typed error model shared by the whole library.
pub mod errors;
/// Generic HTTP API client with retry middleware and request ids.
pub mod ky_http;
