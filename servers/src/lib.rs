//! Development servers for the AR menu workspace.
//!
//! `menu_mock` serves the menu backend's HTTP contract from memory. The
//! `server_menu_mock` binary runs it standalone; the integration tests mount
//! its router on an ephemeral port.

#![forbid(unsafe_code)]

pub mod menu_mock;
