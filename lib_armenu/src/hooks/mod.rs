//! # Data-fetching Hooks
//!
//! Stateful loaders that hold `Idle / Loading / Ready / Failed` for one
//! piece of data, publish it on a `tokio::sync::watch` channel, and load
//! again when their dependency value changes. Front-ends subscribe and
//! render; nothing here knows about presentation.

/// Hook state enum.
pub mod fetch_state;
/// Dependency tracking, state publication and stale-result guarding.
pub mod resource;
/// Exponential backoff used by the item detail hook.
pub mod retry;
/// AR session for an item on a platform.
pub mod use_ar_session;
/// Derived categories.
pub mod use_categories;
/// Single item with retry.
pub mod use_item;
/// Filtered / paginated item list.
pub mod use_items;
/// QR code for an item.
pub mod use_qr;

pub use fetch_state::FetchState;
pub use use_ar_session::{ArSession, UseArSession};
pub use use_categories::UseCategories;
pub use use_item::UseItem;
pub use use_items::{ItemsPage, ItemsQuery, UseItems};
pub use use_qr::UseQr;
