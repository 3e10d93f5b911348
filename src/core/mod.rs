//! In-memory pick store and index helpers.

/// Helper index aliases.
pub mod indices;
/// Authoritative pick store.
pub mod store;
