//! Async single-writer loop around the pick editor.

/// Broadcast notifications for view refreshes and save results.
pub mod events;
/// Handle, command loop and save worker.
pub mod handle;
