//! Interactive stratigraphic pick editing across wells.
//!
//! One [`core::store::PickStore`] holds every pick. UI events go through the
//! [`protocol::editor::PickEditor`], the only mutation path, and the log view,
//! cross-section and pick table are recomputed from a snapshot after each one.
//!
//! # Examples
//!
//! Synchronous editing:
//! ```
//! use std::sync::Arc;
//! use wellcorr::{
//!     core::store::PickStore,
//!     protocol::{editor::PickEditor, event::EditEvent},
//!     types::Uwi,
//!     well::{Curve, Well, WellSet},
//! };
//!
//! let gr = Curve::new("GR", vec![40.0, 80.0], vec![2400.0, 2600.0]).expect("curve");
//! let wells = WellSet::new(vec![
//!     Well::new("A-1", "A-1", vec![gr]).expect("well"),
//!     Well::new("B-2", "B-2", vec![]).expect("well"),
//! ]).expect("wells");
//!
//! let mut editor = PickEditor::new(Arc::new(wells), PickStore::new());
//! editor.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
//! editor.apply(EditEvent::TopSelected { name: Some("Top_X".into()) }).expect("select");
//! editor.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click");
//!
//! let picks = editor.store().for_well(&Uwi::new("A-1"));
//! assert_eq!(picks[0].md, Some(2500.0));
//! ```
//!
//! Runtime usage with the single-writer loop:
//! ```no_run
//! use std::sync::Arc;
//! use wellcorr::{
//!     core::store::PickStore,
//!     protocol::{editor::PickEditor, event::EditEvent},
//!     runtime::handle::{spawn_picker, RuntimeConfig},
//!     well::{Well, WellSet},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let wells = WellSet::new(vec![Well::new("A-1", "A-1", vec![]).expect("well")]).expect("wells");
//! let editor = PickEditor::new(Arc::new(wells), PickStore::new()).with_save_dir("data/updates");
//! let handle = spawn_picker(editor, RuntimeConfig::default());
//! handle.apply(EditEvent::SaveRequested { path: "picks.csv".into() }).await.expect("save");
//! handle.flush().await.expect("flush");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Application configuration.
pub mod config;
/// Core in-memory store and index helpers.
pub mod core;
/// Persistence of the pick table.
pub mod persist;
/// Pick records and row contract.
pub mod pick;
/// Pick-edit protocol.
pub mod protocol;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared identifiers and aliases.
pub mod types;
/// View projections.
pub mod views;
/// Read-only well and curve store.
pub mod well;
