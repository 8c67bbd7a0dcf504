//! CaseTrail - audit-training curriculum tracker
//!
//! Thin operational shell around the [`progression`] engine: load trainee
//! and catalog snapshots exported from the training platform, evaluate
//! them, and render the result for a terminal or as JSON.
//!
//! ```text
//! cases.json ──┐
//!              ├─ snapshot ─ progression::Engine ─ report ─ stdout
//! recipes.json ┘
//! ```
//!
//! The engine itself performs no I/O; everything file- and
//! terminal-shaped lives in this crate.

pub mod cli;
pub mod config;
pub mod report;
pub mod snapshot;

pub use config::Config;
pub use snapshot::SnapshotError;
