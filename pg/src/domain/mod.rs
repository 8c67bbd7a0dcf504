//! Domain types for the progression engine
//!
//! Input records mirror the upstream Firestore-shaped export: camelCase
//! serde, defaults everywhere, unknown fields ignored. Free-text fields
//! (audit area, tier, case level) stay raw here and are parsed leniently
//! during normalization.

mod case;
mod recipe;
mod tier;

pub use case::{ActiveAttempt, CaseRecord, CaseStatus, ProgressRecord, ProgressState};
pub use recipe::ModuleCatalogEntry;
pub use tier::{Depth, Tier};
