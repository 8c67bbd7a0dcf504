//! Progression - curriculum progression engine
//!
//! Given a trainee's full case-attempt history and the catalog of
//! published training modules, compute which tiers are unlocked, which
//! single case to surface next, per-skill completion, and a curriculum-wide
//! journey view. One synchronous pass, no I/O, no state between calls.
//!
//! # Evaluation pipeline
//!
//! ```text
//! cases + recipes
//!   └─ normalize   (path / module / skill keys, alias table)
//!   └─ index       (ModuleIndex, CompletionIndex, TierMembership)
//!   └─ partition   (primary attempts vs. retakes)
//!   └─ select      (draft > assigned > recommended > start > empty)
//!   └─ aggregate   (skill progress, module journey, module options)
//!   └─ ProgressionView
//! ```
//!
//! Input data is heterogeneous legacy export material: the engine never
//! fails on a partially-populated record, it classifies what it can and
//! excludes the rest from the aggregates they cannot join.
//!
//! # Example
//!
//! ```
//! use progression::{ProgressionInput, compute_progression_view};
//!
//! let view = compute_progression_view(&ProgressionInput::default());
//! assert!(view.current_action.is_none());
//! ```

pub mod domain;
pub mod engine;
pub mod index;
pub mod journey;
pub mod normalize;
pub mod partition;
pub mod select;
pub mod view;

pub use domain::{ActiveAttempt, CaseRecord, CaseStatus, Depth, ModuleCatalogEntry, ProgressRecord, ProgressState, Tier};
pub use engine::{Engine, ProgressionInput, compute_progression_view};
pub use index::{CompletionIndex, KeyedCase, KeyedRecipe, ModuleIndex, TierMembership};
pub use journey::MAX_MODULE_OPTIONS;
pub use normalize::{CANONICAL_MODULES, DEFAULT_PATH, Normalizer, RecordKeys, slugify};
pub use select::CurrentAction;
pub use view::{
    ModuleJourneyEntry, ModuleOption, ProgramPath, ProgressionView, SkillProgress, TierState, TierStats, TierStatus,
};
