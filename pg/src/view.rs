//! The computed progression view
//!
//! Everything in here is rebuilt on every evaluation and never persisted.
//! View types serialize for callers that want to ship the result onward
//! (the CLI's `--format json`, a future HTTP layer).

use serde::Serialize;

use crate::domain::{CaseRecord, ModuleCatalogEntry, Tier};
use crate::select::CurrentAction;

/// Completed vs. total distinct modules in one tier bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct TierStats {
    pub done: usize,
    pub total: usize,
}

impl TierStats {
    /// A tier with zero modules is never complete; an empty bucket must
    /// not unlock the tier after it.
    pub fn is_complete(self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// UI-facing status of a tier within the active path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierStatus {
    /// Predecessor tier not yet complete
    Locked,
    /// Unlocked with work remaining
    Active,
    /// Every module in the bucket completed
    Complete,
}

/// One tier's stats and gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierState {
    pub tier: Tier,
    pub stats: TierStats,
    /// Whether the linear gate has opened this tier
    pub eligible: bool,
    pub status: TierStatus,
}

/// Per-tier rollup for the trainee's current path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPath {
    pub path_id: String,
    pub tier_stats: [TierStats; 3],
    pub tier_states: [TierState; 3],
    pub active_tier: Tier,
}

impl ProgramPath {
    pub fn tier_state(&self, tier: Tier) -> &TierState {
        &self.tier_states[tier as usize]
    }
}

/// Fine-grained progress on the skill behind the current action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillProgress {
    pub label: String,
    pub done: usize,
    pub total: usize,
}

/// One row of the curriculum-wide journey summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleJourneyEntry {
    pub module: String,
    pub label: String,
    pub done: usize,
    pub total: usize,
    /// `done / total`, rounded to whole percent; 0 for an empty module
    pub percent: u8,
    /// Label of the next unfinished skill, when one exists
    pub next_skill: Option<String>,
}

/// A selectable module for the UI's module picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOption {
    pub value: String,
    pub label: String,
    pub description: Option<String>,
}

/// The full progression view: the single output of an evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionView {
    /// First-pass attempts; all tier and eligibility math runs on these
    pub primary_cases: Vec<CaseRecord>,

    /// Practice traffic on already-completed modules, most recent first
    pub retake_cases: Vec<CaseRecord>,

    /// Resumable unfinished attempt, when one exists
    pub draft_case: Option<CaseRecord>,

    /// Actionable assigned work, ordered for display
    pub assigned_cases: Vec<CaseRecord>,

    /// Non-completed primary cases whose path+tier is unlocked
    pub eligible_cases: Vec<CaseRecord>,

    pub current_path_id: String,

    pub current_tier: Tier,

    /// Ranked module picker entries, capped
    pub module_options: Vec<ModuleOption>,

    /// The case stage three would surface, when any
    pub recommended_case: Option<CaseRecord>,

    /// What the UI should do next; `None` means nothing is actionable
    pub current_action: Option<CurrentAction>,

    pub skill_progress: Option<SkillProgress>,

    pub program_path: ProgramPath,

    pub module_journey: Vec<ModuleJourneyEntry>,

    /// Catalog entries still open to the trainee in the active module
    pub available_modules: Vec<ModuleCatalogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tier_is_never_complete() {
        let empty = TierStats { done: 0, total: 0 };
        assert!(!empty.is_complete());

        let full = TierStats { done: 2, total: 2 };
        assert!(full.is_complete());

        let partial = TierStats { done: 1, total: 2 };
        assert!(!partial.is_complete());
    }
}
