//! Evaluation orchestrator
//!
//! One pass: normalize, index, partition, select, aggregate. Each step is
//! a pure function over the value objects built up front, and the whole
//! pass is deterministic — same input, same view, every time.

use tracing::debug;

use crate::domain::{CaseRecord, ModuleCatalogEntry, Tier};
use crate::index::{CompletionIndex, KeyedCase, ModuleIndex, TierMembership};
use crate::journey::{MAX_MODULE_OPTIONS, available_modules, module_journey, module_options, skill_progress};
use crate::normalize::{DEFAULT_PATH, Normalizer};
use crate::partition::partition_attempts;
use crate::select::{CurrentAction, SelectionOutcome, select};
use crate::view::{ProgramPath, ProgressionView, TierState, TierStatus};

/// Everything one evaluation consumes. Collections may be empty; the
/// caller is responsible for passing a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProgressionInput {
    pub cases: Vec<CaseRecord>,
    pub recipes: Vec<ModuleCatalogEntry>,
    /// Optional module scope, accepted in any alias form
    pub selected_module: Option<String>,
}

/// Configurable evaluation entry point.
///
/// Holds no state between calls; concurrent callers can share one engine
/// or build their own, it makes no difference.
#[derive(Debug, Clone)]
pub struct Engine {
    normalizer: Normalizer,
    max_module_options: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            max_module_options: MAX_MODULE_OPTIONS,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a normalizer carrying site-local module aliases
    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    /// Override the module picker cap
    pub fn max_module_options(mut self, cap: usize) -> Self {
        self.max_module_options = cap;
        self
    }

    /// Compute the full progression view for one trainee snapshot
    pub fn evaluate(&self, input: &ProgressionInput) -> ProgressionView {
        let catalog = ModuleIndex::build(&input.recipes, &self.normalizer);
        let keyed: Vec<KeyedCase<'_>> = input
            .cases
            .iter()
            .map(|case| KeyedCase {
                keys: self.normalizer.case_keys(case, catalog.catalog_modules()),
                case,
            })
            .collect();
        let completion = CompletionIndex::build(&keyed);
        let partition = partition_attempts(keyed, &completion);
        let membership = TierMembership::build(&partition.primary, &catalog);
        let selected = self.normalizer.selection_key(input.selected_module.as_deref());

        let outcome = select(&partition.primary, &catalog, &membership, &completion, selected.as_deref());

        let current_path = resolve_current_path(&outcome, &partition.primary, &catalog);
        let current_tier = membership.current_tier(&current_path, &completion);
        let program_path = build_program_path(&current_path, &membership, &completion);

        let skill = action_context(&outcome, &partition.primary, &catalog).and_then(|(base, module)| {
            skill_progress(&base, &module, &partition.primary, &catalog, &completion)
        });
        let journey = module_journey(&partition.primary, &catalog, &completion);
        let options = module_options(
            &outcome.assigned,
            &outcome.eligible,
            &partition.primary,
            &catalog,
            &current_path,
            self.max_module_options,
        );
        let available = available_modules(outcome.active_module.as_deref(), &catalog, &completion);

        debug!(
            cases = input.cases.len(),
            recipes = input.recipes.len(),
            path = %current_path,
            tier = %current_tier,
            "progression view computed"
        );

        ProgressionView {
            primary_cases: partition.primary.iter().map(|k| k.case.clone()).collect(),
            retake_cases: partition.retakes.iter().map(|k| k.case.clone()).collect(),
            draft_case: outcome.draft.map(|k| k.case.clone()),
            assigned_cases: outcome.assigned.iter().map(|k| k.case.clone()).collect(),
            eligible_cases: outcome.eligible.iter().map(|k| k.case.clone()).collect(),
            current_path_id: current_path,
            current_tier,
            module_options: options,
            recommended_case: outcome.recommended.map(|k| k.case.clone()),
            skill_progress: skill,
            program_path,
            module_journey: journey,
            available_modules: available,
            current_action: outcome.action,
        }
    }
}

/// Engine with the built-in alias table and default caps
pub fn compute_progression_view(input: &ProgressionInput) -> ProgressionView {
    Engine::new().evaluate(input)
}

/// Path the view should center on: the record backing the action, else
/// the most recently active case, else the catalog, else the default.
fn resolve_current_path(
    outcome: &SelectionOutcome<'_>,
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
) -> String {
    match &outcome.action {
        Some(
            CurrentAction::ResumeDraft { case }
            | CurrentAction::Assigned { case }
            | CurrentAction::Recommended { case },
        ) => {
            if let Some(keyed) = primary.iter().find(|k| k.case.id == case.id) {
                return keyed.keys.path.clone();
            }
        }
        Some(CurrentAction::StartModule { recipe }) => {
            if let Some(entry) = catalog.entries().iter().find(|e| e.recipe.id == recipe.id) {
                return entry.keys.path.clone();
            }
        }
        Some(CurrentAction::EmptyModule { .. }) | None => {}
    }

    let most_recent = primary
        .iter()
        .filter_map(|k| k.case.latest_activity().map(|ts| (ts, &k.keys.path)))
        .max_by_key(|(ts, _)| *ts)
        .map(|(_, path)| path.clone());
    if let Some(path) = most_recent {
        return path;
    }
    if let Some(entry) = catalog.entries().first() {
        return entry.keys.path.clone();
    }
    DEFAULT_PATH.to_string()
}

/// Skill base and module behind the current action, when they resolve
fn action_context(
    outcome: &SelectionOutcome<'_>,
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
) -> Option<(String, String)> {
    match &outcome.action {
        Some(
            CurrentAction::ResumeDraft { case }
            | CurrentAction::Assigned { case }
            | CurrentAction::Recommended { case },
        ) => {
            let keyed = primary.iter().find(|k| k.case.id == case.id)?;
            let base = keyed.keys.skill_base.clone()?;
            (!keyed.keys.module.is_empty()).then(|| (base, keyed.keys.module.clone()))
        }
        Some(CurrentAction::StartModule { recipe }) => {
            let entry = catalog.entries().iter().find(|e| e.recipe.id == recipe.id)?;
            let base = entry.keys.skill_base.clone()?;
            Some((base, entry.keys.module.clone()))
        }
        Some(CurrentAction::EmptyModule { .. }) | None => None,
    }
}

fn build_program_path(path: &str, membership: &TierMembership, completion: &CompletionIndex) -> ProgramPath {
    let tier_stats =
        Tier::ALL.map(|tier| membership.stats(path, tier, completion));
    let active_tier = membership.current_tier(path, completion);
    let tier_states = Tier::ALL.map(|tier| {
        let stats = membership.stats(path, tier, completion);
        let eligible = membership.is_unlocked(path, tier, completion);
        let status = if stats.is_complete() {
            TierStatus::Complete
        } else if eligible {
            TierStatus::Active
        } else {
            TierStatus::Locked
        };
        TierState {
            tier,
            stats,
            eligible,
            status,
        }
    });
    ProgramPath {
        path_id: path.to_string(),
        tier_stats,
        tier_states,
        active_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProgressRecord;

    fn foundations_case(id: &str, area: &str, completed: bool) -> CaseRecord {
        CaseRecord {
            id: id.to_string(),
            audit_area: Some(area.to_string()),
            path_id: Some("general".to_string()),
            tier: Some("foundations".to_string()),
            title: Some(id.to_string()),
            progress: Some(ProgressRecord {
                has_successful_attempt: Some(completed),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_yields_inactive_view() {
        let view = compute_progression_view(&ProgressionInput::default());
        assert!(view.current_action.is_none());
        assert!(view.primary_cases.is_empty());
        assert_eq!(view.current_path_id, DEFAULT_PATH);
        assert_eq!(view.current_tier, Tier::Foundations);
        assert_eq!(view.program_path.tier_state(Tier::Foundations).status, TierStatus::Active);
    }

    #[test]
    fn test_view_is_deterministic() {
        let input = ProgressionInput {
            cases: vec![
                foundations_case("c1", "cash", true),
                foundations_case("c2", "ap", false),
            ],
            recipes: vec![ModuleCatalogEntry {
                id: "r1".to_string(),
                audit_area: Some("fixed assets".to_string()),
                path_id: Some("general".to_string()),
                ..Default::default()
            }],
            selected_module: None,
        };
        let first = compute_progression_view(&input);
        let second = compute_progression_view(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_selected_module_accepts_aliases() {
        let input = ProgressionInput {
            cases: vec![foundations_case("c1", "Accounts Payable", false)],
            recipes: vec![],
            selected_module: Some("ap".to_string()),
        };
        let view = compute_progression_view(&input);
        match view.current_action {
            Some(CurrentAction::Assigned { case }) => assert_eq!(case.id, "c1"),
            other => panic!("expected Assigned, got {:?}", other),
        }
    }

    #[test]
    fn test_program_path_tracks_action_record() {
        let input = ProgressionInput {
            cases: vec![foundations_case("c1", "cash", false)],
            recipes: vec![],
            selected_module: None,
        };
        let view = compute_progression_view(&input);
        assert_eq!(view.current_path_id, "general");
        assert_eq!(view.program_path.tier_stats[0].total, 1);
    }
}
