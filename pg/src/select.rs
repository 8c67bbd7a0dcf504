//! Candidate selection: what should the trainee do next
//!
//! A strict priority order resolves exactly one action per evaluation:
//! resume an unfinished draft, open assigned work, recommend an eligible
//! case, start a module from the catalog, or report the selected module
//! empty. Each stage is computed independently over the primary pool,
//! optionally scoped to a caller-selected module.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::domain::{CaseRecord, ModuleCatalogEntry};
use crate::index::{CompletionIndex, KeyedCase, ModuleIndex, TierMembership};

/// The single resolved next step for the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CurrentAction {
    /// Reopen an unfinished attempt with saved state
    ResumeDraft { case: CaseRecord },
    /// Open the next assigned case
    Assigned { case: CaseRecord },
    /// Open the best eligible case in an unlocked tier
    Recommended { case: CaseRecord },
    /// Start a fresh attempt from a catalog entry
    StartModule { recipe: ModuleCatalogEntry },
    /// The selected module has no cases and no catalog entries
    EmptyModule { module: String },
}

/// Everything the selection pass resolves in one sweep
#[derive(Debug, Default)]
pub struct SelectionOutcome<'a> {
    pub draft: Option<&'a KeyedCase<'a>>,
    /// Actionable assigned work, display order, draft excluded
    pub assigned: Vec<&'a KeyedCase<'a>>,
    /// All non-completed primary cases in unlocked tiers
    pub eligible: Vec<&'a KeyedCase<'a>>,
    pub recommended: Option<&'a KeyedCase<'a>>,
    pub action: Option<CurrentAction>,
    /// Module context backing the action, for downstream aggregation
    pub active_module: Option<String>,
}

/// Display and tie-break order: lowest order index first (absent last),
/// then title, then id for determinism.
pub fn case_order(a: &KeyedCase<'_>, b: &KeyedCase<'_>) -> Ordering {
    match (a.case.order_index, b.case.order_index) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.case.display_title().cmp(b.case.display_title()))
    .then_with(|| a.case.id.cmp(&b.case.id))
}

/// Most recent activity first; dateless records last, then id.
fn recency(a: &KeyedCase<'_>, b: &KeyedCase<'_>) -> Ordering {
    match (a.case.latest_activity(), b.case.latest_activity()) {
        (Some(ts_a), Some(ts_b)) => ts_a.cmp(&ts_b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.case.id.cmp(&a.case.id))
}

/// Resolve the current action and its supporting case pools.
///
/// `selected_module` must already be a normalized module key.
pub fn select<'a>(
    primary: &'a [KeyedCase<'a>],
    catalog: &ModuleIndex<'a>,
    membership: &TierMembership,
    completion: &CompletionIndex,
    selected_module: Option<&str>,
) -> SelectionOutcome<'a> {
    let in_scope =
        |keyed: &KeyedCase<'_>| selected_module.is_none_or(|module| keyed.keys.module == module);

    let mut outcome = SelectionOutcome::default();

    // Stage 1: resume the most recently touched meaningful draft
    outcome.draft = primary
        .iter()
        .filter(|k| !k.case.is_completed() && k.case.has_meaningful_draft() && in_scope(k))
        .max_by(|a, b| recency(a, b));

    // Stage 2 pool: actionable assigned work, draft excluded
    let draft_id = outcome.draft.map(|k| k.case.id.as_str());
    outcome.assigned = primary
        .iter()
        .filter(|k| {
            !k.case.is_completed()
                && k.case.status.is_actionable()
                && in_scope(k)
                && Some(k.case.id.as_str()) != draft_id
        })
        .collect();
    outcome.assigned.sort_by(|a, b| case_order(a, b));

    // Stage 3 pool: anything non-completed in an unlocked tier
    outcome.eligible = primary
        .iter()
        .filter(|k| {
            !k.case.is_completed()
                && !k.keys.module.is_empty()
                && membership.is_unlocked(&k.keys.path, k.keys.tier, completion)
        })
        .collect();
    outcome.recommended = outcome
        .eligible
        .iter()
        .filter(|k| in_scope(k))
        .min_by(|a, b| case_order(a, b))
        .copied();

    outcome.action = if let Some(draft) = outcome.draft {
        Some(CurrentAction::ResumeDraft {
            case: draft.case.clone(),
        })
    } else if let Some(assigned) = outcome.assigned.first() {
        Some(CurrentAction::Assigned {
            case: assigned.case.clone(),
        })
    } else if let Some(recommended) = outcome.recommended {
        Some(CurrentAction::Recommended {
            case: recommended.case.clone(),
        })
    } else {
        start_or_empty(primary, catalog, membership, completion, selected_module)
    };

    outcome.active_module = match &outcome.action {
        Some(CurrentAction::ResumeDraft { case } | CurrentAction::Assigned { case } | CurrentAction::Recommended { case }) => {
            primary
                .iter()
                .find(|k| k.case.id == case.id)
                .map(|k| k.keys.module.clone())
                .filter(|m| !m.is_empty())
        }
        Some(CurrentAction::StartModule { recipe }) => catalog
            .entries()
            .iter()
            .find(|e| e.recipe.id == recipe.id)
            .map(|e| e.keys.module.clone()),
        Some(CurrentAction::EmptyModule { module }) => Some(module.clone()),
        None => selected_module.map(str::to_string),
    };

    debug!(
        action = ?outcome.action.as_ref().map(std::mem::discriminant),
        module = outcome.active_module.as_deref().unwrap_or(""),
        "selection resolved"
    );
    outcome
}

/// Stages 4 and 5: nothing actionable exists, so either start a module
/// from the catalog or report the explicit selection empty.
fn start_or_empty(
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
    membership: &TierMembership,
    completion: &CompletionIndex,
    selected_module: Option<&str>,
) -> Option<CurrentAction> {
    let has_history = |module: &str| primary.iter().any(|k| k.keys.module == module);

    let module = match selected_module {
        Some(module) => module.to_string(),
        // No explicit selection: infer the first catalog module that is
        // reachable (tier unlocked on its own path) and not yet completed.
        None => {
            let entries = catalog.entries();
            let inferred = entries
                .iter()
                .find(|e| {
                    membership.is_unlocked(&e.keys.path, e.keys.tier, completion)
                        && !completion.is_module_completed(&e.keys.module)
                })
                .or_else(|| entries.iter().find(|e| !completion.is_module_completed(&e.keys.module)))
                .or_else(|| entries.first());
            inferred?.keys.module.clone()
        }
    };

    if catalog.has_module(&module) {
        let recipe = catalog
            .recipes_for(&module)
            .find(|e| !e.keys.skill.is_empty() && !completion.is_skill_completed(&e.keys.skill))
            .or_else(|| catalog.first_recipe(&module))?;
        return Some(CurrentAction::StartModule {
            recipe: recipe.recipe.clone(),
        });
    }

    if selected_module.is_some() && !has_history(&module) {
        return Some(CurrentAction::EmptyModule { module });
    }

    None
}
