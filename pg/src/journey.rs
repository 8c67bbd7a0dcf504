//! Human-facing progress aggregation
//!
//! Skill progress for the action the trainee is about to take, the
//! curriculum-wide module journey, the ranked module picker, and the
//! catalog entries still open in the active module. All of it reads the
//! same normalized pools the selection pass used.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::ModuleCatalogEntry;
use crate::index::{CompletionIndex, KeyedCase, ModuleIndex};
use crate::normalize::CANONICAL_MODULES;
use crate::select::case_order;
use crate::view::{ModuleJourneyEntry, ModuleOption, SkillProgress};

/// Ceiling on module picker entries
pub const MAX_MODULE_OPTIONS: usize = 6;

/// Depth-level progress for one skill base string within a module.
///
/// The universe of depth variants prefers what the catalog declares and
/// falls back to what the trainee's history shows.
pub fn skill_progress(
    base: &str,
    module: &str,
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
    completion: &CompletionIndex,
) -> Option<SkillProgress> {
    if base.is_empty() || module.is_empty() {
        return None;
    }
    let prefix = format!("{}::", base);

    let mut universe: Vec<&str> = catalog
        .declared_skills(module)
        .iter()
        .map(String::as_str)
        .filter(|skill| skill.starts_with(&prefix))
        .collect();
    if universe.is_empty() {
        for keyed in primary {
            if keyed.keys.module == module
                && keyed.keys.skill.starts_with(&prefix)
                && !universe.contains(&keyed.keys.skill.as_str())
            {
                universe.push(&keyed.keys.skill);
            }
        }
    }
    if universe.is_empty() {
        return None;
    }

    let done = universe.iter().filter(|skill| completion.is_skill_completed(skill)).count();
    Some(SkillProgress {
        label: base.to_string(),
        done,
        total: universe.len(),
    })
}

/// One journey row per fixed top-level subject
pub fn module_journey(
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
    completion: &CompletionIndex,
) -> Vec<ModuleJourneyEntry> {
    CANONICAL_MODULES
        .iter()
        .map(|&(module, label)| {
            let mut skills: Vec<&str> = catalog.declared_skills(module).iter().map(String::as_str).collect();
            if skills.is_empty() {
                for keyed in primary {
                    if keyed.keys.module == module
                        && !keyed.keys.skill.is_empty()
                        && !skills.contains(&keyed.keys.skill.as_str())
                    {
                        skills.push(&keyed.keys.skill);
                    }
                }
            }

            let total = skills.len();
            let done = skills.iter().filter(|skill| completion.is_skill_completed(skill)).count();
            let percent = if total == 0 {
                0
            } else {
                ((done as f64 / total as f64) * 100.0).round() as u8
            };

            let module_cases: Vec<&KeyedCase<'_>> =
                primary.iter().filter(|k| k.keys.module == module).collect();
            let next_skill = if module_cases.is_empty() {
                catalog
                    .first_recipe(module)
                    .and_then(|entry| entry.keys.skill_base.clone())
            } else {
                module_cases
                    .iter()
                    .filter(|k| !k.case.is_completed())
                    .min_by(|a, b| case_order(a, b))
                    .and_then(|k| k.keys.skill_base.clone())
            };

            ModuleJourneyEntry {
                module: module.to_string(),
                label: label.to_string(),
                done,
                total,
                percent,
                next_skill,
            }
        })
        .collect()
}

/// Ranked module picker entries, sourced from whichever case pool is
/// driving the recommendation context, topped up with catalog modules on
/// the same path.
pub fn module_options(
    assigned: &[&KeyedCase<'_>],
    eligible: &[&KeyedCase<'_>],
    primary: &[KeyedCase<'_>],
    catalog: &ModuleIndex<'_>,
    current_path: &str,
    cap: usize,
) -> Vec<ModuleOption> {
    let open_primary: Vec<&KeyedCase<'_>> =
        primary.iter().filter(|k| !k.case.is_completed()).collect();
    let pool: &[&KeyedCase<'_>] = if !assigned.is_empty() {
        assigned
    } else if !eligible.is_empty() {
        eligible
    } else {
        &open_primary
    };

    // module -> most recent activity across its pool cases
    let mut activity: BTreeMap<&str, Option<DateTime<Utc>>> = BTreeMap::new();
    for keyed in pool {
        if keyed.keys.module.is_empty() {
            continue;
        }
        let latest = keyed.case.latest_activity();
        activity
            .entry(&keyed.keys.module)
            .and_modify(|current| {
                if latest > *current {
                    *current = latest;
                }
            })
            .or_insert(latest);
    }

    let mut ranked: Vec<(&str, Option<DateTime<Utc>>)> = activity.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut options: Vec<ModuleOption> = Vec::new();
    for (module, _) in ranked {
        options.push(option_for(module, catalog));
    }
    for module in catalog.modules_on_path(current_path) {
        if !options.iter().any(|opt| opt.value == module) {
            options.push(option_for(module, catalog));
        }
    }

    options.truncate(cap);
    options
}

fn option_for(module: &str, catalog: &ModuleIndex<'_>) -> ModuleOption {
    let recipe = catalog.first_recipe(module);
    let label = recipe
        .map(|entry| entry.recipe.display_title().to_string())
        .or_else(|| {
            CANONICAL_MODULES
                .iter()
                .find(|(key, _)| *key == module)
                .map(|(_, label)| label.to_string())
        })
        .unwrap_or_else(|| module.to_string());
    ModuleOption {
        value: module.to_string(),
        label,
        description: recipe.and_then(|entry| entry.recipe.path_description.clone()),
    }
}

/// Catalog entries in the active module with no completed attempt yet
pub fn available_modules(
    active_module: Option<&str>,
    catalog: &ModuleIndex<'_>,
    completion: &CompletionIndex,
) -> Vec<ModuleCatalogEntry> {
    let Some(module) = active_module else {
        return Vec::new();
    };
    catalog
        .recipes_for(module)
        .filter(|entry| entry.keys.skill.is_empty() || !completion.is_skill_completed(&entry.keys.skill))
        .map(|entry| entry.recipe.clone())
        .collect()
}
