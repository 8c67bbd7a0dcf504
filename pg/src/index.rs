//! Lookup indexes built once per evaluation
//!
//! The legacy implementation threaded several ad-hoc lookup tables through
//! one large function. Here they are explicit immutable value objects,
//! constructed up front and passed between the evaluation steps as plain
//! data: `ModuleIndex` (catalog), `CompletionIndex` (what the trainee has
//! finished), `TierMembership` (which modules sit in which tier bucket).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::domain::{CaseRecord, ModuleCatalogEntry, Tier};
use crate::normalize::{Normalizer, RecordKeys};
use crate::view::TierStats;

/// A case paired with its resolved canonical keys
#[derive(Debug, Clone)]
pub struct KeyedCase<'a> {
    pub case: &'a CaseRecord,
    pub keys: RecordKeys,
}

/// A catalog entry paired with its resolved canonical keys
#[derive(Debug, Clone)]
pub struct KeyedRecipe<'a> {
    pub recipe: &'a ModuleCatalogEntry,
    pub keys: RecordKeys,
}

/// Catalog lookups keyed by module
#[derive(Debug)]
pub struct ModuleIndex<'a> {
    entries: Vec<KeyedRecipe<'a>>,
    by_module: BTreeMap<String, Vec<usize>>,
    /// recipe id and module id -> module key, for resolving cases that
    /// only carry a reference to their catalog entry
    id_to_module: HashMap<String, String>,
    skills_by_module: BTreeMap<String, Vec<String>>,
    modules_by_path: BTreeMap<String, BTreeSet<String>>,
}

impl<'a> ModuleIndex<'a> {
    pub fn build(recipes: &'a [ModuleCatalogEntry], normalizer: &Normalizer) -> Self {
        let mut entries = Vec::with_capacity(recipes.len());
        let mut by_module: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut id_to_module = HashMap::new();
        let mut skills_by_module: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut modules_by_path: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for recipe in recipes {
            let keys = normalizer.recipe_keys(recipe);
            if keys.module.is_empty() {
                debug!(recipe_id = %recipe.id, "catalog entry has no resolvable module; skipping");
                continue;
            }

            id_to_module.entry(recipe.id.clone()).or_insert_with(|| keys.module.clone());
            if let Some(module_id) = recipe.module_id.as_deref() {
                id_to_module.entry(module_id.to_string()).or_insert_with(|| keys.module.clone());
            }

            by_module.entry(keys.module.clone()).or_default().push(entries.len());
            if !keys.skill.is_empty() {
                let skills = skills_by_module.entry(keys.module.clone()).or_default();
                if !skills.contains(&keys.skill) {
                    skills.push(keys.skill.clone());
                }
            }
            modules_by_path.entry(keys.path.clone()).or_default().insert(keys.module.clone());

            entries.push(KeyedRecipe { recipe, keys });
        }

        Self {
            entries,
            by_module,
            id_to_module,
            skills_by_module,
            modules_by_path,
        }
    }

    /// recipe id / module id -> module key map, used during case
    /// normalization
    pub fn catalog_modules(&self) -> &HashMap<String, String> {
        &self.id_to_module
    }

    /// Catalog entries for a module, in catalog order
    pub fn recipes_for(&self, module: &str) -> impl Iterator<Item = &KeyedRecipe<'a>> {
        self.by_module
            .get(module)
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
    }

    pub fn first_recipe(&self, module: &str) -> Option<&KeyedRecipe<'a>> {
        self.recipes_for(module).next()
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[KeyedRecipe<'a>] {
        &self.entries
    }

    /// Skill keys the catalog declares for a module, in catalog order
    pub fn declared_skills(&self, module: &str) -> &[String] {
        self.skills_by_module.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Module keys the catalog places on a path
    pub fn modules_on_path(&self, path: &str) -> impl Iterator<Item = &str> {
        self.modules_by_path
            .get(path)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.by_module.contains_key(module)
    }
}

/// What the trainee has completed, across every attempt
///
/// Built from all case records, retakes included: completion is a one-way
/// ratchet, so later unfinished attempts never un-complete anything.
#[derive(Debug, Default)]
pub struct CompletionIndex {
    /// Raw module ids (with id fallback) that have a completed attempt;
    /// drives retake classification
    completed_module_ids: HashSet<String>,
    /// Resolved module keys with a completed attempt; drives tier stats
    completed_modules: HashSet<String>,
    /// Skill keys with a completed attempt; drives skill/journey math
    completed_skills: HashSet<String>,
}

impl CompletionIndex {
    pub fn build(cases: &[KeyedCase<'_>]) -> Self {
        let mut index = Self::default();
        for keyed in cases {
            if !keyed.case.is_completed() {
                continue;
            }
            index
                .completed_module_ids
                .insert(keyed.case.module_id_or_self().to_string());
            if !keyed.keys.module.is_empty() {
                index.completed_modules.insert(keyed.keys.module.clone());
            }
            if !keyed.keys.skill.is_empty() {
                index.completed_skills.insert(keyed.keys.skill.clone());
            }
        }
        debug!(
            modules = index.completed_modules.len(),
            skills = index.completed_skills.len(),
            "completion index built"
        );
        index
    }

    pub fn is_module_id_completed(&self, module_id: &str) -> bool {
        self.completed_module_ids.contains(module_id)
    }

    pub fn is_module_completed(&self, module: &str) -> bool {
        self.completed_modules.contains(module)
    }

    pub fn is_skill_completed(&self, skill: &str) -> bool {
        self.completed_skills.contains(skill)
    }
}

/// Which modules sit in which tier bucket, per path
///
/// Membership is the union of first-pass attempts and catalog entries, so
/// the trainee's view covers the full curriculum rather than only their
/// history.
#[derive(Debug, Default)]
pub struct TierMembership {
    buckets: BTreeMap<String, BTreeMap<Tier, BTreeSet<String>>>,
}

impl TierMembership {
    pub fn build(primary: &[KeyedCase<'_>], catalog: &ModuleIndex<'_>) -> Self {
        let mut membership = Self::default();
        for keyed in primary {
            membership.insert(&keyed.keys.path, keyed.keys.tier, &keyed.keys.module);
        }
        for entry in catalog.entries() {
            membership.insert(&entry.keys.path, entry.keys.tier, &entry.keys.module);
        }
        membership
    }

    fn insert(&mut self, path: &str, tier: Tier, module: &str) {
        if module.is_empty() {
            return;
        }
        self.buckets
            .entry(path.to_string())
            .or_default()
            .entry(tier)
            .or_default()
            .insert(module.to_string());
    }

    /// Paths with any curriculum membership, in stable order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn stats(&self, path: &str, tier: Tier, completion: &CompletionIndex) -> TierStats {
        let Some(modules) = self.buckets.get(path).and_then(|tiers| tiers.get(&tier)) else {
            return TierStats::default();
        };
        let done = modules.iter().filter(|m| completion.is_module_completed(m)).count();
        TierStats {
            done,
            total: modules.len(),
        }
    }

    /// Strict linear gate: foundations is always open, each later tier
    /// needs its predecessor complete.
    pub fn is_unlocked(&self, path: &str, tier: Tier, completion: &CompletionIndex) -> bool {
        match tier.predecessor() {
            None => true,
            Some(previous) => {
                self.stats(path, previous, completion).is_complete()
                    && self.is_unlocked(path, previous, completion)
            }
        }
    }

    /// First unlocked tier with work remaining, else the highest unlocked
    pub fn current_tier(&self, path: &str, completion: &CompletionIndex) -> Tier {
        let mut highest_unlocked = Tier::Foundations;
        for tier in Tier::ALL {
            if !self.is_unlocked(path, tier, completion) {
                break;
            }
            highest_unlocked = tier;
            let stats = self.stats(path, tier, completion);
            if stats.done < stats.total {
                return tier;
            }
        }
        highest_unlocked
    }
}
