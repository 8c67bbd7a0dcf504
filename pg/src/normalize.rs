//! Key resolution and normalization
//!
//! Maps heterogeneous, partially-missing record fields onto the three
//! canonical keys used everywhere else: path key, module key, skill key.
//! Everything here is pure string manipulation that never fails; an input
//! that cannot be classified degrades to an empty string and downstream
//! aggregation excludes it.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{CaseRecord, Depth, ModuleCatalogEntry, Tier};

/// Path used when a record carries neither a path id nor an audit area
pub const DEFAULT_PATH: &str = "general";

/// The three top-level subject buckets the catalog knows
pub const CANONICAL_MODULES: [(&str, &str); 3] = [
    ("payables", "Accounts Payable"),
    ("cash", "Cash"),
    ("fixed_assets", "Fixed Assets"),
];

/// Free-text variants observed in legacy data, keyed by slug
const MODULE_ALIASES: [(&str, &str); 12] = [
    ("payables", "payables"),
    ("accounts_payable", "payables"),
    ("ap", "payables"),
    ("trade_payables", "payables"),
    ("cash", "cash"),
    ("cash_and_equivalents", "cash"),
    ("cash_and_bank", "cash"),
    ("treasury", "cash"),
    ("fixed_assets", "fixed_assets"),
    ("fa", "fixed_assets"),
    ("ppe", "fixed_assets"),
    ("property_plant_and_equipment", "fixed_assets"),
];

/// Lowercase a free-text tag into a stable `snake_case` slug
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Canonical keys derived for one case or catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    /// Curriculum track, `general` by default; never empty
    pub path: String,

    /// Resolved tier, `foundations` by default
    pub tier: Tier,

    /// Subject bucket; empty when unresolvable (record excluded from
    /// curriculum math)
    pub module: String,

    /// `{base}::{depth}`; empty when no base can be established
    pub skill: String,

    /// Human-facing skill base string behind `skill`, when one exists
    pub skill_base: Option<String>,
}

/// Resolves canonical keys from raw record fields.
///
/// Carries the module alias table so deployments can extend the built-in
/// variants with site-local ones.
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            aliases: MODULE_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl Normalizer {
    /// Built-in alias table extended with site-local entries.
    /// Extension keys are slugged so config values match raw data.
    pub fn with_aliases<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut normalizer = Self::default();
        for (from, to) in extra {
            normalizer.aliases.insert(slugify(&from), slugify(&to));
        }
        normalizer
    }

    /// Module key for a free-text subject tag: slug, then alias lookup,
    /// then the slug itself so unrecognized legacy areas stay countable.
    pub fn module_key(&self, text: &str) -> String {
        let slug = slugify(text);
        if slug.is_empty() {
            return String::new();
        }
        self.aliases.get(&slug).cloned().unwrap_or(slug)
    }

    /// Path key: explicit path id, else audit area, else the default path
    pub fn path_key(&self, path_id: Option<&str>, audit_area: Option<&str>) -> String {
        if let Some(path) = path_id {
            let slug = slugify(path);
            if !slug.is_empty() {
                return slug;
            }
        }
        if let Some(area) = audit_area {
            let slug = slugify(area);
            if !slug.is_empty() {
                return slug;
            }
        }
        DEFAULT_PATH.to_string()
    }

    /// Tier resolution, preserving the legacy precedence where a `pathId`
    /// holding a tier literal wins over the tier field itself. Taking that
    /// fallback is a data-quality signal, so it is logged rather than
    /// silently absorbed.
    pub fn resolve_tier(&self, record_id: &str, path_id: Option<&str>, tier_raw: Option<&str>) -> Tier {
        if let Some(tier) = path_id.and_then(|p| p.parse::<Tier>().ok()) {
            warn!(record_id, path_id = path_id.unwrap_or(""), "pathId holds a tier literal; using it as the tier");
            return tier;
        }
        tier_raw.and_then(|t| t.parse::<Tier>().ok()).unwrap_or_default()
    }

    /// Depth: explicit case level when valid, else implied by the tier
    fn resolve_depth(&self, case_level: Option<&str>, tier: Tier) -> Depth {
        case_level
            .and_then(|lvl| lvl.parse::<Depth>().ok())
            .unwrap_or_else(|| tier.implied_depth())
    }

    fn skill_key(&self, base: Option<&str>, fallback_ids: &[Option<&str>], depth: Depth) -> (String, Option<String>) {
        let base = base
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| {
                fallback_ids
                    .iter()
                    .flatten()
                    .map(|s| s.trim())
                    .find(|s| !s.is_empty())
                    .map(str::to_string)
            });
        match base {
            Some(base) => {
                let key = format!("{}::{}", base, depth);
                (key, Some(base))
            }
            None => (String::new(), None),
        }
    }

    /// Derive all canonical keys for a case.
    ///
    /// `catalog_modules` maps recipe ids and module ids to their module
    /// keys, so a case with no usable audit area or module title can still
    /// resolve through the catalog entry it was instantiated from.
    pub fn case_keys(&self, case: &CaseRecord, catalog_modules: &HashMap<String, String>) -> RecordKeys {
        let path = self.path_key(case.path_id.as_deref(), case.audit_area.as_deref());
        let tier = self.resolve_tier(&case.id, case.path_id.as_deref(), case.tier.as_deref());

        let mut module = case
            .audit_area
            .as_deref()
            .map(|area| self.module_key(area))
            .unwrap_or_default();
        if module.is_empty() {
            module = case
                .module_title
                .as_deref()
                .map(|title| self.module_key(title))
                .unwrap_or_default();
        }
        if module.is_empty() {
            module = [case.module_id.as_deref(), case.recipe_id.as_deref()]
                .into_iter()
                .flatten()
                .find_map(|id| catalog_modules.get(id).cloned())
                .unwrap_or_default();
        }

        let depth = self.resolve_depth(case.case_level.as_deref(), tier);
        let base = [&case.primary_skill, &case.title, &case.case_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty());
        let (skill, skill_base) = self.skill_key(
            base,
            &[case.module_id.as_deref(), case.recipe_id.as_deref(), Some(&case.id)],
            depth,
        );

        RecordKeys {
            path,
            tier,
            module,
            skill,
            skill_base,
        }
    }

    /// Derive all canonical keys for a catalog entry
    pub fn recipe_keys(&self, recipe: &ModuleCatalogEntry) -> RecordKeys {
        let path = self.path_key(recipe.path_id.as_deref(), recipe.audit_area.as_deref());
        let tier = self.resolve_tier(&recipe.id, recipe.path_id.as_deref(), recipe.tier.as_deref());

        let mut module = recipe
            .audit_area
            .as_deref()
            .map(|area| self.module_key(area))
            .unwrap_or_default();
        if module.is_empty() {
            module = recipe
                .module_title
                .as_deref()
                .map(|title| self.module_key(title))
                .unwrap_or_default();
        }
        if module.is_empty() {
            module = self.module_key(recipe.module_id_or_self());
        }

        let depth = tier.implied_depth();
        let base = [&recipe.primary_skill, &recipe.title, &recipe.module_title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty());
        let (skill, skill_base) = self.skill_key(base, &[recipe.module_id.as_deref(), Some(&recipe.id)], depth);

        RecordKeys {
            path,
            tier,
            module,
            skill,
            skill_base,
        }
    }

    /// Normalize a caller-supplied module selection so any alias of a
    /// module selects it. Returns `None` for blank input.
    pub fn selection_key(&self, selected: Option<&str>) -> Option<String> {
        let key = self.module_key(selected?);
        if key.is_empty() { None } else { Some(key) }
    }
}
