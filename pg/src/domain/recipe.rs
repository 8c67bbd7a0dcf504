//! Module catalog entries ("recipes")
//!
//! A recipe describes a module independent of any trainee's attempt history,
//! so the engine sees the full curriculum and not just what was attempted.

use serde::{Deserialize, Serialize};

/// One published curriculum module description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleCatalogEntry {
    /// Unique identifier
    pub id: String,

    /// Module this entry belongs to; falls back to `id` when absent
    pub module_id: Option<String>,

    /// Coarse subject tag (free text, aliased during normalization)
    pub audit_area: Option<String>,

    pub path_id: Option<String>,

    /// Raw tier value; parsed leniently during normalization
    pub tier: Option<String>,

    pub primary_skill: Option<String>,

    pub title: Option<String>,

    pub module_title: Option<String>,

    pub path_description: Option<String>,
}

impl ModuleCatalogEntry {
    /// Module id with the documented fallback to the entry id
    pub fn module_id_or_self(&self) -> &str {
        match self.module_id.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => &self.id,
        }
    }

    /// Human-facing label with legacy fallbacks
    pub fn display_title(&self) -> &str {
        [&self.module_title, &self.title, &self.primary_skill]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_camel_case_serde() {
        let json = r#"{
            "id": "recipe-1",
            "moduleId": "fixed_assets",
            "auditArea": "Fixed Assets",
            "pathId": "general",
            "tier": "core",
            "primarySkill": "Depreciation testing",
            "pathDescription": "Plant and equipment cycle"
        }"#;
        let recipe: ModuleCatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.module_id_or_self(), "fixed_assets");
        assert_eq!(recipe.tier.as_deref(), Some("core"));
        assert_eq!(recipe.display_title(), "Depreciation testing");
    }

    #[test]
    fn test_module_id_fallback() {
        let recipe = ModuleCatalogEntry {
            id: "recipe-2".to_string(),
            ..Default::default()
        };
        assert_eq!(recipe.module_id_or_self(), "recipe-2");
    }
}
