//! Configuration for casetrail

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use progression::MAX_MODULE_OPTIONS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the case snapshot (JSON array)
    #[serde(default = "default_cases_path")]
    pub cases_path: PathBuf,

    /// Path to the catalog snapshot (JSON array)
    #[serde(default = "default_recipes_path")]
    pub recipes_path: PathBuf,

    /// Site-local module aliases merged over the built-in table,
    /// e.g. `Creditors Ledger: payables`
    #[serde(default)]
    pub module_aliases: HashMap<String, String>,

    /// Ceiling on module picker entries
    #[serde(default = "default_max_module_options")]
    pub max_module_options: usize,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("casetrail")
}

fn default_cases_path() -> PathBuf {
    default_data_dir().join("cases.json")
}

fn default_recipes_path() -> PathBuf {
    default_data_dir().join("recipes.json")
}

fn default_max_module_options() -> usize {
    MAX_MODULE_OPTIONS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cases_path: default_cases_path(),
            recipes_path: default_recipes_path(),
            module_aliases: HashMap::new(),
            max_module_options: default_max_module_options(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("casetrail").join("config.yml")),
            Some(PathBuf::from("casetrail.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.cases_path.ends_with("cases.json"));
        assert!(config.module_aliases.is_empty());
        assert_eq!(config.max_module_options, MAX_MODULE_OPTIONS);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("casetrail-config-test.yml");
        let mut config = Config::default();
        config
            .module_aliases
            .insert("Creditors Ledger".to_string(), "payables".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.module_aliases.get("Creditors Ledger").map(String::as_str), Some("payables"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_yaml::from_str("module_aliases:\n  fa: fixed_assets\n").unwrap();
        assert!(config.recipes_path.ends_with("recipes.json"));
        assert_eq!(config.module_aliases.len(), 1);
    }
}
