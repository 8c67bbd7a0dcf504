//! Snapshot loading
//!
//! Trainee cases and the module catalog arrive as JSON array exports from
//! the training platform. Files must parse as arrays, but individual rows
//! are legacy material: a row that fails to deserialize is skipped with a
//! warning rather than failing the whole load, mirroring how the engine
//! treats unclassifiable records.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use progression::{CaseRecord, ModuleCatalogEntry};

/// Snapshot loading failures
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Snapshot {path} is not a JSON array: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load the case snapshot
pub fn load_cases(path: &Path) -> Result<Vec<CaseRecord>, SnapshotError> {
    load_records(path, "case")
}

/// Load the catalog snapshot
pub fn load_recipes(path: &Path) -> Result<Vec<ModuleCatalogEntry>, SnapshotError> {
    load_records(path, "recipe")
}

/// Load a snapshot, treating a missing file as an empty collection.
/// A fresh trainee simply has no export yet.
pub fn load_cases_or_empty(path: &Path) -> Result<Vec<CaseRecord>, SnapshotError> {
    match load_cases(path) {
        Err(SnapshotError::NotFound(path)) => {
            debug!(path = %path.display(), "no case snapshot; starting empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Catalog variant of [`load_cases_or_empty`]
pub fn load_recipes_or_empty(path: &Path) -> Result<Vec<ModuleCatalogEntry>, SnapshotError> {
    match load_recipes(path) {
        Err(SnapshotError::NotFound(path)) => {
            debug!(path = %path.display(), "no catalog snapshot; starting empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

fn load_records<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<T>(row) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(path = %path.display(), index, kind, %error, "skipping malformed row");
            }
        }
    }
    debug!(path = %path.display(), count = records.len(), kind, "snapshot loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_cases_parses_camel_case_rows() {
        let path = write_temp(
            "ct-snapshot-cases.json",
            r#"[{"id": "c1", "auditArea": "Accounts Payable", "status": "assigned"}]"#,
        );
        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].audit_area.as_deref(), Some("Accounts Payable"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let path = write_temp(
            "ct-snapshot-mixed.json",
            r#"[{"id": "good"}, "not an object", {"id": "also-good"}]"#,
        );
        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_non_array_snapshot_is_an_error() {
        let path = write_temp("ct-snapshot-bad.json", r#"{"id": "c1"}"#);
        assert!(matches!(load_cases(&path), Err(SnapshotError::Parse { .. })));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_degrades_to_empty_when_asked() {
        let path = std::env::temp_dir().join("ct-snapshot-absent.json");
        assert!(matches!(load_cases(&path), Err(SnapshotError::NotFound(_))));
        assert!(load_cases_or_empty(&path).unwrap().is_empty());
        assert!(load_recipes_or_empty(&path).unwrap().is_empty());
    }
}
