//! A [`RuleStore`] backed by a directory of JSON files.
//!
//! Layout:
//!
//! ```text
//! <root>/rules.json            [RuleSummary, ...]
//! <root>/catalog.json          [OperatorEntry, ...]
//! <root>/<rule-id>.graph.json  GraphDto, one per saved rule
//! ```
//!
//! A missing `rules.json` or `catalog.json` reads as an empty list. Graph
//! files are replaced atomically: written beside the target, then renamed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use rulegraph_check::catalog::OperatorCatalog;

use crate::dto::GraphDto;
use crate::error::StorageError;
use crate::traits::RuleStore;
use crate::types::{RuleId, RuleSummary};

const RULES_FILE: &str = "rules.json";
const CATALOG_FILE: &str = "catalog.json";
const GRAPH_SUFFIX: &str = ".graph.json";

/// File-backed [`RuleStore`].
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Opens the store rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StorageError::InvalidStore {
                path: root,
                reason: "not a directory".to_string(),
            });
        }
        Ok(JsonDirStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the graph file for `id`.
    pub fn graph_path(&self, id: &RuleId) -> Result<PathBuf, StorageError> {
        let name = &id.0;
        let usable = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.chars().any(char::is_control);
        if !usable {
            return Err(StorageError::InvalidRuleId(id.clone()));
        }
        Ok(self.root.join(format!("{name}{GRAPH_SUFFIX}")))
    }

    fn require_rule(&self, id: &RuleId) -> Result<(), StorageError> {
        if self.list_rules()?.iter().any(|r| &r.id == id) {
            Ok(())
        } else {
            Err(StorageError::RuleNotFound(id.clone()))
        }
    }

    /// Reads and parses `path`, or returns `None` if it does not exist.
    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    /// Best-effort removal of a staging file left by a failed save.
    fn discard(staging: &Path) {
        match fs::remove_file(staging) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %staging.display(), error = %e, "failed to remove staging file")
            }
        }
    }
}

impl RuleStore for JsonDirStore {
    fn list_rules(&self) -> Result<Vec<RuleSummary>, StorageError> {
        let path = self.root.join(RULES_FILE);
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    fn load_rule(&self, id: &RuleId) -> Result<GraphDto, StorageError> {
        let path = self.graph_path(id)?;
        self.require_rule(id)?;
        let graph: GraphDto = Self::read_json(&path)?.unwrap_or_default();
        tracing::debug!(rule = %id, path = %path.display(), nodes = graph.nodes.len(), "loaded rule graph");
        Ok(graph)
    }

    fn save_rule(&mut self, id: &RuleId, graph: &GraphDto) -> Result<(), StorageError> {
        let path = self.graph_path(id)?;
        self.require_rule(id)?;
        let text = serde_json::to_string_pretty(graph)?;

        let staging = path.with_extension("json.tmp");
        let written = fs::write(&staging, text)
            .map_err(|e| StorageError::io(&staging, e))
            .and_then(|()| fs::rename(&staging, &path).map_err(|e| StorageError::io(&path, e)));
        if let Err(e) = written {
            Self::discard(&staging);
            return Err(e);
        }

        tracing::debug!(rule = %id, path = %path.display(), nodes = graph.nodes.len(), "saved rule graph");
        Ok(())
    }

    fn operator_catalog(&self) -> Result<OperatorCatalog, StorageError> {
        let path = self.root.join(CATALOG_FILE);
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn seeded() -> (tempfile::TempDir, JsonDirStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(RULES_FILE),
            json!([
                {"id": "r1", "name": "Only active users", "status": "DRAFT"},
                {"id": "r2", "name": "Nightly", "description": "runs at night"}
            ])
            .to_string(),
        )
        .unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            JsonDirStore::open(&file),
            Err(StorageError::InvalidStore { .. })
        ));
    }

    #[test]
    fn test_empty_directory_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.list_rules().unwrap().is_empty());
        assert!(store.operator_catalog().unwrap().is_empty());
    }

    #[test]
    fn test_list_rules_reads_metadata() {
        let (_dir, store) = seeded();
        let rules = store.list_rules().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].status, "DRAFT");
        assert_eq!(rules[1].description, "runs at night");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (dir, mut store) = seeded();
        let id = RuleId::from("r1");
        assert!(store.load_rule(&id).unwrap().is_empty());

        let graph: GraphDto = serde_json::from_value(json!({
            "nodes": [{"id": "1", "point": {"x": 1.0, "y": 2.0}, "type": "FINAL", "data": {}}],
            "edges": []
        }))
        .unwrap();
        store.save_rule(&id, &graph).unwrap();

        assert!(dir.path().join("r1.graph.json").exists());
        assert!(!dir.path().join("r1.graph.json.tmp").exists());
        assert_eq!(store.load_rule(&id).unwrap(), graph);
    }

    #[test]
    fn test_failed_save_leaves_no_staging_file() {
        let (dir, mut store) = seeded();
        // A non-empty directory in place of the graph file makes the rename fail.
        let target = dir.path().join("r1.graph.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), "x").unwrap();

        let result = store.save_rule(&RuleId::from("r1"), &GraphDto::default());
        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(!dir.path().join("r1.graph.json.tmp").exists());
    }

    #[test]
    fn test_unknown_rule_is_not_found() {
        let (_dir, mut store) = seeded();
        let id = RuleId::from("r9");
        assert!(matches!(
            store.load_rule(&id),
            Err(StorageError::RuleNotFound(_))
        ));
        assert!(matches!(
            store.save_rule(&id, &GraphDto::default()),
            Err(StorageError::RuleNotFound(_))
        ));
    }

    #[test]
    fn test_path_like_ids_are_refused() {
        let (_dir, store) = seeded();
        for bad in ["../r1", "a/b", "", ".hidden"] {
            assert!(
                matches!(
                    store.load_rule(&RuleId::from(bad)),
                    Err(StorageError::InvalidRuleId(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let (dir, store) = seeded();
        fs::write(dir.path().join(CATALOG_FILE), "{oops").unwrap();
        assert!(matches!(
            store.operator_catalog(),
            Err(StorageError::Serialization(_))
        ));
    }
}
