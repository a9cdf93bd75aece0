//! Session configuration.
//!
//! Reads configuration the same way everywhere:
//! - `RULEGRAPH_CONFIG`: path of a JSON config file (optional; built-in
//!   defaults otherwise)
//!
//! A config file may list footprints for only some categories; the rest keep
//! their built-in size.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rulegraph_core::types::NodeCategory;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RULEGRAPH_CONFIG";

/// Rendered size of a node, used to centre new nodes on the drop point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub const fn new(width: f64, height: f64) -> Self {
        Footprint { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Per-category node footprints.
    pub footprints: BTreeMap<NodeCategory, Footprint>,
    /// Footprint for a category missing from `footprints`.
    pub default_footprint: Footprint,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let footprints = [
            (NodeCategory::Provider, Footprint::new(200.0, 60.0)),
            (NodeCategory::Constant, Footprint::new(160.0, 50.0)),
            (NodeCategory::Logic, Footprint::new(180.0, 80.0)),
            (NodeCategory::Final, Footprint::new(120.0, 60.0)),
            (NodeCategory::Schema, Footprint::new(240.0, 160.0)),
            (NodeCategory::Config, Footprint::new(200.0, 100.0)),
        ]
        .into_iter()
        .collect();
        SessionConfig {
            footprints,
            default_footprint: Footprint::new(150.0, 50.0),
        }
    }
}

/// Errors loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl SessionConfig {
    /// The footprint new nodes of `category` are given.
    pub fn footprint(&self, category: NodeCategory) -> Footprint {
        self.footprints
            .get(&category)
            .copied()
            .unwrap_or(self.default_footprint)
    }

    /// Loads a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SessionConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.with_builtin_footprints())
    }

    /// Loads the file named by `RULEGRAPH_CONFIG`, or the defaults if unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(SessionConfig::default()),
        }
    }

    fn with_builtin_footprints(mut self) -> Self {
        for (category, footprint) in SessionConfig::default().footprints {
            self.footprints.entry(category).or_insert(footprint);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_category() {
        let config = SessionConfig::default();
        for category in NodeCategory::ALL {
            assert!(config.footprints.contains_key(&category), "{category}");
        }
        assert_eq!(
            config.footprint(NodeCategory::Logic),
            Footprint::new(180.0, 80.0)
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"footprints": {"FINAL": {"width": 300, "height": 90}}}"#,
        )
        .unwrap();

        let config = SessionConfig::from_path(&path).unwrap();
        assert_eq!(
            config.footprint(NodeCategory::Final),
            Footprint::new(300.0, 90.0)
        );
        assert_eq!(
            config.footprint(NodeCategory::Constant),
            Footprint::new(160.0, 50.0)
        );
        assert_eq!(config.default_footprint, Footprint::new(150.0, 50.0));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_category_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"footprints": {"WIDGET": {"width": 1, "height": 1}}}"#)
            .unwrap();
        let err = SessionConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
