//! Router configuration.
//!
//! Names the catalogs that make up a command tree and the search options used
//! against it.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! catalogs:
//!   - commands/core.yaml
//!   - commands/plugins/
//! search:
//!   key_comparison: case_insensitive
//!   trailing: reject
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use command_tree_core::SearchOptions;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, check_version, read_yaml, write_yaml};
use crate::error::{CatalogError, Result};

/// Top-level router configuration.
///
/// # Examples
///
/// ```no_run
/// use command_tree_catalog::RouterConfig;
///
/// let config = RouterConfig::load("router.yml").unwrap();
/// let tree = config.load_catalog(".").unwrap().build_tree().unwrap();
/// let matches = tree.search("mod kick bob", &config.search);
/// println!("{} match(es)", matches.len());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Catalog files or directories, merged in order.
    #[serde(default)]
    pub catalogs: Vec<PathBuf>,
    /// Options applied to every search.
    #[serde(default)]
    pub search: SearchOptions,
}

impl RouterConfig {
    /// Creates a version `1.0` configuration with default search options.
    pub fn new(catalogs: Vec<PathBuf>) -> Self {
        Self {
            version: "1.0".into(),
            catalogs,
            search: SearchOptions::default(),
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](CatalogError::IoError) if the file cannot be read,
    /// [`YamlError`](CatalogError::YamlError) if parsing fails, or
    /// [`UnsupportedVersion`](CatalogError::UnsupportedVersion).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = read_yaml(reader)?;
        check_version(&config.version)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](CatalogError::IoError) if the file cannot be
    /// written, or [`YamlError`](CatalogError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        write_yaml(writer, self)?;
        Ok(())
    }

    /// Catalog paths with relative entries resolved against `base_dir`.
    pub fn catalog_paths(&self, base_dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let base_dir = base_dir.as_ref();
        self.catalogs
            .iter()
            .map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    base_dir.join(path)
                }
            })
            .collect()
    }

    /// Loads and merges every configured catalog.
    ///
    /// Relative paths are resolved against `base_dir`, usually the directory
    /// holding the config file.
    ///
    /// # Errors
    ///
    /// Returns [`NoSourcesAvailable`](CatalogError::NoSourcesAvailable) when
    /// no catalogs are configured, or the first load error.
    pub fn load_catalog(&self, base_dir: impl AsRef<Path>) -> Result<Catalog> {
        if self.catalogs.is_empty() {
            return Err(CatalogError::NoSourcesAvailable);
        }

        let catalogs = self
            .catalog_paths(base_dir)
            .into_iter()
            .map(Catalog::load)
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog::merge(catalogs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_tree_core::{KeyComparison, TrailingPolicy};

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
catalogs:
  - core.yaml
  - /opt/plugins/
search:
  key_comparison: case_insensitive
  trailing: reject
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: RouterConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.catalogs.len(), 2);
        assert_eq!(config.search.key_comparison, KeyComparison::CaseInsensitive);
        assert_eq!(config.search.trailing, TrailingPolicy::Reject);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: RouterConfig = serde_yaml::from_str("version: \"1\"\n").unwrap();
        assert!(config.catalogs.is_empty());
        assert_eq!(config.search, SearchOptions::default());
    }

    #[test]
    fn test_catalog_paths_resolve_relative_entries() {
        let config: RouterConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let paths = config.catalog_paths("/etc/bot");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/bot/core.yaml"),
                PathBuf::from("/opt/plugins/")
            ]
        );
    }

    #[test]
    fn test_load_catalog_requires_sources() {
        let config = RouterConfig::new(Vec::new());
        assert!(matches!(
            config.load_catalog("."),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_load_rejects_other_major_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.yml");
        std::fs::write(&path, "version: \"0.9\"\n").unwrap();

        assert!(matches!(
            RouterConfig::load(&path),
            Err(CatalogError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.yml");

        let original: RouterConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = RouterConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
