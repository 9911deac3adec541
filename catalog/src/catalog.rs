//! Catalog loading with builder pattern and fallback chains.
//!
//! A catalog file holds top-level node descriptors in JSON or YAML:
//!
//! ```yaml
//! version: "1.0"
//! name: moderation
//! nodes:
//!   - group:
//!       key: mod
//!       aliases: [m]
//!       children:
//!         - command:
//!             key: kick
//!             overloads:
//!               - parameters:
//!                   - { kind: positional, name: user }
//!                   - { kind: named, name: reason, short: r, optional: true }
//! ```
//!
//! # Loading patterns
//!
//! ```no_run
//! use command_tree_catalog::Catalog;
//!
//! // Single file, format chosen by extension
//! let catalog = Catalog::from_file("commands/moderation.yaml").unwrap();
//!
//! // Every catalog file of a directory, merged in file-name order
//! let catalog = Catalog::from_dir("commands/").unwrap();
//!
//! // Fallback chain: first source that loads wins
//! let catalog = Catalog::builder()
//!     .from_dir("/etc/bot/commands/")
//!     .from_file("commands.json")
//!     .build()
//!     .unwrap();
//!
//! let tree = catalog.build_tree().unwrap();
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use command_tree_core::{CommandTree, NodeDescriptor, TreeBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::with::singleton_map_recursive;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// On-disk catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Format version; only `1.x` is accepted.
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level groups and commands in declaration order.
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
}

impl CatalogFile {
    /// Creates an empty version `1.0` catalog.
    pub fn new() -> Self {
        Self {
            version: "1.0".into(),
            name: None,
            description: None,
            nodes: Vec::new(),
        }
    }

    /// Writes the catalog, choosing JSON or YAML by extension.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedFormat`] for unknown extensions, or
    /// an I/O or serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        match format {
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
            Format::Yaml => write_yaml(writer, self)?,
        }
        Ok(())
    }
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Describes where a [`Catalog`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A single catalog file.
    File(PathBuf),
    /// Every catalog file of a directory.
    Directory(PathBuf),
    /// Several catalogs merged, or a fallback chain.
    Multiple(Vec<CatalogSource>),
}

/// Node descriptors gathered from one or more catalog files.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: Option<String>,
    description: Option<String>,
    nodes: Vec<NodeDescriptor>,
    source: CatalogSource,
}

impl Catalog {
    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Loads a single `.json`, `.yaml` or `.yml` catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedFormat`] for other extensions,
    /// [`CatalogError::UnsupportedVersion`] if the version is not `1.x`, or an
    /// I/O or parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = read_catalog_file(path)?;
        debug!(path = %path.display(), nodes = file.nodes.len(), "Loaded catalog file");

        Ok(Self {
            name: file.name,
            description: file.description,
            nodes: file.nodes,
            source: CatalogSource::File(path.to_path_buf()),
        })
    }

    /// Loads every catalog file of a directory, in file-name order.
    ///
    /// Files with other extensions are ignored. Subdirectories are not
    /// scanned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`] if the directory cannot be read, or
    /// the first error from loading one of its files.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();

        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && Format::of(&file_path).is_ok() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut nodes = Vec::new();
        for file_path in &files {
            nodes.extend(read_catalog_file(file_path)?.nodes);
        }
        debug!(path = %path.display(), files = files.len(), nodes = nodes.len(), "Loaded catalog directory");

        Ok(Self {
            name: None,
            description: None,
            nodes,
            source: CatalogSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads a directory with [`from_dir`](Self::from_dir) or anything else
    /// with [`from_file`](Self::from_file).
    ///
    /// # Errors
    ///
    /// See the two loaders.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Concatenates catalogs in order.
    ///
    /// Sibling keys may repeat across catalogs; they become duplicate routing
    /// candidates rather than overrides.
    pub fn merge(catalogs: impl IntoIterator<Item = Catalog>) -> Self {
        let mut nodes = Vec::new();
        let mut sources = Vec::new();
        for catalog in catalogs {
            nodes.extend(catalog.nodes);
            sources.push(catalog.source);
        }

        Self {
            name: None,
            description: None,
            nodes,
            source: CatalogSource::Multiple(sources),
        }
    }

    /// Validates the descriptors and builds an immutable [`CommandTree`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidTree`] with the first violation found.
    pub fn build_tree(&self) -> Result<CommandTree> {
        let tree = TreeBuilder::new().nodes(self.nodes.iter().cloned()).build()?;
        Ok(tree)
    }

    /// Catalog name, when loaded from a single named file.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Top-level descriptors in load order.
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    /// Returns the number of top-level descriptors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the catalog declares no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

fn read_catalog_file(path: &Path) -> Result<CatalogFile> {
    let format = Format::of(path)?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let file: CatalogFile = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::Yaml => read_yaml(reader)?,
    };
    check_version(&file.version)?;
    Ok(file)
}

/// Reads YAML where enum variants are single-key maps (`- group: {...}`)
/// rather than `!group` tags.
pub(crate) fn read_yaml<T: DeserializeOwned>(reader: impl std::io::Read) -> Result<T> {
    let value =
        singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_reader(reader))?;
    Ok(value)
}

/// Writes YAML in the same single-key-map form [`read_yaml`] accepts.
pub(crate) fn write_yaml<T: Serialize>(writer: impl std::io::Write, value: &T) -> Result<()> {
    let mut serializer = serde_yaml::Serializer::new(writer);
    singleton_map_recursive::serialize(value, &mut serializer)?;
    Ok(())
}

/// Accepts `1` and any `1.x` version string.
pub(crate) fn check_version(version: &str) -> Result<()> {
    let major = version.split('.').next().unwrap_or_default();
    if major == "1" {
        Ok(())
    } else {
        Err(CatalogError::UnsupportedVersion(version.to_string()))
    }
}

/// Builder for constructing a [`Catalog`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`CatalogError::NoSourcesAvailable`] is returned.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single catalog file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::File(path.into()));
        self
    }

    /// Adds a directory of catalog files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Directory(path.into()));
        self
    }

    /// Attempts to load from configured sources in order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoSourcesAvailable`] if no source loads.
    pub fn build(self) -> Result<Catalog> {
        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                CatalogSource::File(path) => Catalog::from_file(path),
                CatalogSource::Directory(path) => Catalog::from_dir(path),
                CatalogSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut catalog) => {
                    catalog.source = CatalogSource::Multiple(all_sources);
                    return Ok(catalog);
                }
                Err(err) => debug!(source = ?source, error = %err, "Catalog source failed"),
            }
        }

        Err(CatalogError::NoSourcesAvailable)
    }
}
