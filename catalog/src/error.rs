//! Error types for catalog and configuration loading.

use std::path::PathBuf;

use command_tree_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading catalogs or building trees from them.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Catalog or config declares a format version this crate cannot read.
    #[error("unsupported version {0:?} (expected 1.x)")]
    UnsupportedVersion(String),

    /// All configured catalog sources failed, or none were configured.
    #[error("no catalog sources available")]
    NoSourcesAvailable,

    /// Descriptors loaded but violate a tree invariant.
    #[error("invalid command tree: {0}")]
    InvalidTree(#[from] ValidationError),
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
