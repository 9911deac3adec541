//! Declarative catalogs and router configuration for command trees.
//!
//! This crate loads [`NodeDescriptor`](command_tree_core::NodeDescriptor)s
//! from JSON or YAML catalog files and turns them into a
//! [`CommandTree`](command_tree_core::CommandTree), and reads the YAML router
//! configuration that names those catalogs and the search options to use.
//!
//! # Quick start
//!
//! ```no_run
//! use command_tree_catalog::{Catalog, RouterConfig};
//!
//! // Load one catalog file and build a tree
//! let tree = Catalog::from_file("commands.yaml").unwrap().build_tree().unwrap();
//!
//! // Or let a router config list the catalogs and options
//! let config = RouterConfig::load("router.yml").unwrap();
//! let tree = config.load_catalog(".").unwrap().build_tree().unwrap();
//! for bound in tree.search("mod kick bob", &config.search) {
//!     println!("{}", bound.path().join(" "));
//! }
//! ```

mod catalog;
mod config;
mod error;

pub use catalog::{Catalog, CatalogBuilder, CatalogFile, CatalogSource};
pub use config::RouterConfig;
pub use error::{CatalogError, Result};
