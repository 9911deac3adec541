//! Hierarchical command-tree resolution.
//!
//! This crate resolves textual or preparsed command input against a tree of
//! command groups and commands:
//!
//! - [`Tokenizer`]: splits a raw command string into long names, short names
//!   and values, honoring quoted runs.
//! - [`ParameterShape`]: the structural contract of one parameter
//!   (positional, named or switch) and how it claims tokens or map entries.
//! - [`CommandTree`]: an immutable arena of [`GroupNode`]s and
//!   [`CommandNode`]s, built once by [`TreeBuilder`] from plain descriptor
//!   structs.
//! - [`CommandTree::search`] and [`CommandTree::search_preparsed`]: return
//!   every [`BoundCommandNode`] whose path and overload accept the input.
//!
//! Searches never fail: an empty result means nothing matched. Conversion of
//! bound raw strings into typed values is left to the caller through
//! [`BoundCommandNode::prepare`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = TreeBuilder::new()
//!     .group(
//!         GroupDescriptor::new("mod").with_alias("m").with_command(
//!             CommandDescriptor::new("ban").with_overload(
//!                 OverloadDescriptor::new()
//!                     .with_parameter(ParameterDescriptor::positional("user"))
//!                     .with_parameter(
//!                         ParameterDescriptor::named("reason", Some('r'), Some("reason"))
//!                             .optional(),
//!                     ),
//!             ),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let matches = tree.search("m ban alice --reason spam", &SearchOptions::default());
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].path(), ["mod", "ban"]);
//! assert_eq!(matches[0].parameter("user").unwrap().values(), ["alice"]);
//! assert_eq!(matches[0].parameter("reason").unwrap().values(), ["spam"]);
//! ```

mod bound;
mod builder;
mod options;
mod search;
mod shape;
mod token;
mod tree;
mod validate;

pub use bound::{BoundCommandNode, BoundParameter, PreparedCommand};
pub use builder::{
    CommandDescriptor, GroupDescriptor, NodeDescriptor, OverloadDescriptor, ParameterDescriptor,
    ParameterKind, TreeBuilder,
};
pub use options::{KeyComparison, SearchOptions, TrailingPolicy};
pub use search::NamedValues;
pub use shape::{MapMatch, ParameterShape, ShapeKind, ShapeName, TokenMatch, ValueType};
pub use token::{Token, TokenKind, Tokenizer};
pub use tree::{CommandNode, CommandTree, GroupNode, Node, NodeId, Overload};
pub use validate::{ValidationError, validate_nodes};
