//! Frozen command tree stored as an arena of nodes.
//!
//! Nodes refer to each other by [`NodeId`]. The tree is only ever produced by
//! [`TreeBuilder`](crate::TreeBuilder) and is immutable afterwards, so a
//! `&CommandTree` can be shared across any number of concurrent searches.

use serde::{Deserialize, Serialize};

use crate::options::KeyComparison;
use crate::shape::ParameterShape;

/// Index of a node inside a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One accepted parameter list of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Overload {
    pub(crate) shapes: Vec<ParameterShape>,
}

impl Overload {
    /// Shapes in declared order.
    pub fn shapes(&self) -> &[ParameterShape] {
        &self.shapes
    }

    /// Space-separated usage fragments, e.g. `<user> [-r|--reason <reason>]`.
    pub fn signature(&self) -> String {
        self.shapes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A routable command with one or more overloads.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub(crate) key: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) parent: NodeId,
    pub(crate) attached: bool,
    pub(crate) overloads: Vec<Overload>,
    pub(crate) attributes: Vec<serde_json::Value>,
    pub(crate) conditions: Vec<serde_json::Value>,
}

impl CommandNode {
    /// Primary key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Group that owns this command.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Whether the command is reached through its group's own key rather
    /// than a key of its own.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    /// Opaque attribute payloads for the host.
    pub fn attributes(&self) -> &[serde_json::Value] {
        &self.attributes
    }

    /// Opaque condition payloads for the external evaluator.
    pub fn conditions(&self) -> &[serde_json::Value] {
        &self.conditions
    }
}

/// A routing level holding child groups and commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub(crate) key: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attached: Vec<NodeId>,
}

impl GroupNode {
    /// Primary key; empty for the root.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Enclosing group, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child groups and commands in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Commands reached by this group's own key.
    pub fn attached(&self) -> &[NodeId] {
        &self.attached
    }
}

/// A node of the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(GroupNode),
    Command(CommandNode),
}

impl Node {
    pub fn key(&self) -> &str {
        match self {
            Self::Group(group) => &group.key,
            Self::Command(command) => &command.key,
        }
    }

    pub fn aliases(&self) -> &[String] {
        match self {
            Self::Group(group) => &group.aliases,
            Self::Command(command) => &command.aliases,
        }
    }

    /// Returns `true` if `text` equals the primary key or any alias.
    pub fn matches_key(&self, text: &str, comparison: KeyComparison) -> bool {
        comparison.eq_str(self.key(), text)
            || self
                .aliases()
                .iter()
                .any(|alias| comparison.eq_str(alias, text))
    }
}

/// Immutable command catalog.
///
/// Index `0` is always the synthetic root group, which has an empty key and
/// is never matched against input.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = TreeBuilder::new()
///     .group(
///         GroupDescriptor::new("admin")
///             .with_command(CommandDescriptor::new("ban").with_overload(OverloadDescriptor::new())),
///     )
///     .build()
///     .unwrap();
///
/// let (id, ban) = tree.commands().next().unwrap();
/// assert_eq!(ban.key(), "ban");
/// assert_eq!(tree.path(id), vec!["admin", "ban"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTree {
    pub(crate) nodes: Vec<Node>,
}

impl CommandTree {
    /// Id of the root group.
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// The root group.
    pub fn root(&self) -> &GroupNode {
        match &self.nodes[0] {
            Node::Group(group) => group,
            Node::Command(_) => unreachable!("tree root is always a group"),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn group(&self, id: NodeId) -> Option<&GroupNode> {
        match self.node(id)? {
            Node::Group(group) => Some(group),
            Node::Command(_) => None,
        }
    }

    pub fn command(&self, id: NodeId) -> Option<&CommandNode> {
        match self.node(id)? {
            Node::Command(command) => Some(command),
            Node::Group(_) => None,
        }
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; the root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every command in arena (pre-order) order.
    pub fn commands(&self) -> impl Iterator<Item = (NodeId, &CommandNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| match node {
                Node::Command(command) => Some((NodeId(idx), command)),
                Node::Group(_) => None,
            })
    }

    /// Primary keys a user types to reach `id`, starting below the root.
    ///
    /// Attached commands share their group's path.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            current = match self.node(node_id) {
                Some(Node::Command(command)) => {
                    if !command.attached {
                        path.push(command.key.as_str());
                    }
                    Some(command.parent)
                }
                Some(Node::Group(group)) => {
                    if group.parent.is_some() {
                        path.push(group.key.as_str());
                    }
                    group.parent
                }
                None => None,
            };
        }

        path.reverse();
        path
    }
}
