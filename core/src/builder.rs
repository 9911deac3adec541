//! Descriptor structs and the tree builder.
//!
//! Descriptors are plain data: hosts can write them by hand, generate them,
//! or deserialize them from catalog files. [`TreeBuilder::build`] validates
//! them and lowers them into a frozen [`CommandTree`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = TreeBuilder::new()
//!     .group(
//!         GroupDescriptor::new("moderation")
//!             .with_alias("mod")
//!             .with_command(
//!                 CommandDescriptor::new("ban").with_overload(
//!                     OverloadDescriptor::new()
//!                         .with_parameter(ParameterDescriptor::positional("user"))
//!                         .with_parameter(
//!                             ParameterDescriptor::named("reason", Some('r'), Some("reason"))
//!                                 .optional(),
//!                         ),
//!                 ),
//!             ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let matches = tree.search("mod ban alice -r spam", &SearchOptions::default());
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].parameter("reason").unwrap().values(), ["spam"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::shape::{ParameterShape, ShapeName, ValueType};
use crate::tree::{CommandNode, CommandTree, GroupNode, Node, NodeId, Overload};
use crate::validate::{ValidationError, validate_nodes};

/// Kind of a parameter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Positional,
    Named,
    Switch,
}

/// Builder input for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Positional, named or switch.
    pub kind: ParameterKind,
    /// Name of the underlying parameter (diagnostics and hint fallback).
    pub name: String,
    /// Short form without the dash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long form without the dashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Whether the parameter has a default value.
    #[serde(default)]
    pub optional: bool,
    /// Declared value type tag.
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque attribute payloads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<serde_json::Value>,
    /// Opaque condition payloads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<serde_json::Value>,
}

impl ParameterDescriptor {
    fn new(kind: ParameterKind, name: &str, value_type: ValueType) -> Self {
        Self {
            kind,
            name: name.to_string(),
            short: None,
            long: None,
            optional: false,
            value_type,
            description: None,
            attributes: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// A required positional parameter of type [`ValueType::Any`].
    pub fn positional(name: &str) -> Self {
        Self::new(ParameterKind::Positional, name, ValueType::Any)
    }

    /// A required named parameter of type [`ValueType::Any`].
    pub fn named(name: &str, short: Option<char>, long: Option<&str>) -> Self {
        let mut descriptor = Self::new(ParameterKind::Named, name, ValueType::Any);
        descriptor.short = short;
        descriptor.long = long.map(String::from);
        descriptor
    }

    /// A required switch of type [`ValueType::Bool`].
    pub fn switch(name: &str, short: Option<char>, long: Option<&str>) -> Self {
        let mut descriptor = Self::new(ParameterKind::Switch, name, ValueType::Bool);
        descriptor.short = short;
        descriptor.long = long.map(String::from);
        descriptor
    }

    /// Marks as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the value type tag.
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends an opaque condition payload.
    pub fn with_condition(mut self, condition: serde_json::Value) -> Self {
        self.conditions.push(condition);
        self
    }

    fn lower(&self, command: &str) -> Result<ParameterShape, ValidationError> {
        let name = || {
            ShapeName::new(self.short, self.long.clone()).ok_or_else(|| {
                ValidationError::MissingParameterName {
                    command: command.to_string(),
                    parameter: self.name.clone(),
                }
            })
        };

        let mut shape = match self.kind {
            ParameterKind::Positional => {
                ParameterShape::positional(&self.name, self.value_type.clone())
            }
            ParameterKind::Named => {
                ParameterShape::named(&self.name, name()?, self.value_type.clone())
            }
            ParameterKind::Switch => {
                let shape = ParameterShape::switch(&self.name, name()?);
                // Descriptors loaded from files default to `Any`; keep the implied `Bool`.
                if self.value_type == ValueType::Any {
                    shape
                } else {
                    shape.with_value_type(self.value_type.clone())
                }
            }
        };

        if self.optional {
            shape = shape.optional();
        }
        if let Some(desc) = &self.description {
            shape = shape.with_description(desc);
        }
        for attribute in &self.attributes {
            shape = shape.with_attribute(attribute.clone());
        }
        for condition in &self.conditions {
            shape = shape.with_condition(condition.clone());
        }
        Ok(shape)
    }
}

/// Builder input for one overload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverloadDescriptor {
    /// Parameters in declared order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl OverloadDescriptor {
    /// An overload with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Builder input for one command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Primary routing key.
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accepted parameter lists.
    #[serde(default)]
    pub overloads: Vec<OverloadDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<serde_json::Value>,
}

impl CommandDescriptor {
    /// Creates a command with no overloads.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an overload.
    pub fn with_overload(mut self, overload: OverloadDescriptor) -> Self {
        self.overloads.push(overload);
        self
    }

    /// Appends an opaque condition payload.
    pub fn with_condition(mut self, condition: serde_json::Value) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Builder input for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// Primary routing key.
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child groups and commands, in routing order.
    #[serde(default)]
    pub children: Vec<NodeDescriptor>,
    /// Commands reached by this group's own key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached: Vec<CommandDescriptor>,
}

impl GroupDescriptor {
    /// Creates an empty group.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a nested group.
    pub fn with_group(mut self, group: GroupDescriptor) -> Self {
        self.children.push(NodeDescriptor::Group(group));
        self
    }

    /// Adds a child command.
    pub fn with_command(mut self, command: CommandDescriptor) -> Self {
        self.children.push(NodeDescriptor::Command(command));
        self
    }

    /// Attaches a command to the group's own key.
    pub fn with_attached(mut self, command: CommandDescriptor) -> Self {
        self.attached.push(command);
        self
    }
}

/// A group or a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDescriptor {
    Group(GroupDescriptor),
    Command(CommandDescriptor),
}

/// Collects top-level descriptors and builds a [`CommandTree`].
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeDescriptor>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level group.
    pub fn group(mut self, group: GroupDescriptor) -> Self {
        self.nodes.push(NodeDescriptor::Group(group));
        self
    }

    /// Adds a top-level command.
    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.nodes.push(NodeDescriptor::Command(command));
        self
    }

    /// Adds top-level descriptors of either kind.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeDescriptor>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Validates the descriptors and lowers them into a tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn build(self) -> Result<CommandTree, ValidationError> {
        if let Some(error) = validate_nodes(&self.nodes).into_iter().next() {
            return Err(error);
        }

        let root = NodeId(0);
        let mut nodes = vec![Node::Group(GroupNode {
            key: String::new(),
            aliases: Vec::new(),
            description: None,
            parent: None,
            children: Vec::new(),
            attached: Vec::new(),
        })];

        let children = lower_children(&mut nodes, &self.nodes, root, &[])?;
        if let Node::Group(group) = &mut nodes[root.0] {
            group.children = children;
        }

        tracing::debug!(nodes = nodes.len(), "Built command tree");
        Ok(CommandTree { nodes })
    }
}

fn lower_children(
    nodes: &mut Vec<Node>,
    descriptors: &[NodeDescriptor],
    parent: NodeId,
    path: &[&str],
) -> Result<Vec<NodeId>, ValidationError> {
    descriptors
        .iter()
        .map(|descriptor| match descriptor {
            NodeDescriptor::Group(group) => lower_group(nodes, group, parent, path),
            NodeDescriptor::Command(command) => {
                lower_command(nodes, command, parent, false, path)
            }
        })
        .collect()
}

fn lower_group(
    nodes: &mut Vec<Node>,
    descriptor: &GroupDescriptor,
    parent: NodeId,
    path: &[&str],
) -> Result<NodeId, ValidationError> {
    let id = NodeId(nodes.len());
    nodes.push(Node::Group(GroupNode {
        key: descriptor.key.clone(),
        aliases: descriptor.aliases.clone(),
        description: descriptor.description.clone(),
        parent: Some(parent),
        children: Vec::new(),
        attached: Vec::new(),
    }));

    let mut group_path = path.to_vec();
    group_path.push(&descriptor.key);

    let attached = descriptor
        .attached
        .iter()
        .map(|command| lower_command(nodes, command, id, true, &group_path))
        .collect::<Result<Vec<_>, _>>()?;
    let children = lower_children(nodes, &descriptor.children, id, &group_path)?;

    if let Node::Group(group) = &mut nodes[id.0] {
        group.attached = attached;
        group.children = children;
    }
    Ok(id)
}

fn lower_command(
    nodes: &mut Vec<Node>,
    descriptor: &CommandDescriptor,
    parent: NodeId,
    attached: bool,
    path: &[&str],
) -> Result<NodeId, ValidationError> {
    let full_path = path
        .iter()
        .copied()
        .chain(std::iter::once(descriptor.key.as_str()))
        .collect::<Vec<_>>()
        .join(" ");

    let overloads = descriptor
        .overloads
        .iter()
        .map(|overload| {
            let shapes = overload
                .parameters
                .iter()
                .map(|parameter| parameter.lower(&full_path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Overload { shapes })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let id = NodeId(nodes.len());
    nodes.push(Node::Command(CommandNode {
        key: descriptor.key.clone(),
        aliases: descriptor.aliases.clone(),
        description: descriptor.description.clone(),
        parent,
        attached,
        overloads,
        attributes: descriptor.attributes.clone(),
        conditions: descriptor.conditions.clone(),
    }));
    Ok(id)
}
