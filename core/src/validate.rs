//! Descriptor validation.
//!
//! Checks the structural invariants of builder input before a tree is
//! built: non-empty keys without whitespace, at least one overload per
//! command, well-formed and unique parameter names.
//!
//! Duplicate routing keys across sibling nodes are legal; they surface as
//! multiple search results instead.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let good = vec![NodeDescriptor::Command(
//!     CommandDescriptor::new("ping").with_overload(OverloadDescriptor::new()),
//! )];
//! assert!(validate_nodes(&good).is_empty());
//!
//! // A command with no overloads can never match
//! let bad = vec![NodeDescriptor::Command(CommandDescriptor::new("ping"))];
//! assert_eq!(
//!     validate_nodes(&bad),
//!     vec![ValidationError::NoOverloads("ping".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::builder::{
    CommandDescriptor, GroupDescriptor, NodeDescriptor, OverloadDescriptor, ParameterKind,
};

/// Tree construction errors.
///
/// Paths are the space-separated primary keys leading to the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A group or command key is empty or whitespace-only.
    #[error("empty key under path: {0:?}")]
    EmptyKey(String),
    /// A key or alias contains whitespace and could never be typed as one token.
    #[error("key or alias contains whitespace: {0:?}")]
    InvalidKey(String),
    /// A command declares no overloads.
    #[error("command has no overloads: {0}")]
    NoOverloads(String),
    /// A named or switch parameter has neither a short nor a long name.
    #[error("parameter {parameter} of {command} must define a short or long name")]
    MissingParameterName { command: String, parameter: String },
    /// Short name is whitespace or `-`.
    #[error("invalid short name {name:?} in {command}")]
    InvalidShortName { command: String, name: char },
    /// Long name is empty, starts with `-`, or contains whitespace.
    #[error("invalid long name {name:?} in {command}")]
    InvalidLongName { command: String, name: String },
    /// Two named/switch parameters of one overload share a name.
    #[error("duplicate parameter name {name:?} in overload of {command}")]
    DuplicateParameterName { command: String, name: String },
}

/// Validates top-level descriptors and everything beneath them.
///
/// Stops at the first problem, so the result holds at most one error.
pub fn validate_nodes(nodes: &[NodeDescriptor]) -> Vec<ValidationError> {
    let mut path = Vec::new();
    validate_children(nodes, &mut path)
}

fn validate_children(nodes: &[NodeDescriptor], path: &mut Vec<String>) -> Vec<ValidationError> {
    for node in nodes {
        let errors = match node {
            NodeDescriptor::Group(group) => validate_group(group, path),
            NodeDescriptor::Command(command) => validate_command(command, path),
        };
        if !errors.is_empty() {
            return errors;
        }
    }
    Vec::new()
}

fn validate_group(group: &GroupDescriptor, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = validate_keys(&group.key, &group.aliases, path);
    if !errors.is_empty() {
        return errors;
    }

    path.push(group.key.clone());
    for command in &group.attached {
        errors.extend(validate_command(command, path));
        if !errors.is_empty() {
            break;
        }
    }
    if errors.is_empty() {
        errors.extend(validate_children(&group.children, path));
    }
    path.pop();

    errors
}

fn validate_command(command: &CommandDescriptor, path: &[String]) -> Vec<ValidationError> {
    let mut errors = validate_keys(&command.key, &command.aliases, path);
    if !errors.is_empty() {
        return errors;
    }

    let full_path = join_path(path, &command.key);
    if command.overloads.is_empty() {
        errors.push(ValidationError::NoOverloads(full_path));
        return errors;
    }

    for overload in &command.overloads {
        errors.extend(validate_overload(overload, &full_path));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_keys(key: &str, aliases: &[String], path: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if key.trim().is_empty() {
        errors.push(ValidationError::EmptyKey(path.join(" ")));
        return errors;
    }

    for candidate in std::iter::once(key).chain(aliases.iter().map(String::as_str)) {
        if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
            errors.push(ValidationError::InvalidKey(candidate.to_string()));
            return errors;
        }
    }

    errors
}

fn validate_overload(overload: &OverloadDescriptor, command: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_short = HashSet::new();
    let mut seen_long: HashSet<&str> = HashSet::new();

    for parameter in &overload.parameters {
        if parameter.kind == ParameterKind::Positional {
            continue;
        }

        if parameter.short.is_none() && parameter.long.is_none() {
            errors.push(ValidationError::MissingParameterName {
                command: command.to_string(),
                parameter: parameter.name.clone(),
            });
            return errors;
        }

        if let Some(short) = parameter.short {
            if short.is_whitespace() || short == '-' {
                errors.push(ValidationError::InvalidShortName {
                    command: command.to_string(),
                    name: short,
                });
                return errors;
            }
            if !seen_short.insert(short) {
                errors.push(ValidationError::DuplicateParameterName {
                    command: command.to_string(),
                    name: short.to_string(),
                });
                return errors;
            }
        }

        if let Some(long) = &parameter.long {
            if long.is_empty() || long.starts_with('-') || long.chars().any(char::is_whitespace) {
                errors.push(ValidationError::InvalidLongName {
                    command: command.to_string(),
                    name: long.clone(),
                });
                return errors;
            }
            if !seen_long.insert(long.as_str()) {
                errors.push(ValidationError::DuplicateParameterName {
                    command: command.to_string(),
                    name: long.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

fn join_path(path: &[String], key: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ParameterDescriptor;

    fn command_with(parameters: Vec<ParameterDescriptor>) -> Vec<NodeDescriptor> {
        let mut overload = OverloadDescriptor::new();
        overload.parameters = parameters;
        vec![NodeDescriptor::Group(GroupDescriptor::new("mod").with_command(
            CommandDescriptor::new("kick").with_overload(overload),
        ))]
    }

    #[test]
    fn test_accepts_duplicate_sibling_keys() {
        let nodes = vec![
            NodeDescriptor::Command(
                CommandDescriptor::new("ping").with_overload(OverloadDescriptor::new()),
            ),
            NodeDescriptor::Command(
                CommandDescriptor::new("ping").with_overload(OverloadDescriptor::new()),
            ),
        ];
        assert!(validate_nodes(&nodes).is_empty());
    }

    #[test]
    fn test_rejects_empty_group_key() {
        let nodes = vec![NodeDescriptor::Group(GroupDescriptor::new("  "))];
        assert_eq!(
            validate_nodes(&nodes),
            vec![ValidationError::EmptyKey(String::new())]
        );
    }

    #[test]
    fn test_rejects_whitespace_in_alias() {
        let nodes = vec![NodeDescriptor::Group(
            GroupDescriptor::new("admin").with_alias("ad min"),
        )];
        assert_eq!(
            validate_nodes(&nodes),
            vec![ValidationError::InvalidKey("ad min".into())]
        );
    }

    #[test]
    fn test_rejects_nameless_switch() {
        let errors = validate_nodes(&command_with(vec![ParameterDescriptor::switch(
            "silent", None, None,
        )]));
        assert_eq!(
            errors,
            vec![ValidationError::MissingParameterName {
                command: "mod kick".into(),
                parameter: "silent".into(),
            }]
        );
    }

    #[test]
    fn test_rejects_dashed_long_name() {
        let errors = validate_nodes(&command_with(vec![ParameterDescriptor::named(
            "reason",
            None,
            Some("--reason"),
        )]));
        assert_eq!(
            errors,
            vec![ValidationError::InvalidLongName {
                command: "mod kick".into(),
                name: "--reason".into(),
            }]
        );
    }

    #[test]
    fn test_rejects_dash_short_name() {
        let errors = validate_nodes(&command_with(vec![ParameterDescriptor::switch(
            "x",
            Some('-'),
            None,
        )]));
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidShortName { name: '-', .. }]
        ));
    }

    #[test]
    fn test_rejects_duplicate_names_within_overload() {
        let errors = validate_nodes(&command_with(vec![
            ParameterDescriptor::switch("silent", Some('s'), None),
            ParameterDescriptor::named("since", Some('s'), Some("since")),
        ]));
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateParameterName {
                command: "mod kick".into(),
                name: "s".into(),
            }]
        );
    }

    #[test]
    fn test_positional_names_are_not_checked() {
        let errors = validate_nodes(&command_with(vec![
            ParameterDescriptor::positional("user"),
            ParameterDescriptor::positional("user"),
        ]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_attached_commands_are_validated() {
        let nodes = vec![NodeDescriptor::Group(
            GroupDescriptor::new("config").with_attached(CommandDescriptor::new("show")),
        )];
        assert_eq!(
            validate_nodes(&nodes),
            vec![ValidationError::NoOverloads("config show".into())]
        );
    }
}
