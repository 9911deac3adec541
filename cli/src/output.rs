//! Serializable views of search results and tree listings.

use command_tree_core::{BoundCommandNode, CommandTree, ShapeKind, ValueType};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// One bound parameter of a match.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterReport {
    pub name: String,
    pub hint: String,
    pub kind: &'static str,
    pub value_type: ValueType,
    pub supplied: bool,
    pub values: Vec<String>,
}

/// One accepted overload.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub path: Vec<String>,
    pub command: String,
    pub overload: usize,
    pub signature: String,
    pub consumed: usize,
    pub parameters: Vec<ParameterReport>,
}

impl From<&BoundCommandNode<'_>> for MatchReport {
    fn from(bound: &BoundCommandNode<'_>) -> Self {
        let parameters = bound
            .parameters()
            .iter()
            .map(|p| ParameterReport {
                name: p.shape().parameter_name().to_string(),
                hint: p.shape().hint_name().into_owned(),
                kind: match p.shape().kind() {
                    ShapeKind::Positional => "positional",
                    ShapeKind::Named(_) => "named",
                    ShapeKind::Switch(_) => "switch",
                },
                value_type: p.value_type().clone(),
                supplied: p.is_supplied(),
                values: p.values().to_vec(),
            })
            .collect();

        Self {
            path: bound.path().iter().map(|s| s.to_string()).collect(),
            command: bound.command().key().to_string(),
            overload: bound.overload_index(),
            signature: bound.overload().signature(),
            consumed: bound.consumed(),
            parameters,
        }
    }
}

/// Matches for one line of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub input: String,
    pub matches: Vec<MatchReport>,
}

/// One command of a tree listing.
#[derive(Debug, Clone, Serialize)]
pub struct CommandListing {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attached: bool,
    pub overloads: Vec<String>,
}

/// Lists every command of `tree` in declaration order.
pub fn list_commands(tree: &CommandTree) -> Vec<CommandListing> {
    tree.commands()
        .map(|(id, command)| CommandListing {
            path: tree.path(id).join(" "),
            aliases: command.aliases().to_vec(),
            description: command.description().map(String::from),
            attached: command.is_attached(),
            overloads: command.overloads().iter().map(|o| o.signature()).collect(),
        })
        .collect()
}

/// Serializes `value` as JSON or YAML.
pub fn format_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml | OutputFormat::Table => {
            to_yaml_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Writes enum variants as single-key maps (`choice: [...]`), matching the
/// catalog YAML form.
fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    let mut buf = Vec::new();
    {
        let mut serializer = serde_yaml::Serializer::new(&mut buf);
        serde_yaml::with::singleton_map_recursive::serialize(value, &mut serializer)?;
    }
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

/// Formats search matches.
pub fn format_matches(matches: &[MatchReport], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(matches_to_table(matches)),
        _ => format_structured(&matches, format),
    }
}

/// Formats batch results.
pub fn format_batch(entries: &[BatchEntry], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => {
            let mut out = String::new();
            for entry in entries {
                out.push_str(&format!("> {}\n", entry.input));
                out.push_str(&matches_to_table(&entry.matches));
            }
            Ok(out)
        }
        _ => format_structured(&entries, format),
    }
}

/// Formats a tree listing.
pub fn format_listing(listing: &[CommandListing], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(listing_to_table(listing)),
        _ => format_structured(&listing, format),
    }
}

fn matches_to_table(matches: &[MatchReport]) -> String {
    if matches.is_empty() {
        return "  (no match)\n".to_string();
    }

    let mut out = String::new();
    for m in matches {
        out.push_str(&format!("  {} #{}", m.path.join(" "), m.overload));
        for p in &m.parameters {
            if p.supplied {
                out.push_str(&format!("  {}={}", p.name, p.values.join(",")));
            }
        }
        out.push('\n');
    }
    out
}

fn listing_to_table(listing: &[CommandListing]) -> String {
    let mut out = String::new();
    for command in listing {
        for overload in &command.overloads {
            if overload.is_empty() {
                out.push_str(&format!("{}\n", command.path));
            } else {
                out.push_str(&format!("{} {overload}\n", command.path));
            }
        }
        if let Some(ref desc) = command.description {
            out.push_str(&format!("    {desc}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_tree_core::{
        CommandDescriptor, GroupDescriptor, OverloadDescriptor, ParameterDescriptor,
        SearchOptions, TreeBuilder,
    };

    fn tree() -> CommandTree {
        TreeBuilder::new()
            .group(
                GroupDescriptor::new("mod").with_command(
                    CommandDescriptor::new("kick")
                        .with_description("Remove a member")
                        .with_overload(
                            OverloadDescriptor::new()
                                .with_parameter(ParameterDescriptor::positional("user"))
                                .with_parameter(
                                    ParameterDescriptor::switch("silent", Some('s'), None)
                                        .optional(),
                                ),
                        ),
                ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_match_report_from_bound() {
        let tree = tree();
        let matches = tree.search("mod kick bob", &SearchOptions::default());
        let report = MatchReport::from(&matches[0]);

        assert_eq!(report.path, vec!["mod", "kick"]);
        assert_eq!(report.signature, "<user> [-s]");
        assert_eq!(report.parameters[0].kind, "positional");
        assert_eq!(report.parameters[0].values, vec!["bob"]);
        assert_eq!(report.parameters[1].hint, "s");
        assert!(!report.parameters[1].supplied);
    }

    #[test]
    fn test_table_skips_omitted_parameters() {
        let tree = tree();
        let matches: Vec<MatchReport> = tree
            .search("mod kick bob", &SearchOptions::default())
            .iter()
            .map(MatchReport::from)
            .collect();

        let table = format_matches(&matches, OutputFormat::Table).unwrap();
        assert_eq!(table, "  mod kick #0  user=bob\n");
        assert_eq!(format_matches(&[], OutputFormat::Table).unwrap(), "  (no match)\n");
    }

    #[test]
    fn test_listing_table() {
        let listing = list_commands(&tree());
        assert_eq!(
            format_listing(&listing, OutputFormat::Table).unwrap(),
            "mod kick <user> [-s]\n    Remove a member\n"
        );
    }

    #[test]
    fn test_yaml_value_type_is_a_plain_map() {
        let report = ParameterReport {
            name: "length".into(),
            hint: "length".into(),
            kind: "named",
            value_type: ValueType::Choice(vec!["short".into(), "long".into()]),
            supplied: true,
            values: vec!["short".into()],
        };

        let yaml = format_structured(&report, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("value_type:\n  choice:"), "yaml: {yaml}");
        assert!(!yaml.contains('!'), "yaml: {yaml}");
    }

    #[test]
    fn test_structured_matches_are_json_arrays() {
        let json = format_matches(&[], OutputFormat::Json).unwrap();
        assert_eq!(json, "[]");
    }
}
