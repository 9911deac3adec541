//! Tree search: routing input through groups and binding command overloads.
//!
//! Two entry points share the same routing rules:
//!
//! - [`CommandTree::search`] tokenizes a raw command string.
//! - [`CommandTree::search_preparsed`] takes named values as a map and
//!   routing keys plus positional values as an ordered list.
//!
//! At each level every child whose key or alias matches is explored; there is
//! no short-circuit, so ambiguous input yields several results. A matching
//! group is both descended into and tried as a terminus for its attached
//! commands at the same input position.
//!
//! Every overload of a candidate command is attempted independently and ends
//! in one of: accepted, rejected as fatal (named arity mismatch), rejected as
//! incomplete (a required shape is missing), or rejected for trailing input
//! under [`TrailingPolicy::Reject`]. Only accepted attempts are returned.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::bound::{BoundCommandNode, BoundParameter};
use crate::options::{SearchOptions, TrailingPolicy};
use crate::shape::{MapMatch, ParameterShape};
use crate::token::{TokenKind, Tokenizer};
use crate::tree::{CommandNode, CommandTree, GroupNode, Node, NodeId, Overload};

/// Preparsed named values, keyed by parameter name without dashes.
///
/// Ordered so that searches visit entries deterministically.
pub type NamedValues = BTreeMap<String, Vec<String>>;

/// Terminal state of one overload attempt.
#[derive(Debug)]
enum Attempt<'t> {
    Accepted {
        parameters: Vec<BoundParameter<'t>>,
        consumed: usize,
    },
    Fatal,
    Incomplete,
    Trailing,
}

impl CommandTree {
    /// Resolves a raw command string.
    ///
    /// Returns every accepted overload along every matching path, in tree
    /// declaration order. An empty result means nothing matched.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::*;
    ///
    /// let tree = TreeBuilder::new()
    ///     .group(
    ///         GroupDescriptor::new("a")
    ///             .with_command(CommandDescriptor::new("e").with_overload(OverloadDescriptor::new()))
    ///             .with_command(CommandDescriptor::new("f").with_overload(OverloadDescriptor::new())),
    ///     )
    ///     .build()
    ///     .unwrap();
    ///
    /// let options = SearchOptions::default();
    /// assert_eq!(tree.search("a e", &options)[0].command().key(), "e");
    /// assert!(tree.search("a z", &options).is_empty());
    /// ```
    pub fn search(&self, input: &str, options: &SearchOptions) -> Vec<BoundCommandNode<'_>> {
        let mut results = Vec::new();
        self.route_tokens(self.root(), Tokenizer::new(input), 0, options, &mut results);
        debug!(input, matches = results.len(), "Raw search finished");
        results
    }

    /// Resolves preparsed input.
    ///
    /// `positional` starts with the routing keys (one per tree level) and
    /// continues with positional parameter values. Neither input is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::*;
    ///
    /// let tree = TreeBuilder::new()
    ///     .command(CommandDescriptor::new("kick").with_overload(
    ///         OverloadDescriptor::new()
    ///             .with_parameter(ParameterDescriptor::positional("user"))
    ///             .with_parameter(ParameterDescriptor::named("reason", Some('r'), None)),
    ///     ))
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut named = NamedValues::new();
    /// named.insert("r".into(), vec!["spam".into()]);
    /// let positional = vec!["kick".to_string(), "bob".to_string()];
    ///
    /// let matches = tree.search_preparsed(&named, &positional, &SearchOptions::default());
    /// assert_eq!(matches.len(), 1);
    /// assert_eq!(matches[0].parameter("user").unwrap().values(), ["bob"]);
    /// ```
    pub fn search_preparsed(
        &self,
        named: &NamedValues,
        positional: &[String],
        options: &SearchOptions,
    ) -> Vec<BoundCommandNode<'_>> {
        let mut results = Vec::new();
        self.route_preparsed(self.root(), named, positional, 0, options, &mut results);
        debug!(
            named = named.len(),
            positional = positional.len(),
            matches = results.len(),
            "Preparsed search finished"
        );
        results
    }

    fn route_tokens<'t>(
        &'t self,
        group: &'t GroupNode,
        mut tokens: Tokenizer<'_>,
        consumed: usize,
        options: &SearchOptions,
        results: &mut Vec<BoundCommandNode<'t>>,
    ) {
        let Some(token) = tokens.next() else {
            return;
        };
        if token.kind != TokenKind::Value {
            return;
        }
        let consumed = consumed + 1;

        for (id, node) in self.matching_children(group, token.text, options) {
            match node {
                Node::Group(child) => {
                    self.route_tokens(child, tokens.clone(), consumed, options, results);
                    for (attached_id, command) in self.attached_commands(child) {
                        self.bind_tokens(attached_id, command, &tokens, consumed, options, results);
                    }
                }
                Node::Command(command) => {
                    self.bind_tokens(id, command, &tokens, consumed, options, results);
                }
            }
        }
    }

    fn route_preparsed<'t>(
        &'t self,
        group: &'t GroupNode,
        named: &NamedValues,
        positional: &[String],
        consumed: usize,
        options: &SearchOptions,
        results: &mut Vec<BoundCommandNode<'t>>,
    ) {
        let Some((key, rest)) = positional.split_first() else {
            return;
        };
        let consumed = consumed + 1;

        for (id, node) in self.matching_children(group, key, options) {
            match node {
                Node::Group(child) => {
                    self.route_preparsed(child, named, rest, consumed, options, results);
                    for (attached_id, command) in self.attached_commands(child) {
                        self.bind_preparsed(attached_id, command, named, rest, consumed, options, results);
                    }
                }
                Node::Command(command) => {
                    self.bind_preparsed(id, command, named, rest, consumed, options, results);
                }
            }
        }
    }

    fn matching_children<'t, 'k>(
        &'t self,
        group: &'t GroupNode,
        key: &'k str,
        options: &'k SearchOptions,
    ) -> impl Iterator<Item = (NodeId, &'t Node)> + 'k
    where
        't: 'k,
    {
        group.children().iter().filter_map(move |&id| {
            let node = self.node(id)?;
            if node.matches_key(key, options.key_comparison) {
                trace!(key, node = node.key(), "Routing key matched");
                Some((id, node))
            } else {
                None
            }
        })
    }

    fn attached_commands<'t>(
        &'t self,
        group: &'t GroupNode,
    ) -> impl Iterator<Item = (NodeId, &'t CommandNode)> + 't {
        group
            .attached()
            .iter()
            .filter_map(|&id| self.command(id).map(|command| (id, command)))
    }

    fn bind_tokens<'t>(
        &'t self,
        id: NodeId,
        command: &'t CommandNode,
        tokens: &Tokenizer<'_>,
        consumed: usize,
        options: &SearchOptions,
        results: &mut Vec<BoundCommandNode<'t>>,
    ) {
        for (index, overload) in command.overloads().iter().enumerate() {
            let attempt = bind_overload_tokens(overload, tokens.clone(), options);
            self.collect_attempt(id, command, index, attempt, consumed, results);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_preparsed<'t>(
        &'t self,
        id: NodeId,
        command: &'t CommandNode,
        named: &NamedValues,
        positional: &[String],
        consumed: usize,
        options: &SearchOptions,
        results: &mut Vec<BoundCommandNode<'t>>,
    ) {
        for (index, overload) in command.overloads().iter().enumerate() {
            let attempt = bind_overload_preparsed(overload, named, positional, options);
            self.collect_attempt(id, command, index, attempt, consumed, results);
        }
    }

    fn collect_attempt<'t>(
        &'t self,
        id: NodeId,
        command: &'t CommandNode,
        overload: usize,
        attempt: Attempt<'t>,
        routing_consumed: usize,
        results: &mut Vec<BoundCommandNode<'t>>,
    ) {
        match attempt {
            Attempt::Accepted {
                parameters,
                consumed,
            } => {
                trace!(command = command.key(), overload, "Overload accepted");
                results.push(BoundCommandNode {
                    id,
                    command,
                    overload,
                    path: self.path(id),
                    parameters,
                    consumed: routing_consumed + consumed,
                });
            }
            Attempt::Fatal => {
                trace!(command = command.key(), overload, "Overload rejected: fatal mismatch");
            }
            Attempt::Incomplete => {
                trace!(command = command.key(), overload, "Overload rejected: missing parameters");
            }
            Attempt::Trailing => {
                trace!(command = command.key(), overload, "Overload rejected: trailing input");
            }
        }
    }
}

fn bind_overload_tokens<'t>(
    overload: &'t Overload,
    mut tokens: Tokenizer<'_>,
    options: &SearchOptions,
) -> Attempt<'t> {
    let shapes = overload.shapes();
    let mut bound: Vec<Option<Vec<String>>> = vec![None; shapes.len()];
    let mut consumed = 0;

    while !tokens.is_exhausted() {
        let named = shapes
            .iter()
            .enumerate()
            .filter(|(idx, shape)| !shape.is_positional() && bound[*idx].is_none());
        let positional = next_positional(shapes, &bound);

        // Named and switch shapes get first claim on the token
        let claim = named.chain(positional).find_map(|(idx, shape)| {
            let mut snapshot = tokens.clone();
            shape
                .match_tokens(&mut snapshot, options)
                .map(|m| (idx, m, snapshot))
        });
        let Some((idx, m, snapshot)) = claim else {
            break;
        };

        bound[idx] = Some(m.value.map(String::from).into_iter().collect());
        consumed += m.consumed;
        tokens = snapshot;
    }

    finish(shapes, bound, consumed, !tokens.is_exhausted(), options)
}

fn bind_overload_preparsed<'t>(
    overload: &'t Overload,
    named: &NamedValues,
    positional: &[String],
    options: &SearchOptions,
) -> Attempt<'t> {
    let shapes = overload.shapes();
    let mut bound: Vec<Option<Vec<String>>> = vec![None; shapes.len()];
    let mut consumed = 0;
    let mut unclaimed = 0;

    for (key, values) in named {
        let mut claimed = false;
        for (idx, shape) in shapes.iter().enumerate() {
            match shape.match_entry(key, values, options) {
                MapMatch::Unmatched => {}
                // A second entry for one shape, e.g. both `r` and `reason`
                _ if bound[idx].is_some() => return Attempt::Fatal,
                MapMatch::Matched => {
                    bound[idx] = Some(values.clone());
                    consumed += 1;
                    claimed = true;
                    break;
                }
                MapMatch::Fatal => return Attempt::Fatal,
            }
        }
        if !claimed {
            unclaimed += 1;
        }
    }

    let mut values = positional.iter();
    for (idx, shape) in shapes.iter().enumerate() {
        if !shape.is_positional() {
            continue;
        }
        let Some(value) = values.next() else {
            break;
        };
        bound[idx] = Some(vec![value.clone()]);
        consumed += 1;
    }

    let leftover = unclaimed > 0 || values.len() > 0;
    finish(shapes, bound, consumed, leftover, options)
}

/// The first positional shape not yet bound; positionals bind in declared order.
fn next_positional<'s>(
    shapes: &'s [ParameterShape],
    bound: &[Option<Vec<String>>],
) -> Option<(usize, &'s ParameterShape)> {
    shapes
        .iter()
        .enumerate()
        .find(|(idx, shape)| shape.is_positional() && bound[*idx].is_none())
}

fn finish<'t>(
    shapes: &'t [ParameterShape],
    bound: Vec<Option<Vec<String>>>,
    consumed: usize,
    leftover: bool,
    options: &SearchOptions,
) -> Attempt<'t> {
    let complete = shapes
        .iter()
        .zip(&bound)
        .all(|(shape, values)| values.is_some() || shape.is_omissible(options));
    if !complete {
        return Attempt::Incomplete;
    }
    if leftover && options.trailing == TrailingPolicy::Reject {
        return Attempt::Trailing;
    }

    let parameters = shapes
        .iter()
        .zip(bound)
        .map(|(shape, values)| BoundParameter {
            shape,
            supplied: values.is_some(),
            values: values.unwrap_or_default(),
        })
        .collect();

    Attempt::Accepted {
        parameters,
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        CommandDescriptor, GroupDescriptor, OverloadDescriptor, ParameterDescriptor, TreeBuilder,
    };
    use crate::options::KeyComparison;

    fn leaf(key: &str) -> CommandDescriptor {
        CommandDescriptor::new(key).with_overload(OverloadDescriptor::new())
    }

    fn reject() -> SearchOptions {
        SearchOptions::default().with_trailing(TrailingPolicy::Reject)
    }

    fn keys<'t>(matches: &[BoundCommandNode<'t>]) -> Vec<&'t str> {
        matches.iter().map(|m| m.command().key()).collect()
    }

    fn abc_tree() -> CommandTree {
        TreeBuilder::new()
            .group(
                GroupDescriptor::new("a")
                    .with_command(leaf("e"))
                    .with_command(leaf("f"))
                    .with_command(leaf("g")),
            )
            .build()
            .unwrap()
    }

    fn kick_tree() -> CommandTree {
        TreeBuilder::new()
            .command(
                CommandDescriptor::new("kick")
                    .with_overload(
                        OverloadDescriptor::new()
                            .with_parameter(ParameterDescriptor::positional("user"))
                            .with_parameter(
                                ParameterDescriptor::named("reason", Some('r'), Some("reason"))
                                    .optional(),
                            )
                            .with_parameter(
                                ParameterDescriptor::switch("silent", Some('s'), Some("silent"))
                                    .optional(),
                            ),
                    )
                    .with_overload(
                        OverloadDescriptor::new()
                            .with_parameter(ParameterDescriptor::positional("user"))
                            .with_parameter(ParameterDescriptor::switch(
                                "reason_flag",
                                Some('r'),
                                None,
                            )),
                    ),
            )
            .build()
            .unwrap()
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    #[test]
    fn test_group_routes_to_single_command() {
        let tree = abc_tree();
        let matches = tree.search("a e", &SearchOptions::default());

        assert_eq!(keys(&matches), vec!["e"]);
        assert_eq!(matches[0].path(), ["a", "e"]);
        assert_eq!(matches[0].consumed(), 2);
    }

    #[test]
    fn test_unknown_command_yields_nothing() {
        let tree = abc_tree();
        assert!(tree.search("a z", &SearchOptions::default()).is_empty());
        assert!(tree.search("a", &SearchOptions::default()).is_empty());
        assert!(tree.search("", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_trailing_tokens_follow_policy() {
        let tree = abc_tree();

        let tolerated = tree.search("a e f", &SearchOptions::default());
        assert_eq!(keys(&tolerated), vec!["e"]);
        assert_eq!(tolerated[0].consumed(), 2);

        assert!(tree.search("a e f", &reject()).is_empty());
        assert_eq!(keys(&tree.search("a e", &reject())), vec!["e"]);
    }

    #[test]
    fn test_nested_groups_require_declared_order() {
        let tree = TreeBuilder::new()
            .group(
                GroupDescriptor::new("a")
                    .with_group(GroupDescriptor::new("c").with_command(leaf("d"))),
            )
            .build()
            .unwrap();

        assert_eq!(keys(&tree.search("a c d", &SearchOptions::default())), vec!["d"]);
        assert!(tree.search("a d c", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_aliases_are_symmetric() {
        let tree = TreeBuilder::new()
            .group(
                GroupDescriptor::new("g1")
                    .with_alias("g2")
                    .with_command(leaf("c1").with_alias("c2")),
            )
            .build()
            .unwrap();

        for input in ["g1 c1", "g1 c2", "g2 c1", "g2 c2"] {
            let matches = tree.search(input, &SearchOptions::default());
            assert_eq!(keys(&matches), vec!["c1"], "input: {input}");
            assert_eq!(matches[0].path(), ["g1", "c1"]);
        }
    }

    #[test]
    fn test_key_comparison_is_configurable() {
        let tree = TreeBuilder::new()
            .group(GroupDescriptor::new("g1").with_command(leaf("c1")))
            .build()
            .unwrap();

        assert!(tree.search("G1 c1", &SearchOptions::default()).is_empty());
        let insensitive = SearchOptions::new(KeyComparison::CaseInsensitive);
        assert_eq!(keys(&tree.search("G1 C1", &insensitive)), vec!["c1"]);
    }

    #[test]
    fn test_duplicate_sibling_keys_all_match() {
        let tree = TreeBuilder::new()
            .command(leaf("ping").with_description("first"))
            .command(leaf("ping").with_description("second"))
            .build()
            .unwrap();

        let matches = tree.search("ping", &SearchOptions::default());
        let descriptions: Vec<_> = matches.iter().map(|m| m.command().description()).collect();
        assert_eq!(descriptions, vec![Some("first"), Some("second")]);
    }

    #[test]
    fn test_attached_command_matches_at_group_position() {
        let tree = TreeBuilder::new()
            .group(
                GroupDescriptor::new("config")
                    .with_attached(
                        CommandDescriptor::new("show").with_overload(
                            OverloadDescriptor::new()
                                .with_parameter(ParameterDescriptor::positional("key").optional()),
                        ),
                    )
                    .with_command(leaf("reset")),
            )
            .build()
            .unwrap();
        let options = SearchOptions::default();

        let bare = tree.search("config", &options);
        assert_eq!(keys(&bare), vec!["show"]);
        assert_eq!(bare[0].path(), ["config"]);

        // "reset" routes into the subgroup and also binds as the attached positional
        let ambiguous = tree.search("config reset", &options);
        assert_eq!(keys(&ambiguous), vec!["reset", "show"]);
        assert_eq!(ambiguous[1].parameter("key").unwrap().values(), ["reset"]);
    }

    #[test]
    fn test_name_tokens_never_route() {
        let tree = abc_tree();
        assert!(tree.search("--a e", &SearchOptions::default()).is_empty());
    }

    // ------------------------------------------------------------------
    // Overload binding
    // ------------------------------------------------------------------

    #[test]
    fn test_named_and_switch_match_in_any_order() {
        let tree = kick_tree();
        let options = reject();

        for input in [
            "kick bob -r spam --silent",
            "kick -s --reason spam bob",
            "kick --reason spam bob -s",
        ] {
            let matches = tree.search(input, &options);
            assert_eq!(matches.len(), 1, "input: {input}");
            let bound = &matches[0];
            assert_eq!(bound.overload_index(), 0);
            assert_eq!(bound.parameter("user").unwrap().values(), ["bob"]);
            assert_eq!(bound.parameter("reason").unwrap().values(), ["spam"]);
            assert!(bound.parameter("silent").unwrap().is_supplied());
            assert_eq!(bound.consumed(), 6);
        }
    }

    #[test]
    fn test_each_overload_is_tried_independently() {
        let tree = kick_tree();
        let matches = tree.search("kick bob -r", &reject());

        // "-r" without a value cannot satisfy the named reason
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].overload_index(), 1);
        assert!(matches[0].parameter("reason_flag").unwrap().is_supplied());
    }

    #[test]
    fn test_missing_required_positional_rejects() {
        let tree = kick_tree();
        assert!(tree.search("kick --silent", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_quoted_positional_value() {
        let tree = kick_tree();
        let matches = tree.search("kick \"bob smith\" -r 'too loud'", &reject());

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].parameter("user").unwrap().values(), ["bob smith"]);
        assert_eq!(matches[0].parameter("reason").unwrap().values(), ["too loud"]);
    }

    // ------------------------------------------------------------------
    // Preparsed search
    // ------------------------------------------------------------------

    fn positional(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_preparsed_fatal_drops_only_one_overload() {
        let tree = kick_tree();
        let mut named = NamedValues::new();
        named.insert("r".into(), Vec::new());

        // Empty value list is fatal for the named reason but matches the switch
        let matches = tree.search_preparsed(&named, &positional(&["kick", "bob"]), &reject());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].overload_index(), 1);
        assert_eq!(matches[0].consumed(), 3);
    }

    #[test]
    fn test_preparsed_named_by_long_or_short() {
        let tree = kick_tree();
        let input = positional(&["kick", "bob"]);

        for key in ["reason", "r"] {
            let mut named = NamedValues::new();
            named.insert(key.into(), vec!["spam".into()]);
            named.insert("silent".into(), Vec::new());

            let matches = tree.search_preparsed(&named, &input, &reject());
            assert_eq!(matches.len(), 1, "key: {key}");
            assert_eq!(matches[0].parameter("reason").unwrap().values(), ["spam"]);
            assert!(matches[0].parameter("silent").unwrap().is_supplied());
        }
    }

    #[test]
    fn test_preparsed_leftovers_follow_policy() {
        let tree = kick_tree();
        let mut named = NamedValues::new();
        named.insert("unknown".into(), vec!["x".into()]);
        let input = positional(&["kick", "bob"]);

        assert!(tree.search_preparsed(&named, &input, &reject()).is_empty());
        assert_eq!(
            tree.search_preparsed(&named, &input, &SearchOptions::default()).len(),
            1
        );

        let extra = positional(&["kick", "bob", "alice"]);
        assert!(tree.search_preparsed(&NamedValues::new(), &extra, &reject()).is_empty());
    }

    #[test]
    fn test_preparsed_case_insensitive_routing() {
        let tree = TreeBuilder::new()
            .group(GroupDescriptor::new("test").with_command(leaf("somecommand")))
            .build()
            .unwrap();
        let input = positional(&["TEST", "SomeCommand"]);

        assert!(tree
            .search_preparsed(&NamedValues::new(), &input, &SearchOptions::default())
            .is_empty());
        let insensitive = SearchOptions::new(KeyComparison::CaseInsensitive);
        let matches = tree.search_preparsed(&NamedValues::new(), &input, &insensitive);
        assert_eq!(keys(&matches), vec!["somecommand"]);
    }

    #[test]
    fn test_preparsed_attached_command_matches_at_group_position() {
        let tree = TreeBuilder::new()
            .group(
                GroupDescriptor::new("config")
                    .with_attached(
                        CommandDescriptor::new("show").with_overload(
                            OverloadDescriptor::new()
                                .with_parameter(ParameterDescriptor::positional("key").optional()),
                        ),
                    )
                    .with_command(leaf("reset")),
            )
            .build()
            .unwrap();
        let options = SearchOptions::default();
        let named = NamedValues::new();

        let bare = tree.search_preparsed(&named, &positional(&["config"]), &options);
        assert_eq!(keys(&bare), vec!["show"]);
        assert_eq!(bare[0].path(), ["config"]);
        assert_eq!(bare[0].consumed(), 1);

        let ambiguous = tree.search_preparsed(&named, &positional(&["config", "reset"]), &options);
        assert_eq!(keys(&ambiguous), vec!["reset", "show"]);
        assert_eq!(ambiguous[1].parameter("key").unwrap().values(), ["reset"]);
    }

    #[test]
    fn test_preparsed_nested_groups_require_declared_order() {
        let tree = TreeBuilder::new()
            .group(
                GroupDescriptor::new("a")
                    .with_group(GroupDescriptor::new("c").with_command(leaf("d"))),
            )
            .build()
            .unwrap();
        let named = NamedValues::new();

        let matches = tree.search_preparsed(&named, &positional(&["a", "c", "d"]), &reject());
        assert_eq!(keys(&matches), vec!["d"]);
        assert_eq!(matches[0].path(), ["a", "c", "d"]);
        assert!(tree
            .search_preparsed(&named, &positional(&["a", "d", "c"]), &reject())
            .is_empty());
    }

    #[test]
    fn test_preparsed_short_and_long_entry_for_one_shape_is_fatal() {
        let tree = kick_tree();
        let mut named = NamedValues::new();
        named.insert("r".into(), vec!["spam".into()]);
        named.insert("reason".into(), vec!["eggs".into()]);
        let input = positional(&["kick", "bob"]);

        // Overload 0 sees reason twice; overload 1 has no value-less "r"
        assert!(tree
            .search_preparsed(&named, &input, &SearchOptions::default())
            .is_empty());
    }

    // ------------------------------------------------------------------
    // Sharing
    // ------------------------------------------------------------------

    #[test]
    fn test_search_is_deterministic() {
        let tree = kick_tree();
        let first = tree.search("kick bob -r spam", &SearchOptions::default());
        let second = tree.search("kick bob -r spam", &SearchOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_searches_share_tree() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandTree>();

        let tree = abc_tree();
        let found: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["a e", "a f", "a g", "a z"]
                .into_iter()
                .map(|input| {
                    let tree = &tree;
                    scope.spawn(move || {
                        tree.search(input, &SearchOptions::default())
                            .iter()
                            .map(|m| m.command().key().to_string())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(found, vec![vec!["e"], vec!["f"], vec!["g"], vec![]]);
    }
}
