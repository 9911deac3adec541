//! Search results: bound command overloads and prepared commands.

use crate::shape::{ParameterShape, ValueType};
use crate::tree::{CommandNode, NodeId, Overload};

/// Raw input bound to one shape of a matched overload.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter<'t> {
    pub(crate) shape: &'t ParameterShape,
    pub(crate) values: Vec<String>,
    pub(crate) supplied: bool,
}

impl<'t> BoundParameter<'t> {
    /// The shape these values were bound to.
    pub fn shape(&self) -> &'t ParameterShape {
        self.shape
    }

    /// Raw, unconverted values.
    ///
    /// One value for positional and named shapes, none for switches and
    /// omitted parameters.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `false` when the parameter was omitted and should take its default.
    pub fn is_supplied(&self) -> bool {
        self.supplied
    }

    /// Declared value type tag, for the type reader.
    pub fn value_type(&self) -> &'t ValueType {
        self.shape.value_type()
    }
}

/// One accepted command overload together with its bound raw values.
///
/// Produced fresh by every search call; holds borrowed references into the
/// tree that was searched.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommandNode<'t> {
    pub(crate) id: NodeId,
    pub(crate) command: &'t CommandNode,
    pub(crate) overload: usize,
    pub(crate) path: Vec<&'t str>,
    pub(crate) parameters: Vec<BoundParameter<'t>>,
    pub(crate) consumed: usize,
}

impl<'t> BoundCommandNode<'t> {
    /// Arena id of the matched command.
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn command(&self) -> &'t CommandNode {
        self.command
    }

    /// Index of the matched overload within [`CommandNode::overloads`].
    pub fn overload_index(&self) -> usize {
        self.overload
    }

    pub fn overload(&self) -> &'t Overload {
        &self.command.overloads[self.overload]
    }

    /// Primary keys from the root down to the command.
    pub fn path(&self) -> &[&'t str] {
        &self.path
    }

    /// One entry per shape, in declared order.
    pub fn parameters(&self) -> &[BoundParameter<'t>] {
        &self.parameters
    }

    /// Looks up a bound parameter by its underlying parameter name.
    pub fn parameter(&self, name: &str) -> Option<&BoundParameter<'t>> {
        self.parameters
            .iter()
            .find(|p| p.shape.parameter_name() == name)
    }

    /// Tokens (raw search) or routing keys, entries and values (preparsed
    /// search) consumed to produce this match.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Converts every bound parameter with `reader`, in declared order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `reader`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::*;
    ///
    /// let tree = TreeBuilder::new()
    ///     .command(CommandDescriptor::new("roll").with_overload(
    ///         OverloadDescriptor::new().with_parameter(
    ///             ParameterDescriptor::positional("sides").with_type(ValueType::Integer),
    ///         ),
    ///     ))
    ///     .build()
    ///     .unwrap();
    ///
    /// let bound = tree.search("roll 20", &SearchOptions::default()).remove(0);
    /// let prepared = bound
    ///     .prepare(|p| p.values()[0].parse::<u32>())
    ///     .unwrap();
    /// assert_eq!(prepared.parameters, vec![20]);
    /// ```
    pub fn prepare<V, E>(
        self,
        mut reader: impl FnMut(&BoundParameter<'t>) -> Result<V, E>,
    ) -> Result<PreparedCommand<'t, V>, E> {
        let parameters = self
            .parameters
            .iter()
            .map(&mut reader)
            .collect::<Result<Vec<_>, E>>()?;
        Ok(PreparedCommand {
            command: self,
            parameters,
        })
    }
}

/// A bound command whose parameters have been materialized into typed
/// values, ready for invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCommand<'t, V> {
    /// The bound command.
    pub command: BoundCommandNode<'t>,
    /// Materialized values in declared parameter order.
    pub parameters: Vec<V>,
}
