//! The graph/operator contract a selector hands itself to.
//!
//! Building and executing the transformation graph belongs to the graph layer.
//! A selector only needs to know how to ask an operator for a node, and how to
//! let an existing node absorb it.

use std::convert::Infallible;

use super::ColumnSelector;

/// **CONTRACT:** a node of the transformation graph.
pub trait GraphNode: Sized {
    /// Adds `selector` to this node's inputs (`node + selector`).
    fn absorb(self, selector: ColumnSelector) -> Self;
}

/// Used where no graph layer is involved; such a node can never exist.
impl GraphNode for Infallible {
    fn absorb(self, _selector: ColumnSelector) -> Self {
        match self {}
    }
}

/// **CONTRACT:** a transformation step that can be attached to a selection.
pub trait Operator: Sized {
    type Node: GraphNode;

    /// Builds a graph node whose input is `selector`.
    fn create_node(&self, selector: ColumnSelector) -> Self::Node;

    /// Pipes `node` through this operator (`node >> operator`).
    fn pipe(self, node: Self::Node) -> Self::Node;
}
