//! Defines the `Edge` type, representing a dependency between two nodes.

/// Describes the semantic type of a dependency in the graph.
///
/// Traversals use this to tell option-set propagation apart from plain
/// consumption of a selection by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// A hierarchical child derives its options and values from the parent.
    /// Example: `sub-category` options are the leaves of the chosen `main-category` values.
    Cascade,
    /// A derived view filters its data by the selection's current values.
    Reads,
}
