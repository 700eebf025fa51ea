//! Defines the vertex types of the dependency graph.

use crate::selection::SelectionId;
use serde::{Serialize, Deserialize};

/// Dense index of a derived view, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl ViewId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// A vertex is either a selection control or a derived view.
///
/// Views are always sinks: nothing depends on a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Selection(SelectionId),
    View(ViewId),
}
