//! Selection state: one node per UI control, with cascading children.
pub mod registry;
pub mod types;

pub use registry::SelectionRegistry;
pub use types::{Cardinality, SelectionEvent, SelectionId, SelectionKind, SelectionNode};

use std::fmt::Debug;

/// Maps a parent's selected value to the ordered options it contributes to a child.
///
/// The group taxonomy is the two-level instance; `OptionTree` covers any
/// further level, so cascades are not tied to a fixed depth.
pub trait Hierarchy: Debug + Send + Sync {
    /// Unknown parent values contribute nothing.
    fn children_of(&self, parent_value: &str) -> &[String];
}

/// An ordered parent-value -> children table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTree {
    entries: Vec<(String, Vec<String>)>,
}

impl OptionTree {
    pub fn new<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter()
                .map(|(k, vs)| (k.into(), vs.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

impl Hierarchy for OptionTree {
    fn children_of(&self, parent_value: &str) -> &[String] {
        self.entries.iter()
            .find(|(k, _)| k == parent_value)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }
}
