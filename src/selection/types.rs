use super::Hierarchy;
use serde::{Serialize, Deserialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SelectionId(pub u32);

impl SelectionId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    Single,
    #[default]
    Multi,
}

#[derive(Debug, Clone)]
pub enum SelectionKind {
    /// Options fixed at construction; values set by the user.
    Independent,
    /// Options derived from the parent's values through `hierarchy`.
    Child { parent: SelectionId, hierarchy: Arc<dyn Hierarchy> },
}

/// State of one UI control.
#[derive(Debug, Clone)]
pub struct SelectionNode {
    pub id: SelectionId,
    pub name: String,
    pub kind: SelectionKind,
    pub cardinality: Cardinality,
    pub(crate) options: Vec<String>,
    pub(crate) values: Vec<String>,
}

impl SelectionNode {
    pub fn available_options(&self) -> &[String] { &self.options }
    pub fn current_values(&self) -> &[String] { &self.values }
    pub fn is_child(&self) -> bool { matches!(self.kind, SelectionKind::Child { .. }) }
}

/// The only external write surface: replace a node's value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub node: String,
    pub values: Vec<String>,
}

impl SelectionEvent {
    pub fn new<S: Into<String>>(node: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self { node: node.into(), values: values.into_iter().map(Into::into).collect() }
    }
}
