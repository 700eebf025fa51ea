use crate::compute::PipelineKind;
use crate::display::chart::ChartOptions;
use serde::{Serialize, Deserialize};

/// How a view turns its read selections into group labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolve {
    /// Selected values are group labels already.
    #[default]
    Labels,
    /// Selected values are categories; each expands to its leaves.
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecomputePolicy {
    /// Recompute a dirty view only when its output is requested.
    #[default]
    Lazy,
    /// Recompute every dirtied view while handling the event.
    Eager,
}

/// Declaration of one derived view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub name: String,
    /// Selection names this view depends on, in resolution order.
    pub reads: Vec<String>,
    #[serde(default)]
    pub resolve: Resolve,
    pub pipeline: PipelineKind,
    #[serde(default)]
    pub options: ChartOptions,
}

impl ViewDefinition {
    pub fn new(name: &str, reads: &[&str], pipeline: PipelineKind) -> Self {
        Self {
            name: name.to_string(),
            reads: reads.iter().map(|r| r.to_string()).collect(),
            resolve: Resolve::default(),
            pipeline,
            options: ChartOptions::default(),
        }
    }

    pub fn resolve(mut self, resolve: Resolve) -> Self {
        self.resolve = resolve;
        self
    }

    pub fn options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }
}
