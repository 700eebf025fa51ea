//! Aggregation pipelines and the per-view output cache.
pub mod counts;
pub mod engine;
pub mod ledger;
pub mod pipeline;

pub use counts::{CountSeries, GroupedCountTable};
pub use engine::Engine;
pub use ledger::{Ledger, ViewOutput, ViewResult};
pub use pipeline::{DerivedSeries, LabeledValues, PipelineKind, ResolvedFilters};
