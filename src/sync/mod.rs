//! Orchestrates cascade resolution, dirty propagation and lazy recomputation.
pub mod synchronizer;
pub mod view;

pub use synchronizer::{ChangeReport, SynchronizerBuilder, ViewSynchronizer};
pub use view::{RecomputePolicy, Resolve, ViewDefinition};
