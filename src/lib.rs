//! Cascading selection and aggregation core for a multi-panel dashboard.
//!
//! A dashboard is a set of selection controls and derived views over one
//! joined, immutable dataset. Selection events cascade through parent/child
//! controls, dirty exactly the views that read what changed, and those views
//! are recomputed on demand and handed to a `RenderSink`.

pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod selection;
pub mod startup;
pub mod store;
pub mod sync;
pub mod validation;

pub use config::DashboardConfig;
pub use error::{ConfigurationError, DataLoadError, GraphError, NotFound, SelectionError, StartupError, TaxonomyError};
pub use selection::SelectionEvent;
pub use startup::{assemble, load_dataset, startup};
pub use sync::{ChangeReport, RecomputePolicy, SynchronizerBuilder, ViewDefinition, ViewSynchronizer};
