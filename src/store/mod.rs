//! Immutable inputs: the joined dataset and the group taxonomy.
pub mod dataset;
pub mod table;
pub mod taxonomy;
pub mod types;

pub use dataset::{ColumnMap, DatasetStore};
pub use table::Table;
pub use taxonomy::{CategoryDef, GroupTaxonomy};
pub use types::{Predicate, Record, Subject, TimePoint, ValueSource};
