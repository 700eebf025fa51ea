//! error.rs
//! Error taxonomy for startup (fatal) and runtime (per-event / per-view) failures.

use thiserror::Error;

/// Malformed or inconsistent input tables. Always fatal at startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("I/O error reading '{path}': {source}")]
    Io { path: String, source: std::io::Error },
    #[error("Failed to parse table '{table}': {msg}")]
    Parse { table: String, msg: String },
    #[error("Unsupported table format for '{path}' (expected .csv or .json)")]
    UnsupportedFormat { path: String },
    #[error("Required column '{column}' is missing from table '{table}'")]
    MissingColumn { table: String, column: String },
    #[error("Join key '{column}' is missing from table '{table}'")]
    MissingJoinKey { table: String, column: String },
    #[error("Invalid value '{value}' in column '{column}' at row {row} of table '{table}'")]
    InvalidCell { table: String, row: usize, column: String, value: String },
    #[error("Entity '{entity}' is assigned to both '{first}' and '{second}'")]
    ConflictingGroup { entity: String, first: String, second: String },
    #[error("Join of '{left}' and '{right}' produced no records")]
    EmptyJoin { left: String, right: String },
}

/// Category/leaf inconsistency between the taxonomy and the dataset. Fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Category '{category}' lists leaf '{leaf}' which has no records in the dataset")]
    UnknownLeaf { category: String, leaf: String },
    #[error("Leaf '{leaf}' is listed under both '{first}' and '{second}'")]
    OverlappingLeaf { leaf: String, first: String, second: String },
    #[error("Category '{0}' is declared more than once")]
    DuplicateCategory(String),
    #[error("Category '{0}' has no leaves")]
    EmptyCategory(String),
}

/// Missing style mapping or an invalid dashboard definition.
///
/// Raised at startup when the config itself is inconsistent, and at runtime
/// when a single view references a label it cannot style. The runtime case is
/// isolated to that view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No style is configured for group '{label}'")]
    MissingStyle { label: String },
    #[error("View '{view}' reads unknown selection '{node}'")]
    UnknownSelection { view: String, node: String },
    #[error("Selection '{node}' has invalid default value '{value}'")]
    InvalidDefault { node: String, value: String },
    #[error("Selection '{node}' must declare either options or a parent")]
    MissingOptions { node: String },
    #[error("Failed to read config '{path}': {msg}")]
    Unreadable { path: String, msg: String },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A lookup probe that found nothing. Returned as a value, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} '{name}' not found")]
pub struct NotFound {
    pub kind: &'static str,
    pub name: String,
}

impl NotFound {
    pub fn category(name: &str) -> Self { Self { kind: "category", name: name.to_string() } }
    pub fn label(name: &str) -> Self { Self { kind: "group label", name: name.to_string() } }
}

/// A rejected user-selection event. State is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown selection node '{0}'")]
    UnknownNode(String),
    #[error("Value '{value}' is not an available option of '{node}'")]
    UnknownOption { node: String, value: String },
    #[error("Selection '{node}' accepts a single value, got {count}")]
    TooManyValues { node: String, count: usize },
}

/// Structural problems in the declared dependency graph. Fatal at build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node name '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("Selection '{node}' declares unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },
    #[error("Cycle detected involving selection '{0}'")]
    CycleDetected(String),
}

/// Every error that aborts startup.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Startup selection rejected: {0}")]
    Selection(#[from] SelectionError),
    #[error("Dashboard definition has {} problem(s): {}", .0.len(), join_messages(.0))]
    Validation(Vec<ConfigurationError>),
}

fn join_messages(errors: &[ConfigurationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
