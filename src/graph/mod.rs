//! The dependency graph between selection controls and derived views.
pub mod dag;
pub mod edge;
pub mod node;

// Re-export key types for convenient access
pub use dag::DependencyGraph;
pub use edge::Edge;
pub use node::{GraphNode, ViewId};
