//! config.rs
//! Declarative dashboard definition, loaded from TOML.

use crate::error::ConfigurationError;
use crate::selection::Cardinality;
use crate::display::style::StyleTable;
use crate::store::{CategoryDef, ColumnMap};
use crate::sync::{RecomputePolicy, ViewDefinition};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::{Path, PathBuf};

const MOUSE_STUDY: &str = include_str!("../assets/mouse_study.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    #[serde(default = "DataPaths::default_subjects")]
    pub subjects: PathBuf,
    #[serde(default = "DataPaths::default_observations")]
    pub observations: PathBuf,
}

impl DataPaths {
    fn default_subjects() -> PathBuf { PathBuf::from("Mouse_metadata.csv") }
    fn default_observations() -> PathBuf { PathBuf::from("Study_results.csv") }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self { subjects: Self::default_subjects(), observations: Self::default_observations() }
    }
}

/// Where an independent selection takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionSet {
    /// Every group label present in the dataset, sorted.
    Groups,
    /// Taxonomy categories in declaration order.
    Categories,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsDecl {
    Derived(OptionSet),
    Explicit(Vec<String>),
}

/// One `[[selection]]` entry. Exactly one of `options` and `parent` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDecl {
    pub name: String,
    #[serde(default)]
    pub options: Option<OptionsDecl>,
    /// Children take their options from the parent through the taxonomy.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub default: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub policy: RecomputePolicy,
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(default)]
    pub taxonomy: Vec<CategoryDef>,
    #[serde(default)]
    pub styles: StyleTable,
    #[serde(default)]
    pub selection: Vec<SelectionDecl>,
    #[serde(default)]
    pub view: Vec<ViewDefinition>,
}

impl DashboardConfig {
    /// Reads a TOML file. Relative data paths are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigurationError::Unreadable {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|e| ConfigurationError::Invalid(e.to_string()))
    }

    /// The bundled four-panel mouse study dashboard. Data paths stay relative
    /// to the working directory.
    pub fn mouse_study() -> Result<Self, ConfigurationError> {
        Self::from_toml_str(MOUSE_STUDY)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for p in [&mut self.data.subjects, &mut self.data.observations] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::PipelineKind;
    use crate::display::chart::CompositionMode;
    use crate::store::ValueSource;
    use crate::sync::Resolve;

    #[test]
    fn test_mouse_study_parses() {
        let config = DashboardConfig::mouse_study().unwrap();
        assert_eq!(config.policy, RecomputePolicy::Lazy);
        assert_eq!(config.columns, ColumnMap::default());
        assert_eq!(config.taxonomy.len(), 3);
        assert_eq!(config.taxonomy[0].leaves, vec!["Ramicane", "Capomulin"]);
        assert_eq!(config.styles.colors.len(), 10);
        assert_eq!(config.styles.baseline.label, "all mice");
        assert_eq!(config.selection.len(), 5);
        assert_eq!(config.view.len(), 4);

        let comparison = &config.selection[1];
        assert_eq!(comparison.cardinality, Cardinality::Single);
        assert_eq!(comparison.options, Some(OptionsDecl::Derived(OptionSet::Groups)));
        assert_eq!(config.selection[3].parent.as_deref(), Some("main-category-checklist"));

        let overlay = &config.view[1];
        assert_eq!(overlay.pipeline, PipelineKind::Histogram { source: ValueSource::RecordWeight, baseline: true });
        assert_eq!(overlay.options.mode, CompositionMode::Overlaid);
        assert_eq!(config.view[3].resolve, Resolve::Categories);
        assert_eq!(config.view[3].pipeline, PipelineKind::GroupedCounts);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [[selection]]
            name = "pick"
            options = ["A", "B"]
            "#,
        )
        .unwrap();
        assert_eq!(config.data, DataPaths::default());
        assert_eq!(config.selection[0].options, Some(OptionsDecl::Explicit(vec!["A".into(), "B".into()])));
        assert_eq!(config.selection[0].cardinality, Cardinality::Multi);
        assert!(config.view.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_a_configuration_error() {
        let err = DashboardConfig::from_toml_str("policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid(_)));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.toml");
        fs::write(&path, "[data]\nsubjects = \"meta.csv\"\nobservations = \"/abs/results.csv\"\n").unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.data.subjects, dir.path().join("meta.csv"));
        assert_eq!(config.data.observations, PathBuf::from("/abs/results.csv"));

        let missing = DashboardConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigurationError::Unreadable { .. }));
    }
}
