//! startup.rs
//! Config + files -> a ready synchronizer. Every failure here is fatal.

use crate::config::{DashboardConfig, OptionSet, OptionsDecl};
use crate::error::{ConfigurationError, DataLoadError, StartupError};
use crate::store::{DatasetStore, GroupTaxonomy, Table};
use crate::sync::{SynchronizerBuilder, ViewSynchronizer};
use crate::validation::Validator;
use std::sync::Arc;
use tracing::info;

/// Reads both tables named in `config.data` and joins them.
pub fn load_dataset(config: &DashboardConfig) -> Result<DatasetStore, DataLoadError> {
    let subjects = Table::load(&config.data.subjects)?;
    let observations = Table::load(&config.data.observations)?;
    DatasetStore::from_tables(&subjects, &observations, &config.columns)
}

/// Builds the taxonomy, validates the definition against it, then declares
/// every selection and view in config order.
pub fn assemble(config: &DashboardConfig, store: Arc<DatasetStore>) -> Result<ViewSynchronizer, StartupError> {
    let taxonomy = GroupTaxonomy::new(config.taxonomy.clone(), &store)?;
    Validator::new(config, &taxonomy).validate().map_err(StartupError::Validation)?;

    let taxonomy = Arc::new(taxonomy);
    let styles = Arc::new(config.styles.clone());
    let mut builder = SynchronizerBuilder::new(store.clone(), taxonomy.clone(), styles).policy(config.policy);

    for decl in &config.selection {
        match (&decl.parent, &decl.options) {
            (Some(parent), _) => {
                builder.child(&decl.name, parent)?;
            }
            (None, Some(options)) => {
                let options: Vec<String> = match options {
                    OptionsDecl::Derived(OptionSet::Groups) => store.group_labels().map(String::from).collect(),
                    OptionsDecl::Derived(OptionSet::Categories) => taxonomy.categories().map(String::from).collect(),
                    OptionsDecl::Explicit(list) => list.clone(),
                };
                builder.independent(&decl.name, options, decl.cardinality, &decl.default)?;
            }
            (None, None) => return Err(ConfigurationError::MissingOptions { node: decl.name.clone() }.into()),
        }
    }
    for view in &config.view {
        builder.view(view.clone())?;
    }

    let sync = builder.build()?;
    info!(records = store.len(), groups = store.group_labels().count(), "Dashboard assembled");
    Ok(sync)
}

pub fn startup(config: &DashboardConfig) -> Result<ViewSynchronizer, StartupError> {
    let store = Arc::new(load_dataset(config)?);
    assemble(config, store)
}
