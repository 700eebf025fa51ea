//! The validator that runs every startup rule against a dashboard definition.
use super::rules::{selections, styles};
use crate::config::DashboardConfig;
use crate::error::ConfigurationError;
use crate::store::GroupTaxonomy;

/// Lints a dashboard definition against the taxonomy it will run with.
pub struct Validator<'a> {
    config: &'a DashboardConfig,
    taxonomy: &'a GroupTaxonomy,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a DashboardConfig, taxonomy: &'a GroupTaxonomy) -> Self {
        Self { config, taxonomy }
    }

    /// # Returns
    /// - `Ok(())` if no rule fails.
    /// - `Err(Vec<ConfigurationError>)` with every failure, in rule order.
    pub fn validate(&self) -> Result<(), Vec<ConfigurationError>> {
        let mut errors = styles::validate_styles(self.taxonomy, &self.config.styles);

        for decl in &self.config.selection {
            if let Some(err) = selections::validate_selection(decl) {
                errors.push(err);
            }
        }
        for view in &self.config.view {
            if let Some(err) = selections::validate_view_reads(view) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptionSet, OptionsDecl, SelectionDecl};
    use crate::display::style::StyleTable;
    use crate::selection::Cardinality;
    use crate::store::{CategoryDef, DatasetStore, Record, Subject};

    fn taxonomy() -> GroupTaxonomy {
        let subjects = vec![
            Subject { entity_id: "a1".into(), group_label: "A".into(), weight: 20.0 },
            Subject { entity_id: "b1".into(), group_label: "B".into(), weight: 25.0 },
        ];
        let records = vec![
            Record { entity_id: "a1".into(), group_label: "A".into(), time_point: 0, value: 45.0, weight: 20.0 },
            Record { entity_id: "b1".into(), group_label: "B".into(), time_point: 0, value: 45.0, weight: 25.0 },
        ];
        let store = DatasetStore::from_parts(subjects, records);
        GroupTaxonomy::new(vec![CategoryDef::new("Cat1", ["A"]), CategoryDef::new("Cat2", ["B"])], &store).unwrap()
    }

    fn decl(name: &str, options: Option<OptionsDecl>, parent: Option<&str>) -> SelectionDecl {
        SelectionDecl {
            name: name.into(),
            options,
            parent: parent.map(String::from),
            cardinality: Cardinality::Multi,
            default: vec![],
        }
    }

    #[test]
    fn test_collects_every_failure() {
        let mut config = DashboardConfig::from_toml_str("").unwrap();
        config.styles = StyleTable::new([("A", "#111111")]);
        config.selection = vec![
            decl("ok", Some(OptionsDecl::Derived(OptionSet::Categories)), None),
            decl("neither", None, None),
            decl("both", Some(OptionsDecl::Explicit(vec!["A".into()])), Some("ok")),
        ];

        let errors = Validator::new(&config, &taxonomy()).validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ConfigurationError::MissingStyle { label: "B".into() });
        assert_eq!(errors[1], ConfigurationError::MissingOptions { node: "neither".into() });
        assert!(matches!(errors[2], ConfigurationError::Invalid(_)));
    }

    #[test]
    fn test_single_select_child_is_rejected() {
        let mut config = DashboardConfig::from_toml_str("").unwrap();
        config.styles = StyleTable::new([("A", "#111111"), ("B", "#222222")]);
        let mut child = decl("sub", None, Some("main"));
        child.cardinality = Cardinality::Single;
        config.selection = vec![decl("main", Some(OptionsDecl::Derived(OptionSet::Categories)), None), child];

        let errors = Validator::new(&config, &taxonomy()).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("'sub' is a child of 'main'"), "Msg: {}", errors[0]);
    }

    #[test]
    fn test_clean_config_passes() {
        let mut config = DashboardConfig::from_toml_str("").unwrap();
        config.styles = StyleTable::new([("A", "#111111"), ("B", "#222222")]);
        config.selection = vec![decl("pick", Some(OptionsDecl::Derived(OptionSet::Groups)), None)];
        assert!(Validator::new(&config, &taxonomy()).validate().is_ok());
    }
}
