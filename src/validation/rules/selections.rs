//! Shape checks on selection and view declarations.

use crate::config::SelectionDecl;
use crate::error::ConfigurationError;
use crate::selection::Cardinality;
use crate::sync::ViewDefinition;

/// A selection is either independent (`options`) or a child (`parent`), never both.
pub(crate) fn validate_selection(decl: &SelectionDecl) -> Option<ConfigurationError> {
    match (&decl.options, &decl.parent) {
        (None, None) => Some(ConfigurationError::MissingOptions { node: decl.name.clone() }),
        (Some(_), Some(parent)) => Some(ConfigurationError::Invalid(format!(
            "selection '{}' declares both options and parent '{}'",
            decl.name, parent
        ))),
        (None, Some(_)) if !decl.default.is_empty() => Some(ConfigurationError::InvalidDefault {
            node: decl.name.clone(),
            value: decl.default.join(", "),
        }),
        // Children are reset to every option on each cascade, so they are always multi-select.
        (None, Some(parent)) if decl.cardinality == Cardinality::Single => Some(ConfigurationError::Invalid(format!(
            "selection '{}' is a child of '{}' and cannot be single-select",
            decl.name, parent
        ))),
        _ => None,
    }
}

/// A view with nothing to read could never change.
pub(crate) fn validate_view_reads(view: &ViewDefinition) -> Option<ConfigurationError> {
    if view.reads.is_empty() {
        return Some(ConfigurationError::Invalid(format!("view '{}' reads no selection", view.name)));
    }
    None
}
