//! Every taxonomy leaf must be drawable.

use crate::display::style::StyleTable;
use crate::error::ConfigurationError;
use crate::store::GroupTaxonomy;

/// One `MissingStyle` per unstyled leaf, in taxonomy order.
///
/// Labels outside the taxonomy are not checked here; a view that reaches one
/// fails on its own at recompute time.
pub(crate) fn validate_styles(taxonomy: &GroupTaxonomy, styles: &StyleTable) -> Vec<ConfigurationError> {
    styles
        .missing(taxonomy.all_leaves())
        .into_iter()
        .map(|label| ConfigurationError::MissingStyle { label: label.to_string() })
        .collect()
}
