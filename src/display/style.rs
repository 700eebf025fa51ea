//! style.rs
//! Injected label -> style table. Lookups never fall back to a default color.

use crate::error::ConfigurationError;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// What the sink needs to draw one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleHint {
    pub color: String,
    pub opacity: f64,
}

/// The unconditional comparison series in overlay histograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStyle {
    #[serde(default = "BaselineStyle::default_label")]
    pub label: String,
    #[serde(default = "BaselineStyle::default_color")]
    pub color: String,
    #[serde(default = "BaselineStyle::default_opacity")]
    pub opacity: f64,
}

impl BaselineStyle {
    fn default_label() -> String { "all entities".into() }
    fn default_color() -> String { "lightgrey".into() }
    fn default_opacity() -> f64 { 0.5 }
}

impl Default for BaselineStyle {
    fn default() -> Self {
        Self { label: Self::default_label(), color: Self::default_color(), opacity: Self::default_opacity() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleTable {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub baseline: BaselineStyle,
}

impl StyleTable {
    pub fn new<K: Into<String>, V: Into<String>>(colors: impl IntoIterator<Item = (K, V)>) -> Self {
        Self { colors: colors.into_iter().map(|(k, v)| (k.into(), v.into())).collect(), baseline: BaselineStyle::default() }
    }

    pub fn style_for(&self, label: &str, opacity: f64) -> Result<StyleHint, ConfigurationError> {
        self.colors.get(label)
            .map(|c| StyleHint { color: c.clone(), opacity })
            .ok_or_else(|| ConfigurationError::MissingStyle { label: label.to_string() })
    }

    pub fn baseline_hint(&self) -> StyleHint {
        StyleHint { color: self.baseline.color.clone(), opacity: self.baseline.opacity }
    }

    /// Every label in `labels` without a color, in input order.
    pub fn missing<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        labels.into_iter().filter(|l| !self.colors.contains_key(*l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_style_is_an_error() {
        let styles = StyleTable::new([("Placebo", "#29304E")]);
        assert_eq!(styles.style_for("Placebo", 0.9).unwrap(), StyleHint { color: "#29304E".into(), opacity: 0.9 });
        assert_eq!(
            styles.style_for("Ketapril", 0.9).unwrap_err(),
            ConfigurationError::MissingStyle { label: "Ketapril".into() }
        );
        assert_eq!(styles.missing(["Placebo", "Ketapril", "Naftisol"]), vec!["Ketapril", "Naftisol"]);
    }
}
