//! pipeline.rs
//! Pure aggregations: (dataset, resolved filters) -> derived series.

use super::counts::{CountSeries, GroupedCountTable};
use crate::store::{DatasetStore, ValueSource};
use serde::{Serialize, Deserialize};

/// What a view computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Raw values per selected label; the sink bins them.
    Histogram {
        source: ValueSource,
        /// Add an unconditional all-entities series for overlay comparison.
        #[serde(default)]
        baseline: bool,
    },
    /// Distinct entities per time point, per selected label.
    GroupedCounts,
}

/// Labels a view is filtered to, already expanded and ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFilters {
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValues {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DerivedSeries {
    HistogramSet {
        baseline: Option<Vec<f64>>,
        groups: Vec<LabeledValues>,
    },
    GroupedCounts {
        series: Vec<CountSeries>,
    },
}

impl DerivedSeries {
    /// Labels in output order (baseline excluded).
    pub fn labels(&self) -> Vec<&str> {
        match self {
            DerivedSeries::HistogramSet { groups, .. } => groups.iter().map(|g| g.label.as_str()).collect(),
            DerivedSeries::GroupedCounts { series } => series.iter().map(|s| s.label.as_str()).collect(),
        }
    }
}

/// For each label, that label's raw values; labels with no data keep an
/// empty entry. The baseline ignores `filters` entirely.
pub fn histogram_set(store: &DatasetStore, source: ValueSource, baseline: bool, filters: &ResolvedFilters) -> DerivedSeries {
    DerivedSeries::HistogramSet {
        baseline: baseline.then(|| store.values(source, None)),
        groups: filters.labels.iter()
            .map(|l| LabeledValues { label: l.clone(), values: store.values(source, Some(l)) })
            .collect(),
    }
}

/// Filters the precomputed table to the selected labels.
pub fn grouped_counts(table: &GroupedCountTable, filters: &ResolvedFilters) -> DerivedSeries {
    DerivedSeries::GroupedCounts { series: table.select(&filters.labels) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Record, Subject};

    fn store() -> DatasetStore {
        let subjects = vec![
            Subject { entity_id: "a1".into(), group_label: "A".into(), weight: 20.0 },
            Subject { entity_id: "b1".into(), group_label: "B".into(), weight: 25.0 },
        ];
        let records = vec![
            Record { entity_id: "a1".into(), group_label: "A".into(), time_point: 0, value: 45.0, weight: 20.0 },
            Record { entity_id: "b1".into(), group_label: "B".into(), time_point: 0, value: 44.0, weight: 25.0 },
        ];
        DatasetStore::from_parts(subjects, records)
    }

    fn filters(labels: &[&str]) -> ResolvedFilters {
        ResolvedFilters { labels: labels.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn test_histogram_keeps_empty_groups() {
        let out = histogram_set(&store(), ValueSource::SubjectWeight, false, &filters(&["B", "C"]));
        match out {
            DerivedSeries::HistogramSet { baseline, groups } => {
                assert!(baseline.is_none());
                assert_eq!(groups[0], LabeledValues { label: "B".into(), values: vec![25.0] });
                assert_eq!(groups[1].label, "C");
                assert!(groups[1].values.is_empty());
            }
            other => panic!("Wrong series type: {other:?}"),
        }
    }

    #[test]
    fn test_baseline_is_selection_independent() {
        let s = store();
        let a = histogram_set(&s, ValueSource::RecordWeight, true, &filters(&["A"]));
        let none = histogram_set(&s, ValueSource::RecordWeight, true, &filters(&[]));
        let (DerivedSeries::HistogramSet { baseline: b1, .. }, DerivedSeries::HistogramSet { baseline: b2, groups }) = (a, none) else {
            panic!("Wrong series type");
        };
        assert_eq!(b1, Some(vec![20.0, 25.0]));
        assert_eq!(b1, b2);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_grouped_counts_in_filter_order() {
        let table = GroupedCountTable::build(&store());
        let out = grouped_counts(&table, &filters(&["B", "A"]));
        assert_eq!(out.labels(), vec!["B", "A"]);
    }
}
