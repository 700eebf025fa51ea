//! A synchronous, single-threaded pipeline runner.
use super::counts::GroupedCountTable;
use super::ledger::{ViewOutput, ViewResult};
use super::pipeline::{self, PipelineKind, ResolvedFilters};
use crate::display::chart::{Chart, ChartOptions};
use crate::display::style::StyleTable;
use crate::store::DatasetStore;

/// Borrowed view of the immutable inputs every pipeline reads.
pub struct Engine<'a> {
    store: &'a DatasetStore,
    counts: &'a GroupedCountTable,
    styles: &'a StyleTable,
}

impl<'a> Engine<'a> {
    pub fn new(store: &'a DatasetStore, counts: &'a GroupedCountTable, styles: &'a StyleTable) -> Self {
        Self { store, counts, styles }
    }

    /// Runs `kind` over `filters` and styles the result. Deterministic for
    /// identical inputs; only styling can fail.
    pub fn run(&self, kind: PipelineKind, filters: &ResolvedFilters, options: &ChartOptions) -> ViewResult {
        let (series, x_range) = match kind {
            PipelineKind::Histogram { source, baseline } => {
                let range = if options.fixed_x_range { self.store.value_range(source) } else { None };
                (pipeline::histogram_set(self.store, source, baseline, filters), range)
            }
            PipelineKind::GroupedCounts => (pipeline::grouped_counts(self.counts, filters), None),
        };
        let chart = Chart::build(&series, options, self.styles, x_range)?;
        Ok(ViewOutput { series, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::pipeline::DerivedSeries;
    use crate::error::ConfigurationError;
    use crate::store::{Record, Subject, ValueSource};

    fn store() -> DatasetStore {
        let subjects = vec![Subject { entity_id: "a1".into(), group_label: "A".into(), weight: 20.0 }];
        let records = vec![
            Record { entity_id: "a1".into(), group_label: "A".into(), time_point: 0, value: 45.0, weight: 20.0 },
            Record { entity_id: "a1".into(), group_label: "A".into(), time_point: 5, value: 46.0, weight: 20.0 },
        ];
        DatasetStore::from_parts(subjects, records)
    }

    #[test]
    fn test_run_histogram_with_fixed_range() {
        let s = store();
        let counts = GroupedCountTable::build(&s);
        let styles = StyleTable::new([("A", "#27706B")]);
        let engine = Engine::new(&s, &counts, &styles);

        let kind = PipelineKind::Histogram { source: ValueSource::Measurement, baseline: false };
        let opts = ChartOptions { fixed_x_range: true, ..Default::default() };
        let out = engine.run(kind, &ResolvedFilters { labels: vec!["A".into()] }, &opts).unwrap();
        assert_eq!(out.chart.x_range, Some((45.0, 46.0)));
        assert!(matches!(out.series, DerivedSeries::HistogramSet { .. }));
    }

    #[test]
    fn test_run_reports_missing_style() {
        let s = store();
        let counts = GroupedCountTable::build(&s);
        let styles = StyleTable::default();
        let engine = Engine::new(&s, &counts, &styles);
        let err = engine.run(PipelineKind::GroupedCounts, &ResolvedFilters { labels: vec!["A".into()] }, &ChartOptions::default());
        assert_eq!(err.unwrap_err(), ConfigurationError::MissingStyle { label: "A".into() });
    }

    #[test]
    fn test_empty_filters_yield_empty_output() {
        let s = store();
        let counts = GroupedCountTable::build(&s);
        let styles = StyleTable::default();
        let engine = Engine::new(&s, &counts, &styles);
        let out = engine.run(PipelineKind::GroupedCounts, &ResolvedFilters::default(), &ChartOptions::default()).unwrap();
        assert!(out.chart.series.is_empty());
    }
}
