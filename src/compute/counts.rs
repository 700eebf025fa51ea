//! counts.rs
//! Distinct-entity counts per (group label, time point).
//!
//! The full table is selection-independent, so it is grouped once over the
//! whole store at startup; views only pick which labels to expose.

use crate::store::{DatasetStore, Predicate, Record, TimePoint};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// One label's survival-style curve, sorted by time point ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountSeries {
    pub label: String,
    pub points: Vec<(TimePoint, usize)>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupedCountTable {
    series: HashMap<String, Vec<(TimePoint, usize)>>,
}

type Buckets<'a> = HashMap<(&'a str, TimePoint), HashSet<&'a str>>;

impl GroupedCountTable {
    /// Groups every record in one parallel pass.
    pub fn build(store: &DatasetStore) -> Self {
        let buckets: Buckets = store.records()
            .par_iter()
            .fold(Buckets::new, |mut acc, r| {
                acc.entry((r.group_label.as_str(), r.time_point)).or_default().insert(r.entity_id.as_str());
                acc
            })
            .reduce(Buckets::new, |mut a, b| {
                for (key, entities) in b {
                    a.entry(key).or_default().extend(entities);
                }
                a
            });

        let mut by_label: HashMap<String, BTreeMap<TimePoint, usize>> = HashMap::new();
        for ((label, t), entities) in buckets {
            by_label.entry(label.to_string()).or_default().insert(t, entities.len());
        }
        let series: HashMap<String, Vec<(TimePoint, usize)>> = by_label.into_iter()
            .map(|(label, points)| (label, points.into_iter().collect()))
            .collect();

        debug!(labels = series.len(), "Grouped-count table built");
        Self { series }
    }

    /// Computes one label's series directly from the store, bypassing the cache.
    pub fn direct(store: &DatasetStore, label: &str) -> CountSeries {
        CountSeries { label: label.to_string(), points: count_points(store.query(&Predicate::groups([label]))) }
    }

    /// One series per requested label, in request order. Labels with no
    /// records yield an empty series rather than being dropped.
    pub fn select(&self, labels: &[String]) -> Vec<CountSeries> {
        labels.iter()
            .map(|l| CountSeries { label: l.clone(), points: self.series.get(l).cloned().unwrap_or_default() })
            .collect()
    }
}

fn count_points<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<(TimePoint, usize)> {
    let mut by_time: BTreeMap<TimePoint, HashSet<&str>> = BTreeMap::new();
    for r in records {
        by_time.entry(r.time_point).or_default().insert(r.entity_id.as_str());
    }
    by_time.into_iter().map(|(t, e)| (t, e.len())).collect()
}
