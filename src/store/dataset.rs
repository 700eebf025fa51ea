//! dataset.rs
//! The joined, immutable record store. Built once, queried by predicate.

use super::table::Table;
use super::types::{Predicate, Record, Subject, TimePoint, ValueSource};
use crate::error::DataLoadError;
use serde::{Serialize, Deserialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Column names in the two source tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "ColumnMap::default_entity")]
    pub entity: String,
    #[serde(default = "ColumnMap::default_group")]
    pub group: String,
    #[serde(default = "ColumnMap::default_time")]
    pub time: String,
    #[serde(default = "ColumnMap::default_value")]
    pub value: String,
    #[serde(default = "ColumnMap::default_weight")]
    pub weight: String,
}

impl ColumnMap {
    fn default_entity() -> String { "Mouse ID".into() }
    fn default_group() -> String { "Drug Regimen".into() }
    fn default_time() -> String { "Timepoint".into() }
    fn default_value() -> String { "Tumor Volume (mm3)".into() }
    fn default_weight() -> String { "Weight (g)".into() }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            entity: Self::default_entity(),
            group: Self::default_group(),
            time: Self::default_time(),
            value: Self::default_value(),
            weight: Self::default_weight(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    records: Vec<Record>,
    subjects: Vec<Subject>,
    /// Label -> record indices, ascending (load order).
    by_group: HashMap<String, Vec<usize>>,
    labels: BTreeSet<String>,
}

impl DatasetStore {
    /// Joins the subject table (entity, group, weight) with the observation
    /// table (entity, time, value) on the entity column.
    pub fn from_tables(subjects: &Table, observations: &Table, columns: &ColumnMap) -> Result<Self, DataLoadError> {
        // 1. Schema: join key first, then the remaining required columns.
        let s_key = join_key(subjects, &columns.entity)?;
        let o_key = join_key(observations, &columns.entity)?;
        let s_group = required(subjects, &columns.group)?;
        let s_weight = required(subjects, &columns.weight)?;
        let o_time = required(observations, &columns.time)?;
        let o_value = required(observations, &columns.value)?;

        // 2. Subjects: one group per entity for the dataset's lifetime.
        let mut subject_rows: Vec<Subject> = Vec::with_capacity(subjects.row_count());
        let mut by_entity: HashMap<&str, usize> = HashMap::with_capacity(subjects.row_count());
        for (i, row) in subjects.rows.iter().enumerate() {
            let entity = row[s_key].trim();
            let group = row[s_group].trim();
            let weight = parse_cell::<f64>(subjects, i, &columns.weight, &row[s_weight])?;

            match by_entity.get(entity) {
                Some(&existing) => {
                    let first = &subject_rows[existing].group_label;
                    if first != group {
                        return Err(DataLoadError::ConflictingGroup {
                            entity: entity.to_string(),
                            first: first.clone(),
                            second: group.to_string(),
                        });
                    }
                }
                None => {
                    by_entity.insert(entity, subject_rows.len());
                    subject_rows.push(Subject { entity_id: entity.to_string(), group_label: group.to_string(), weight });
                }
            }
        }

        // 3. Inner join, keeping observation order.
        let mut records = Vec::with_capacity(observations.row_count());
        let mut orphans = 0usize;
        for (i, row) in observations.rows.iter().enumerate() {
            let Some(&s_idx) = by_entity.get(row[o_key].trim()) else {
                orphans += 1;
                continue;
            };
            let subject = &subject_rows[s_idx];
            records.push(Record {
                entity_id: subject.entity_id.clone(),
                group_label: subject.group_label.clone(),
                time_point: parse_cell::<TimePoint>(observations, i, &columns.time, &row[o_time])?,
                value: parse_cell::<f64>(observations, i, &columns.value, &row[o_value])?,
                weight: subject.weight,
            });
        }

        if orphans > 0 {
            warn!(table = %observations.name, dropped = orphans, "Dropped observations with no matching subject");
        }
        if records.is_empty() {
            return Err(DataLoadError::EmptyJoin { left: subjects.name.clone(), right: observations.name.clone() });
        }

        let store = Self::from_parts(subject_rows, records);
        info!(records = store.len(), subjects = store.subjects.len(), groups = store.labels.len(), "Dataset loaded");
        Ok(store)
    }

    /// Builds a store from already-typed rows.
    pub fn from_parts(subjects: Vec<Subject>, records: Vec<Record>) -> Self {
        let mut by_group: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, r) in records.iter().enumerate() {
            by_group.entry(r.group_label.clone()).or_default().push(i);
        }
        let labels = subjects.iter().map(|s| s.group_label.clone())
            .chain(records.iter().map(|r| r.group_label.clone()))
            .collect();
        Self { records, subjects, by_group, labels }
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn records(&self) -> &[Record] { &self.records }
    pub fn subjects(&self) -> &[Subject] { &self.subjects }

    /// Sorted distinct group labels across subjects and records.
    pub fn group_labels(&self) -> impl Iterator<Item = &str> { self.labels.iter().map(String::as_str) }

    pub fn has_label(&self, label: &str) -> bool { self.labels.contains(label) }

    /// True only if at least one joined record carries `label`. Subject-only
    /// labels (entities never observed) do not count.
    pub fn has_records(&self, label: &str) -> bool {
        self.by_group.get(label).map_or(false, |idx| !idx.is_empty())
    }

    /// All records matching `predicate`, in load order. Never fails; no match
    /// yields an empty vector.
    pub fn query(&self, predicate: &Predicate) -> Vec<&Record> {
        match &predicate.groups {
            None => self.records.iter().filter(|r| predicate.matches(r)).collect(),
            Some(groups) => {
                // Merge the per-label index lists so output stays in load order.
                let mut idx: Vec<usize> = groups.iter()
                    .filter_map(|g| self.by_group.get(g))
                    .flatten()
                    .copied()
                    .collect();
                idx.sort_unstable();
                idx.dedup();
                idx.into_iter().map(|i| &self.records[i]).filter(|r| predicate.matches(r)).collect()
            }
        }
    }

    /// Raw values of `source` for a single label (or every label when `None`).
    pub fn values(&self, source: ValueSource, label: Option<&str>) -> Vec<f64> {
        match source {
            ValueSource::SubjectWeight => self.subjects.iter()
                .filter(|s| label.map_or(true, |l| s.group_label == l))
                .map(|s| s.weight)
                .collect(),
            ValueSource::RecordWeight | ValueSource::Measurement => {
                let pick = |r: &Record| if source == ValueSource::Measurement { r.value } else { r.weight };
                match label {
                    None => self.records.iter().map(pick).collect(),
                    Some(l) => self.by_group.get(l)
                        .map(|idx| idx.iter().map(|&i| pick(&self.records[i])).collect())
                        .unwrap_or_default(),
                }
            }
        }
    }

    /// Min and max of `source` over the full dataset.
    pub fn value_range(&self, source: ValueSource) -> Option<(f64, f64)> {
        self.values(source, None).into_iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

fn join_key(table: &Table, column: &str) -> Result<usize, DataLoadError> {
    table.column_index(column).ok_or_else(|| DataLoadError::MissingJoinKey { table: table.name.clone(), column: column.to_string() })
}

fn required(table: &Table, column: &str) -> Result<usize, DataLoadError> {
    table.column_index(column).ok_or_else(|| DataLoadError::MissingColumn { table: table.name.clone(), column: column.to_string() })
}

fn parse_cell<T: std::str::FromStr>(table: &Table, row: usize, column: &str, raw: &str) -> Result<T, DataLoadError> {
    raw.trim().parse::<T>().map_err(|_| DataLoadError::InvalidCell {
        table: table.name.clone(),
        row: row + 1,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
