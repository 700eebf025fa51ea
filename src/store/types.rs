use serde::{Serialize, Deserialize};
use std::ops::RangeInclusive;

pub type TimePoint = u32;

/// One joined observation: a subject's measurement at a time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub entity_id: String,
    pub group_label: String,
    pub time_point: TimePoint,
    pub value: f64,
    /// Subject attribute carried onto every joined row.
    pub weight: f64,
}

/// One row of the subject table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub entity_id: String,
    pub group_label: String,
    pub weight: f64,
}

/// Which numeric column a histogram draws its raw values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSource {
    /// One weight per subject.
    SubjectWeight,
    /// Subject weight repeated on every joined observation.
    RecordWeight,
    /// The time-series measurement.
    Measurement,
}

/// Filter over group label and/or time point. `None` means unrestricted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub groups: Option<Vec<String>>,
    pub time: Option<RangeInclusive<TimePoint>>,
}

impl Predicate {
    pub fn all() -> Self { Self::default() }

    pub fn groups<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { groups: Some(labels.into_iter().map(Into::into).collect()), time: None }
    }

    pub fn with_time(mut self, range: RangeInclusive<TimePoint>) -> Self {
        self.time = Some(range);
        self
    }

    #[inline]
    pub fn matches(&self, record: &Record) -> bool {
        let group_ok = self.groups.as_ref().map_or(true, |g| g.iter().any(|l| *l == record.group_label));
        let time_ok = self.time.as_ref().map_or(true, |t| t.contains(&record.time_point));
        group_ok && time_ok
    }
}
