//! chart.rs
//! Declarative chart description handed to the rendering sink.

use super::style::{StyleHint, StyleTable};
use crate::compute::pipeline::DerivedSeries;
use crate::error::ConfigurationError;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionMode {
    #[default]
    Stacked,
    Overlaid,
    Line,
}

/// Per-view presentation settings that do not depend on the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub x_title: String,
    #[serde(default)]
    pub y_title: String,
    #[serde(default)]
    pub mode: CompositionMode,
    #[serde(default = "ChartOptions::default_opacity")]
    pub opacity: f64,
    /// Pin the x axis to the full-data range of the histogram source.
    #[serde(default)]
    pub fixed_x_range: bool,
}

impl ChartOptions {
    fn default_opacity() -> f64 { 1.0 }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            x_title: String::new(),
            y_title: String::new(),
            mode: CompositionMode::default(),
            opacity: Self::default_opacity(),
            fixed_x_range: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SeriesData {
    /// Unbinned values.
    Raw { values: Vec<f64> },
    Points { x: Vec<f64>, y: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: SeriesData,
    pub style: StyleHint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub series: Vec<ChartSeries>,
    pub x_title: String,
    pub y_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_range: Option<(f64, f64)>,
    pub mode: CompositionMode,
}

impl Chart {
    /// Styles every series. Any label without a style fails the whole chart;
    /// a partially colored chart is never produced.
    pub fn build(
        derived: &DerivedSeries,
        options: &ChartOptions,
        styles: &StyleTable,
        x_range: Option<(f64, f64)>,
    ) -> Result<Self, ConfigurationError> {
        let mut series = Vec::new();

        match derived {
            DerivedSeries::HistogramSet { baseline, groups } => {
                if let Some(values) = baseline {
                    series.push(ChartSeries {
                        label: styles.baseline.label.clone(),
                        data: SeriesData::Raw { values: values.clone() },
                        style: styles.baseline_hint(),
                    });
                }
                for g in groups {
                    series.push(ChartSeries {
                        label: g.label.clone(),
                        data: SeriesData::Raw { values: g.values.clone() },
                        style: styles.style_for(&g.label, options.opacity)?,
                    });
                }
            }
            DerivedSeries::GroupedCounts { series: counts } => {
                for s in counts {
                    series.push(ChartSeries {
                        label: s.label.clone(),
                        data: SeriesData::Points {
                            x: s.points.iter().map(|&(t, _)| f64::from(t)).collect(),
                            y: s.points.iter().map(|&(_, n)| n as f64).collect(),
                        },
                        style: styles.style_for(&s.label, options.opacity)?,
                    });
                }
            }
        }

        Ok(Self {
            series,
            x_title: options.x_title.clone(),
            y_title: options.y_title.clone(),
            x_range,
            mode: options.mode,
        })
    }
}
