//! Presentation boundary: chart descriptions, styles, sinks and traces.
pub mod chart;
pub mod sink;
pub mod style;
pub mod trace;

pub use chart::{Chart, ChartOptions, ChartSeries, CompositionMode, SeriesData};
pub use sink::{JsonSink, RecordingSink, RenderSink};
pub use style::{BaselineStyle, StyleHint, StyleTable};
pub use trace::format_trace;
