//! sink.rs
//! The rendering boundary. The core hands over finished chart descriptions
//! and per-view failures; presentation is entirely the sink's business.

use super::chart::Chart;
use crate::error::ConfigurationError;
use serde::Serialize;
use std::io::Write;
use tracing::warn;

pub trait RenderSink {
    fn render(&mut self, view: &str, chart: &Chart);

    /// A view that failed renders nothing; the sink decides how to surface it.
    fn report(&mut self, view: &str, error: &ConfigurationError) {
        warn!(view, %error, "View not rendered");
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    view: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<&'a Chart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Writes one JSON object per line: `{"view": .., "chart": ..}` or `{"view": .., "error": ..}`.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self { Self { out } }
    pub fn into_inner(self) -> W { self.out }

    fn emit(&mut self, envelope: &Envelope) {
        let line = match serde_json::to_string(envelope) {
            Ok(line) => line,
            Err(e) => {
                warn!(view = envelope.view, error = %e, "Failed to serialize chart");
                return;
            }
        };
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(view = envelope.view, error = %e, "Failed to write chart");
        }
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn render(&mut self, view: &str, chart: &Chart) {
        self.emit(&Envelope { view, chart: Some(chart), error: None });
    }

    fn report(&mut self, view: &str, error: &ConfigurationError) {
        warn!(view, %error, "View not rendered");
        self.emit(&Envelope { view, chart: None, error: Some(error.to_string()) });
    }
}

/// Keeps everything it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub rendered: Vec<(String, Chart)>,
    pub errors: Vec<(String, ConfigurationError)>,
}

impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    pub fn last_chart(&self, view: &str) -> Option<&Chart> {
        self.rendered.iter().rev().find(|(v, _)| v == view).map(|(_, c)| c)
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, view: &str, chart: &Chart) {
        self.rendered.push((view.to_string(), chart.clone()));
    }

    fn report(&mut self, view: &str, error: &ConfigurationError) {
        self.errors.push((view.to_string(), error.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::chart::CompositionMode;

    fn empty_chart() -> Chart {
        Chart { series: vec![], x_title: "x".into(), y_title: "y".into(), x_range: None, mode: CompositionMode::Line }
    }

    #[test]
    fn test_json_sink_writes_lines() {
        let mut sink = JsonSink::new(Vec::new());
        sink.render("survival", &empty_chart());
        sink.report("weights", &ConfigurationError::MissingStyle { label: "Z".into() });
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["view"], "survival");
        assert_eq!(lines[0]["chart"]["mode"], "line");
        assert!(lines[1]["error"].as_str().unwrap().contains("'Z'"));
    }

    #[test]
    fn test_recording_sink_last_chart() {
        let mut sink = RecordingSink::new();
        sink.render("a", &empty_chart());
        let mut second = empty_chart();
        second.x_title = "second".into();
        sink.render("a", &second);
        assert_eq!(sink.last_chart("a").unwrap().x_title, "second");
        assert!(sink.last_chart("b").is_none());
    }
}
