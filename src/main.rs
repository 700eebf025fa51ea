//! cohort-dash: loads a dashboard, renders it, replays selection events.
use clap::Parser;
use cohort_dash_core::display::{format_trace, JsonSink};
use cohort_dash_core::{startup, ConfigurationError, DashboardConfig, SelectionEvent, StartupError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Dashboard definition (TOML). Defaults to the bundled mouse study.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the subject table path
    #[arg(long)]
    subjects: Option<PathBuf>,

    /// Override the observation table path
    #[arg(long)]
    observations: Option<PathBuf>,

    /// JSON array of selection events, replayed in order
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print the dependency tree of this view to stderr at the end
    #[arg(long)]
    trace: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), StartupError> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::mouse_study()?,
    };
    if let Some(p) = args.subjects {
        config.data.subjects = p;
    }
    if let Some(p) = args.observations {
        config.data.observations = p;
    }

    let events = match &args.events {
        Some(path) => read_events(path)?,
        None => Vec::new(),
    };

    let mut sync = startup(&config)?;
    let mut sink = JsonSink::new(io::stdout().lock());
    sync.render_all(&mut sink);

    // Rejected events are logged and skipped; the dashboard keeps running.
    for event in &events {
        match sync.apply(event) {
            Ok(report) if report.is_noop() => info!(node = %event.node, "No change"),
            Ok(_) => {
                sync.render_pending(&mut sink);
            }
            Err(e) => warn!(node = %event.node, error = %e, "Event rejected"),
        }
    }

    if let Some(name) = &args.trace {
        match sync.view_id(name) {
            Ok(view) => eprint!("{}", format_trace(&sync, view)),
            Err(e) => warn!(error = %e, "Cannot trace"),
        }
    }
    Ok(())
}

fn read_events(path: &Path) -> Result<Vec<SelectionEvent>, StartupError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigurationError::Unreadable {
        path: path.display().to_string(),
        msg: e.to_string(),
    })?;
    let events = serde_json::from_str(&text).map_err(|e| ConfigurationError::Invalid(format!(
        "events file '{}': {}",
        path.display(),
        e
    )))?;
    Ok(events)
}
