//! `wellcorr` - replay pick-editing events against a set of wells.
//!
//! ```bash
//! # Apply a JSON-lines event script and print the resulting pick table
//! wellcorr --wells wells.json --picks tops.csv --events session.jsonl
//!
//! # Also dump the rendered log view, cross-section and table as JSON
//! wellcorr --wells wells.json --events session.jsonl --render views.json
//! ```
//!
//! Event lines look like `{"event":"well_selected","uwi":"Torosa-1"}`.
//! `RUST_LOG` sets the log level (default: info).

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wellcorr::{
    config::AppConfig,
    core::store::PickStore,
    persist,
    protocol::{editor::PickEditor, event::EditEvent},
    runtime::{events::PickerEvent, handle::spawn_picker},
    views::render_all,
    well::WellSet,
};

#[derive(Parser, Debug)]
#[command(name = "wellcorr")]
#[command(about = "Correlate stratigraphic picks across wells")]
#[command(version)]
struct CliArgs {
    /// JSON file with the wells and their curves
    #[arg(long, env = "WELLCORR_WELLS")]
    wells: PathBuf,

    /// Initial picks (.csv, .json, .db)
    #[arg(long)]
    picks: Option<PathBuf>,

    /// Config file (otherwise $WELLCORR_CONFIG or ./wellcorr.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines event script; `-` reads stdin
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the rendered views as JSON
    #[arg(long)]
    render: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let cfg = AppConfig::load(args.config.as_deref()).context("loading config")?;

    let wells_file = File::open(&args.wells)
        .with_context(|| format!("opening wells file {}", args.wells.display()))?;
    let wells = Arc::new(
        WellSet::from_json_reader(BufReader::new(wells_file))
            .with_context(|| format!("reading wells from {}", args.wells.display()))?,
    );

    let store = match &args.picks {
        Some(path) => {
            let rows = persist::load_rows(path)
                .with_context(|| format!("loading picks from {}", path.display()))?;
            PickStore::from_rows(rows).context("building pick store")?
        }
        None => PickStore::new(),
    };

    let editor = PickEditor::new(Arc::clone(&wells), store).with_save_dir(&cfg.save_dir);
    let handle = spawn_picker(editor, cfg.runtime.clone());
    let mut events = handle.subscribe();

    if let Some(path) = &args.events {
        let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(path)
                .with_context(|| format!("opening event script {}", path.display()))?;
            Box::new(BufReader::new(file))
        };

        let mut applied = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.context("reading event script")?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let event: EditEvent = match serde_json::from_str(&line) {
                Ok(event) => event,
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "skipping malformed event");
                    continue;
                }
            };
            match handle.apply(event).await {
                Ok(_) => applied += 1,
                Err(e) => warn!(line = idx + 1, error = %e, "event rejected"),
            }
        }
        info!(applied, "event script replayed");
    }

    if let Err(e) = handle.flush().await {
        warn!(error = %e, "some saves failed");
    }
    while let Ok(evt) = events.try_recv() {
        if let PickerEvent::SaveFailed { path, message } = evt {
            eprintln!("save to {} failed: {message}", path.display());
        }
    }

    let snapshot = handle.snapshot().await.context("reading snapshot")?;
    let legend = cfg.legend();
    let views = render_all(&wells, &snapshot, &legend, &cfg.views);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let table = persist::csv::encode(&views.table).context("encoding pick table")?;
    out.write_all(table.as_bytes())?;
    out.flush()?;

    if let Some(path) = &args.render {
        let file = File::create(path)
            .with_context(|| format!("creating render output {}", path.display()))?;
        views
            .write_json(file)
            .with_context(|| format!("writing rendered views to {}", path.display()))?;
        info!(path = %path.display(), version = views.version, "views written");
    }

    handle.shutdown().await.context("shutting down runtime")?;
    Ok(())
}
