//! Replay a recorded detection stream through a tripwire session.
//!
//! The detections file holds one JSON array of `[min_x, min_y, max_x, max_y]`
//! boxes per line, one line per frame. `[]` is a frame without detections.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tripwire_rs::{SessionConfig, replay};

#[derive(Parser, Debug)]
#[command(name = "tripwire-replay", about = "Replay recorded detections against a perimeter")]
struct Args {
    /// Session config (JSON)
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Detections, one JSON array of boxes per line
    #[arg(long, value_name = "PATH")]
    detections: PathBuf,
    /// Alert log path, overrides the config
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = SessionConfig::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(log) = &args.log {
        config.alert.log_path = log.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tripwire_rs=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let detections = File::open(&args.detections)
        .with_context(|| format!("opening detections {}", args.detections.display()))?;
    let summary = replay(BufReader::new(detections), &config)
        .with_context(|| format!("replaying {}", args.detections.display()))?;

    let stats = summary.session;
    info!(
        frames_read = summary.frames_read,
        frames_processed = stats.frames_processed,
        objects = stats.objects_registered,
        enter = stats.enter_events,
        exit = stats.exit_events,
        alerts = summary.alerts_recorded,
        log = %config.alert.log_path.display(),
        "replay finished"
    );
    println!(
        "frames: {} processed / {} read, objects: {}, ENTER: {}, EXIT: {}, alerts logged: {}",
        stats.frames_processed,
        summary.frames_read,
        stats.objects_registered,
        stats.enter_events,
        stats.exit_events,
        summary.alerts_recorded
    );

    Ok(())
}
