use std::path::PathBuf;

use clap::Parser;
use rect_tracker::{replay, ReplayInput};

#[cfg(not(feature = "tracing"))]
use log::info;

#[cfg(feature = "tracing")]
use tracing::info;

#[cfg(not(feature = "tracing"))]
use rect_tracker::core::{init_with_level, parse_level};
#[cfg(feature = "tracing")]
use rect_tracker::core::init_tracing;

/// Replay recorded candidate corners through the rectangle tracker.
#[derive(Debug, Parser)]
#[command(name = "rect-track-replay", version)]
struct Args {
    /// JSON file with `params` (optional) and per-frame `frames`.
    #[arg(short, long)]
    input: PathBuf,
    /// Where to write the JSON report; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log level for the stderr logger.
    #[arg(long, default_value = "info")]
    #[cfg_attr(feature = "tracing", allow(dead_code))]
    log_level: String,
    /// Emit JSON log lines (tracing builds only).
    #[arg(long)]
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    json_logs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    #[cfg(not(feature = "tracing"))]
    init_with_level(parse_level(&args.log_level))?;

    #[cfg(feature = "tracing")]
    init_tracing(args.json_logs);

    run(&args)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = ReplayInput::load_json(&args.input)?;
    info!(
        "loaded {} frames from {}",
        input.frames.len(),
        args.input.display()
    );

    let report = replay(&input)?;

    match &args.output {
        Some(path) => {
            report.write_json(path)?;
            info!("report written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
