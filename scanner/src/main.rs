//! Passive LTE FDD downlink cell scanner.
//!
//! Reads interleaved signed-byte I/Q samples from a file and drives
//! the scanner state machine over them, printing each decoded cell's
//! MIB and system information to stdout as it completes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use phy::reference::ScriptedPhyFrontend;
use scanner::{run_scan_from_file, CellReporter, Scanner};

/// Passive LTE FDD downlink cell scanner.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a file of interleaved signed 8-bit I/Q samples.
    #[arg(short, long)]
    input: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Bytes to read from the input file per `work()` call.
    #[arg(long, default_value = "65536")]
    chunk_size: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(env_filter).with_target(true).with_line_number(true).init();

    info!("starting scan of {}", args.input.display());

    // No correlator or FEC stack is implemented in this crate (an
    // external collaborator per the PHY contract) — the scripted
    // front end drives the state machine deterministically off an
    // empty schedule, which is enough to exercise ingestion, framing,
    // and backpressure end to end against a real sample file.
    let phy = ScriptedPhyFrontend::new();
    let reporter = CellReporter::new(Box::new(std::io::stdout()));
    let mut scanner = Scanner::new(phy, reporter);

    let stats = run_scan_from_file(&mut scanner, &args.input, args.chunk_size)?;

    if stats.cells_completed == 0 {
        warn!("scan complete: no cells found");
    } else {
        info!("scan complete: {} cell(s) found", stats.cells_completed);
    }

    Ok(())
}
