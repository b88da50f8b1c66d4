//! RooCrack CLI - drive the kangaroo engine from the command line
//!
//! Initializes the solver for one target and interval, runs until a key is
//! found (or a timeout fires), and optionally writes periodic checkpoints.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use roocrack::kangaroo::KangarooSolver;
use roocrack::logging;

#[derive(Parser, Debug)]
#[command(name = "roocrack", about = "Interval ECDLP solver using Pollard's kangaroo")]
struct Args {
    /// Target public key, hex (130-char uncompressed or 66-char compressed)
    #[arg(long)]
    pubkey: String,

    /// Inclusive lower bound of the key interval, hex
    #[arg(long)]
    range_start: String,

    /// Exclusive upper bound of the key interval, hex
    #[arg(long)]
    range_end: String,

    /// Worker threads (clamped to 1..=64)
    #[arg(long, default_value_t = 4)]
    threads: i32,

    /// Distinguished-point bits (clamped to 8..=32)
    #[arg(long, default_value_t = 20)]
    dp_bits: i32,

    /// Write periodic checkpoints to this path
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Seconds between checkpoint writes
    #[arg(long, default_value_t = 300)]
    checkpoint_interval: u64,

    /// Restore the DP table from a previous checkpoint before starting
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print final stats as JSON on exit
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut solver = KangarooSolver::new();
    solver.initialize(
        &args.pubkey,
        &args.range_start,
        &args.range_end,
        args.threads,
        args.dp_bits,
    )?;

    if let Some(path) = &args.resume {
        solver.load_checkpoint(path)?;
    }

    if !solver.start() {
        anyhow::bail!("failed to start solver");
    }

    let started = Instant::now();
    let mut last_report = Instant::now();
    let mut last_checkpoint = Instant::now();

    while !solver.is_solved() {
        std::thread::sleep(Duration::from_millis(500));

        if last_report.elapsed() >= Duration::from_secs(10) {
            if let Some(stats) = solver.stats() {
                logging::log_progress(&stats);
            }
            last_report = Instant::now();
        }

        if let Some(path) = &args.checkpoint {
            if last_checkpoint.elapsed() >= Duration::from_secs(args.checkpoint_interval) {
                if let Err(e) = solver.save_checkpoint(path) {
                    error!("checkpoint save failed: {e}");
                }
                last_checkpoint = Instant::now();
            }
        }

        if let Some(timeout) = args.timeout {
            if started.elapsed() >= Duration::from_secs(timeout) {
                info!("timeout reached after {timeout}s, stopping");
                break;
            }
        }
    }

    solver.stop();

    if let Some(path) = &args.checkpoint {
        if let Err(e) = solver.save_checkpoint(path) {
            error!("final checkpoint save failed: {e}");
        }
    }

    let stats = solver.stats().expect("solver was initialized");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    match solver.solution() {
        Some(key) => {
            info!("solved after {} jumps", stats.total_jumps);
            println!("{}", key.to_hex());
            Ok(())
        }
        None => {
            info!("no solution found after {} jumps", stats.total_jumps);
            std::process::exit(1);
        }
    }
}
