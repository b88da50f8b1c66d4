//! Logging setup and progress reporting helpers.

use crate::kangaroo::Stats;

/// Initialize env_logger with an `info` default filter. `RUST_LOG`
/// overrides as usual.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// One progress line per reporting tick.
pub fn log_progress(stats: &Stats) {
    let rate = if stats.elapsed_seconds > 0 {
        stats.total_jumps / stats.elapsed_seconds
    } else {
        stats.total_jumps
    };
    log::info!(
        "{} jumps ({rate}/s), {} distinguished points, {} collisions, {}s elapsed",
        stats.total_jumps,
        stats.distinguished_points,
        stats.collisions_found,
        stats.elapsed_seconds
    );
}
