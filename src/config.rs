//! Engine configuration
//!
//! Parsed and validated once at initialization, then frozen. Out-of-bounds
//! thread counts and DP thresholds are clamped with a warning rather than
//! rejected; bad keys and ranges are hard errors.

use log::warn;

use crate::error::{Result, SolverError};
use crate::math::{Point, Scalar, Secp256k1};

pub const MIN_THREADS: i32 = 1;
pub const MAX_THREADS: i32 = 64;
pub const MIN_DP_BITS: i32 = 8;
pub const MAX_DP_BITS: i32 = 32;

/// Frozen engine parameters. Reconfiguration requires a full stop and a new
/// `initialize`.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Target public key point.
    pub target: Point,
    /// Inclusive lower bound of the key interval.
    pub range_start: Scalar,
    /// Exclusive upper bound of the key interval.
    pub range_end: Scalar,
    /// `range_end - range_start`.
    pub range_width: Scalar,
    pub threads: u32,
    pub dp_bits: u32,
}

impl SolverConfig {
    /// Parse and validate raw inputs.
    ///
    /// Fails with `InvalidPubKey` on a malformed or off-curve key and
    /// `InvalidRange` on unparsable bounds or `start >= end`.
    pub fn from_args(
        curve: &Secp256k1,
        pubkey_hex: &str,
        range_start_hex: &str,
        range_end_hex: &str,
        threads: i32,
        dp_bits: i32,
    ) -> Result<Self> {
        let target = curve
            .parse_point_hex(pubkey_hex)
            .map_err(|e| SolverError::InvalidPubKey(e.to_string()))?;

        let range_start = Scalar::from_hex(range_start_hex)
            .map_err(|e| SolverError::InvalidRange(e.to_string()))?;
        let range_end = Scalar::from_hex(range_end_hex)
            .map_err(|e| SolverError::InvalidRange(e.to_string()))?;
        let range_width = range_end.checked_sub(&range_start).ok_or_else(|| {
            SolverError::InvalidRange("start must be below end".to_string())
        })?;
        if range_width.is_zero() {
            return Err(SolverError::InvalidRange(
                "start must be below end".to_string(),
            ));
        }

        let clamped_threads = threads.clamp(MIN_THREADS, MAX_THREADS);
        if clamped_threads != threads {
            warn!("thread count {threads} out of range, clamped to {clamped_threads}");
        }
        let clamped_dp_bits = dp_bits.clamp(MIN_DP_BITS, MAX_DP_BITS);
        if clamped_dp_bits != dp_bits {
            warn!("dp_bits {dp_bits} out of range, clamped to {clamped_dp_bits}");
        }

        Ok(SolverConfig {
            target,
            range_start,
            range_end,
            range_width,
            threads: clamped_threads as u32,
            dp_bits: clamped_dp_bits as u32,
        })
    }
}
