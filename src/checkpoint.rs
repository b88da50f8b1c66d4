//! Checkpoint codec
//!
//! Self-describing JSON snapshot of the DP table and run metadata. Writes
//! back up any prior file at the target path, then go through a temp file
//! and an atomic rename. Reads validate structure before anything is
//! restored.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::dp::DpEntry;
use crate::error::{Result, SolverError};
use crate::math::{Point, Scalar, Secp256k1};

pub const CHECKPOINT_VERSION: &str = "1.0.0";

/// One serialized distinguished point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDp {
    /// Point key, `x:y` in canonical hex.
    pub point: String,
    /// Walk distance, hex.
    pub distance: String,
    pub is_tame: bool,
    /// Elapsed engine seconds when the point was stored.
    pub timestamp: u64,
}

/// The checkpoint document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: String,
    /// Wall-clock seconds when written.
    pub timestamp: u64,
    pub total_jumps: u64,
    pub distinguished_points_count: u64,
    pub range_start: String,
    pub range_end: String,
    pub num_threads: u32,
    pub distinguished_bits: u32,
    pub distinguished_points: Vec<CheckpointDp>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl Checkpoint {
    /// Compose a record from a table snapshot and counters.
    pub fn compose(
        total_jumps: u64,
        range_start: String,
        range_end: String,
        num_threads: u32,
        distinguished_bits: u32,
        distinguished_points: Vec<CheckpointDp>,
    ) -> Self {
        Checkpoint {
            version: CHECKPOINT_VERSION.to_string(),
            timestamp: unix_now(),
            total_jumps,
            distinguished_points_count: distinguished_points.len() as u64,
            range_start,
            range_end,
            num_threads,
            distinguished_bits,
            distinguished_points,
        }
    }

    /// Serialize to `path`. Any existing file there is first copied to
    /// `<path>.backup.<unix_time>`; the new document is written to a temp
    /// file and renamed into place.
    pub fn write(&self, path: &Path) -> Result<()> {
        if path.exists() {
            let backup = format!("{}.backup.{}", path.display(), unix_now());
            fs::copy(path, &backup)?;
            log::info!("existing checkpoint backed up to {backup}");
        }

        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Parse and validate a checkpoint file. Fails when the file is
    /// missing, unparsable, or structurally inconsistent.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SolverError::CheckpointFormat(format!(
                "checkpoint file not found: {}",
                path.display()
            )));
        }
        let json = fs::read_to_string(path)?;
        let checkpoint: Checkpoint = serde_json::from_str(&json)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(SolverError::CheckpointFormat(
                "missing version".to_string(),
            ));
        }
        if self.timestamp == 0 {
            return Err(SolverError::CheckpointFormat(
                "missing timestamp".to_string(),
            ));
        }
        if self.distinguished_points_count != self.distinguished_points.len() as u64 {
            return Err(SolverError::CheckpointFormat(format!(
                "distinguished point count {} does not match stored entries {}",
                self.distinguished_points_count,
                self.distinguished_points.len()
            )));
        }
        Ok(())
    }

    /// Decode the stored DP set, checking each point against the curve.
    pub fn to_entries(&self, curve: &Secp256k1) -> Result<Vec<DpEntry>> {
        self.distinguished_points
            .iter()
            .map(|dp| {
                let point = Point::from_key(&dp.point)?;
                if !curve.is_on_curve(&point) {
                    return Err(SolverError::CheckpointFormat(format!(
                        "stored point is not on the curve: {}",
                        dp.point
                    )));
                }
                Ok(DpEntry {
                    point,
                    distance: Scalar::from_hex(&dp.distance)?,
                    is_tame: dp.is_tame,
                    seen_at: dp.timestamp,
                })
            })
            .collect()
    }
}
