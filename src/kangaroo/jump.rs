//! Precomputed jump table
//!
//! The pseudorandom stepping function for the walk: 256 fixed
//! `(delta, [delta]G)` pairs sized to the search interval, selected by the
//! low byte of the current x-coordinate.

use crate::math::{Point, Scalar, Secp256k1};

/// Number of jump entries. The selector is the low byte of `x`, so the
/// table size matches one byte of entropy.
pub const JUMP_COUNT: usize = 256;

/// A single precomputed jump: scalar offset and its generator multiple.
#[derive(Debug, Clone)]
pub struct JumpEntry {
    pub delta: Scalar,
    pub step: Point,
}

/// Immutable table of [`JUMP_COUNT`] jumps.
///
/// Mean jump magnitude is about `sqrt(|range|) / 256`, which puts the
/// expected work to a collision near `sqrt(N)` group operations.
#[derive(Debug, Clone)]
pub struct JumpTable {
    entries: Vec<JumpEntry>,
}

impl JumpTable {
    /// Build the table for an interval of the given width.
    ///
    /// `delta_i = 2^max(1, r/2 - 8) + (i + 1)` where `r` is the bit length
    /// of the width; each `step_i` is `[delta_i]G`.
    pub fn build(curve: &Secp256k1, range_width: &Scalar) -> Self {
        let range_bits = range_width.bit_length() as i64;
        let base_bits = (range_bits / 2 - 8).max(1) as u64;
        let base = Scalar::one().shl(base_bits);

        let mut entries = Vec::with_capacity(JUMP_COUNT);
        for i in 0..JUMP_COUNT {
            let delta = base.add(&Scalar::from_u64(i as u64 + 1));
            let step = curve.mul(&delta, curve.generator());
            entries.push(JumpEntry { delta, step });
        }

        log::info!(
            "precomputed {} jumps, base magnitude 2^{}",
            entries.len(),
            base_bits
        );
        JumpTable { entries }
    }

    /// Deterministic selector: low byte of `x(P)`.
    pub fn index_for(&self, point: &Point) -> usize {
        (point.x().low_u64() as u8) as usize % self.entries.len()
    }

    pub fn entry(&self, index: usize) -> &JumpEntry {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JumpEntry> {
        self.entries.iter()
    }
}
