//! Tame and wild walkers
//!
//! Each worker thread owns one long-running walk. Tame walks start at a
//! random known offset from G inside the interval; wild walks start at the
//! target. Both step through the shared jump table and publish distinguished
//! points; the walk that lands a verified collision flags the engine solved.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::dp::is_distinguished;
use crate::kangaroo::solver::SharedState;
use crate::math::Scalar;

/// Wild walks reset once their distance outgrows this bit length.
pub(crate) const WILD_DISTANCE_BITS: u64 = 80;
/// Local jump counts are folded into the global counter in batches.
const REPORT_INTERVAL: u64 = 10_000;

/// Thread entry point. Panics are contained here so one crashed walker
/// never takes the pool down.
pub(crate) fn run(shared: &SharedState, worker_id: usize) {
    let result = catch_unwind(AssertUnwindSafe(|| {
        if worker_id % 2 == 0 {
            tame_walk(shared, worker_id);
        } else {
            wild_walk(shared);
        }
    }));
    if result.is_err() {
        log::error!("walker {worker_id} panicked, thread exiting");
    }
}

/// Tame walk: cursor starts at `([k0]G, k0)` and re-seeds whenever the
/// distance leaves the interval.
fn tame_walk(shared: &SharedState, worker_id: usize) {
    let mut rng = StdRng::seed_from_u64(OsRng.next_u64() ^ worker_id as u64);

    let mut distance = random_in_range(&mut rng, &shared.range_start, &shared.range_width);
    let mut point = shared.curve.mul(&distance, shared.curve.generator());
    let mut local_jumps: u64 = 0;

    while shared.is_live() {
        if is_distinguished(&point, shared.dp_bits) && shared.publish_dp(&point, &distance, true) {
            break;
        }

        let entry = shared.jumps.entry(shared.jumps.index_for(&point));
        point = shared.curve.add(&point, &entry.step);
        distance = distance.add(&entry.delta);

        local_jumps += 1;
        if local_jumps % REPORT_INTERVAL == 0 {
            shared.add_jumps(REPORT_INTERVAL);
        }

        if distance > shared.range_end {
            distance = random_in_range(&mut rng, &shared.range_start, &shared.range_width);
            point = shared.curve.mul(&distance, shared.curve.generator());
        }
    }

    shared.add_jumps(local_jumps % REPORT_INTERVAL);
}

/// Wild walk: cursor starts at `(target, 0)` and resets when the distance
/// outgrows the wild cap.
fn wild_walk(shared: &SharedState) {
    let mut point = shared.target.clone();
    let mut distance = Scalar::zero();
    let mut local_jumps: u64 = 0;

    while shared.is_live() {
        if is_distinguished(&point, shared.dp_bits) && shared.publish_dp(&point, &distance, false) {
            break;
        }

        let entry = shared.jumps.entry(shared.jumps.index_for(&point));
        point = shared.curve.add(&point, &entry.step);
        distance = distance.add(&entry.delta);

        local_jumps += 1;
        if local_jumps % REPORT_INTERVAL == 0 {
            shared.add_jumps(REPORT_INTERVAL);
        }

        if distance.bit_length() > WILD_DISTANCE_BITS {
            point = shared.target.clone();
            distance = Scalar::zero();
        }
    }

    shared.add_jumps(local_jumps % REPORT_INTERVAL);
}

/// Random scalar in `[start, start + width)` from a single 64-bit draw.
/// The modulo is biased when the width is not a power of two; seeding does
/// not depend on uniformity.
fn random_in_range(rng: &mut StdRng, start: &Scalar, width: &Scalar) -> Scalar {
    let offset = Scalar::from_u64(rng.next_u64()).rem(width);
    start.add(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_range_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = Scalar::from_u64(0x1000);
        let width = Scalar::from_u64(0x300);
        let end = start.add(&width);

        for _ in 0..200 {
            let k = random_in_range(&mut rng, &start, &width);
            assert!(k >= start && k < end);
        }
    }

    #[test]
    fn test_random_in_range_tiny_width() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = Scalar::zero();
        let width = Scalar::one();
        for _ in 0..10 {
            assert_eq!(random_in_range(&mut rng, &start, &width), Scalar::zero());
        }
    }
}
