//! Tame/wild collision solving
//!
//! A tame walk at `(P, d_t)` satisfies `P = [d_t]G`; a wild walk at
//! `(P, d_w)` satisfies `P = target + [d_w]G`. Equal points therefore give
//! `target = [d_t - d_w]G`.

use crate::math::{Point, Scalar, Secp256k1};

/// Derives and verifies candidate keys from opposite-kind DP collisions.
#[derive(Debug, Clone)]
pub struct CollisionSolver {
    curve: Secp256k1,
    target: Point,
}

impl CollisionSolver {
    pub fn new(curve: Secp256k1, target: Point) -> Self {
        CollisionSolver { curve, target }
    }

    pub fn target(&self) -> &Point {
        &self.target
    }

    /// `k = (d_tame - d_wild) mod n`, accepted only when `[k]G` recomputes
    /// to the target. A mismatch means the colliding entry carried a stale
    /// or non-canonical distance.
    pub fn solve(&self, tame_distance: &Scalar, wild_distance: &Scalar) -> Option<Scalar> {
        let key = tame_distance.mod_sub(wild_distance, &self.curve.n);
        if self.curve.mul(&key, self.curve.generator()) == self.target {
            Some(key)
        } else {
            None
        }
    }
}
