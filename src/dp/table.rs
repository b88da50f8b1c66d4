//! Distinguished-point table with collision detection
//!
//! One map from point identity to entry, shared behind a single mutex. The
//! publish transaction (lookup, conditional insert, key derivation and
//! verification on an opposite-kind hit) runs entirely under that lock so
//! the solved flag stays monotone.

use std::collections::HashMap;

use crate::kangaroo::collision::CollisionSolver;
use crate::math::{Point, Scalar};

/// One stored distinguished point.
#[derive(Debug, Clone)]
pub struct DpEntry {
    pub point: Point,
    /// Accumulated walk offset from the walker's origin.
    pub distance: Scalar,
    pub is_tame: bool,
    /// Elapsed engine seconds when the entry was stored.
    pub seen_at: u64,
}

/// Result of publishing a distinguished point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// New entry stored.
    Stored,
    /// Same point already present from the same walk family; table untouched.
    DuplicateSameKind,
    /// Opposite-kind hit whose derived key failed verification.
    FalsePositive,
    /// Opposite-kind hit; the verified private key.
    Solved(Scalar),
}

/// Map from point key to entry. At most one entry per key until cleared.
#[derive(Debug, Default)]
pub struct DpTable {
    entries: HashMap<String, DpEntry>,
}

impl DpTable {
    pub fn new() -> Self {
        DpTable {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &str) -> Option<&DpEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DpEntry> {
        self.entries.values()
    }

    /// Insert without collision handling (checkpoint restore path).
    /// Returns false when the key was already present.
    pub fn insert(&mut self, entry: DpEntry) -> bool {
        let key = entry.point.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    /// The publish transaction. The caller holds the table lock for the
    /// whole call, including verification.
    pub fn publish(
        &mut self,
        point: &Point,
        distance: &Scalar,
        is_tame: bool,
        seen_at: u64,
        solver: &CollisionSolver,
    ) -> PublishOutcome {
        let key = point.key();
        match self.entries.get(&key) {
            None => {
                self.entries.insert(
                    key,
                    DpEntry {
                        point: point.clone(),
                        distance: distance.clone(),
                        is_tame,
                        seen_at,
                    },
                );
                PublishOutcome::Stored
            }
            Some(existing) if existing.is_tame == is_tame => PublishOutcome::DuplicateSameKind,
            Some(existing) => {
                let (tame_d, wild_d) = if is_tame {
                    (distance, &existing.distance)
                } else {
                    (&existing.distance, distance)
                };
                match solver.solve(tame_d, wild_d) {
                    Some(key) => PublishOutcome::Solved(key),
                    // Existing entry is kept; the walk continues.
                    None => PublishOutcome::FalsePositive,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Secp256k1;

    fn setup() -> (Secp256k1, CollisionSolver, Point) {
        let curve = Secp256k1::new();
        let target = curve.mul(&Scalar::from_u64(5), curve.generator());
        let solver = CollisionSolver::new(curve.clone(), target);
        // Any finite point works as a rendezvous key for table tests.
        let meeting = curve.mul(&Scalar::from_u64(9), curve.generator());
        (curve, solver, meeting)
    }

    #[test]
    fn test_publish_stores_new_point() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();

        let outcome = table.publish(&meeting, &Scalar::from_u64(12), true, 1, &solver);
        assert_eq!(outcome, PublishOutcome::Stored);
        assert_eq!(table.len(), 1);
        assert!(table.get(&meeting.key()).is_some());
    }

    #[test]
    fn test_publish_same_kind_keeps_original() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();

        table.publish(&meeting, &Scalar::from_u64(12), true, 1, &solver);
        let outcome = table.publish(&meeting, &Scalar::from_u64(99), true, 2, &solver);
        assert_eq!(outcome, PublishOutcome::DuplicateSameKind);
        assert_eq!(table.len(), 1);
        // First writer wins.
        assert_eq!(
            table.get(&meeting.key()).unwrap().distance,
            Scalar::from_u64(12)
        );
    }

    #[test]
    fn test_publish_opposite_kind_solves() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();

        // Tame at d=12, wild at d=7: key = 12 - 7 = 5 = the target's log.
        table.publish(&meeting, &Scalar::from_u64(12), true, 1, &solver);
        let outcome = table.publish(&meeting, &Scalar::from_u64(7), false, 2, &solver);
        assert_eq!(outcome, PublishOutcome::Solved(Scalar::from_u64(5)));
    }

    #[test]
    fn test_publish_wild_first_then_tame() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();

        table.publish(&meeting, &Scalar::from_u64(7), false, 1, &solver);
        let outcome = table.publish(&meeting, &Scalar::from_u64(12), true, 2, &solver);
        assert_eq!(outcome, PublishOutcome::Solved(Scalar::from_u64(5)));
    }

    #[test]
    fn test_publish_false_positive_keeps_entry() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();

        // Wrong wild distance: derived key is 12 - 8 = 4, [4]G != target.
        table.publish(&meeting, &Scalar::from_u64(8), false, 1, &solver);
        let outcome = table.publish(&meeting, &Scalar::from_u64(12), true, 2, &solver);
        assert_eq!(outcome, PublishOutcome::FalsePositive);
        assert_eq!(table.len(), 1);
        assert!(!table.get(&meeting.key()).unwrap().is_tame);
    }

    #[test]
    fn test_insert_rejects_duplicate_key() {
        let (_, _, meeting) = setup();
        let mut table = DpTable::new();

        let entry = DpEntry {
            point: meeting.clone(),
            distance: Scalar::from_u64(1),
            is_tame: true,
            seen_at: 0,
        };
        assert!(table.insert(entry.clone()));
        assert!(!table.insert(entry));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clear() {
        let (_, solver, meeting) = setup();
        let mut table = DpTable::new();
        table.publish(&meeting, &Scalar::from_u64(12), true, 1, &solver);
        table.clear();
        assert!(table.is_empty());
    }
}
