//! Parallel kangaroo engine: jump table, walkers, collision solving, and
//! the coordinator.

pub mod collision;
pub mod jump;
pub mod solver;
pub(crate) mod walker;

pub use collision::CollisionSolver;
pub use jump::{JumpEntry, JumpTable, JUMP_COUNT};
pub use solver::{KangarooSolver, Stats};
