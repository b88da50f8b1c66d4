//! RooCrack - parallel Pollard's kangaroo (lambda) solver for secp256k1
//!
//! Recovers a private scalar known to lie in a bounded interval of the
//! secp256k1 scalar field. Tame and wild walks step through a precomputed
//! jump table and rendezvous at distinguished points; a verified
//! tame/wild collision yields the key.
//!
//! The typed [`KangarooSolver`] handle is the primary API; `ffi` exposes
//! the same lifecycle as a flat C surface behind a process singleton.

#![deny(unsafe_code)]

pub mod checkpoint;
pub mod config;
pub mod dp;
pub mod error;
#[allow(unsafe_code)]
pub mod ffi;
pub mod kangaroo;
pub mod logging;
pub mod math;

pub use config::SolverConfig;
pub use error::{Result, SolverError};
pub use kangaroo::{KangarooSolver, Stats};
pub use math::{Point, Scalar, Secp256k1};
