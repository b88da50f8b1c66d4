//! Field and curve primitives consumed by the walk.

pub mod scalar;
pub mod secp;

pub use scalar::Scalar;
pub use secp::{Point, Secp256k1};
