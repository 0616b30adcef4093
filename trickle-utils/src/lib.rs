//! # Trickle utils
//!
//! Shared leaf types for the finite liquid simulation: positions, directions,
//! block update flags and logger setup.

pub mod direction;
pub mod logger;
pub mod math;
pub mod types;

pub use direction::Direction;
pub use types::{BlockPos, UpdateFlags};
