//! # Trickle core
//!
//! A quantized, conservative liquid for voxel grids. Each liquid cell holds a
//! volume between 1 and 16; a scheduled spread job redistributes that volume
//! downward and sideways with a bounded breadth-first flood fill that mutates
//! the grid in place.
//!
//! # Architecture
//!
//! - [`grid`] - the collaborator traits the liquid is written against
//! - [`liquid`] - amount codec, flood fill engine, bounding boxes and the
//!   [`liquid::FiniteLiquid`] block behaviour
//! - [`ticks`] - coalescing scheduled-tick queue
//! - [`world`] - an in-memory world implementing the collaborator traits
//! - [`config`] - JSON5 configuration

pub mod config;
pub mod grid;
pub mod liquid;
pub mod ticks;
pub mod world;

pub use grid::{BlockAccess, BlockKind, BlockState, TickTrigger};
pub use liquid::FiniteLiquid;
pub use world::World;
