//! Grid access seams.
//!
//! The liquid never owns the voxel grid. It reads and writes cells through
//! [`BlockAccess`] and re-arms itself through [`TickTrigger`]; the host world
//! implements both.

use trickle_utils::{BlockPos, UpdateFlags};

/// What occupies a cell, as far as the liquid is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// The finite liquid itself.
    Liquid,
    /// Empty space the liquid may flow into.
    #[default]
    Air,
    /// Anything else. Liquid never enters or replaces these cells.
    Other,
}

/// A cell's block kind plus its stored level.
///
/// The level is only meaningful for [`BlockKind::Liquid`], where it stores
/// `amount - 1` (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockState {
    /// The block kind.
    pub kind: BlockKind,
    /// The stored level.
    pub level: u8,
}

impl BlockState {
    /// An empty cell.
    pub const AIR: Self = Self {
        kind: BlockKind::Air,
        level: 0,
    };

    /// A solid, liquid-incompatible cell.
    pub const SOLID: Self = Self {
        kind: BlockKind::Other,
        level: 0,
    };

    /// A liquid cell with the given stored level.
    #[must_use]
    pub const fn liquid(level: u8) -> Self {
        Self {
            kind: BlockKind::Liquid,
            level,
        }
    }
}

/// Read/write access to the shared voxel grid.
///
/// Every call must appear atomic to the calling thread. A spread job holds the
/// accessor mutably for its whole run, so exactly one job writes at a time.
pub trait BlockAccess {
    /// Returns the kind of block at `pos`.
    fn get_block_kind(&self, pos: BlockPos) -> BlockKind;

    /// Returns the stored level at `pos`.
    fn get_stored_level(&self, pos: BlockPos) -> u8;

    /// Replaces the block at `pos`.
    ///
    /// Returns `false` if the write was rejected (for example outside the
    /// world's bounds).
    fn set_block_and_level(
        &mut self,
        pos: BlockPos,
        kind: BlockKind,
        level: u8,
        flags: UpdateFlags,
    ) -> bool;
}

/// Scheduler for future spread runs.
///
/// Implementations coalesce: scheduling a position that already has a pending
/// run replaces it. Scheduling never runs anything synchronously.
pub trait TickTrigger {
    /// Schedules a run of the liquid at `pos` after `delay` ticks.
    fn schedule_run(&mut self, pos: BlockPos, delay: u32);

    /// Drops any pending run at `pos`.
    fn cancel_run(&mut self, pos: BlockPos);
}
