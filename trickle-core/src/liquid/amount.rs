//! Conversion between stored block levels and liquid volume.

use trickle_utils::{BlockPos, UpdateFlags};

use crate::grid::{BlockAccess, BlockKind, TickTrigger};

/// Volume of a full liquid cell.
pub const MAX_AMOUNT: u8 = 16;

/// Reads and writes liquid volume through the grid accessor.
///
/// Volume is stored as `amount - 1` in the block level. Every write that
/// leaves liquid behind re-arms the cell's scheduled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountCodec {
    tick_delay: u32,
}

impl AmountCodec {
    /// Creates a codec that re-arms written cells after `tick_delay` ticks.
    #[must_use]
    pub const fn new(tick_delay: u32) -> Self {
        Self { tick_delay }
    }

    /// The delay used when re-arming a cell.
    #[must_use]
    pub const fn tick_delay(&self) -> u32 {
        self.tick_delay
    }

    /// Changes the re-arm delay.
    pub fn set_tick_delay(&mut self, tick_delay: u32) {
        self.tick_delay = tick_delay;
    }

    /// Returns the volume at `pos`.
    ///
    /// Air holds `Some(0)`. `None` marks an incompatible cell, which is the
    /// normal answer for any solid neighbour.
    #[must_use]
    pub fn get_amount<G: BlockAccess + ?Sized>(grid: &G, pos: BlockPos) -> Option<u8> {
        match grid.get_block_kind(pos) {
            BlockKind::Air => Some(0),
            BlockKind::Other => None,
            BlockKind::Liquid => Some(grid.get_stored_level(pos).min(MAX_AMOUNT - 1) + 1),
        }
    }

    /// Writes `amount` to `pos` without notifying neighbours.
    ///
    /// See [`Self::set_amount_with_flags`].
    pub fn set_amount<G>(&self, grid: &mut G, pos: BlockPos, amount: i32) -> bool
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        self.set_amount_with_flags(grid, pos, amount, UpdateFlags::UPDATE_CLIENTS)
    }

    /// Writes `amount` to `pos`.
    ///
    /// An amount of zero or less turns a liquid cell back into air, notifying
    /// neighbours and cancelling its pending run. Amounts above the maximum are
    /// clamped. Writing the current amount is a no-op. Returns whether the grid
    /// changed.
    pub fn set_amount_with_flags<G>(
        &self,
        grid: &mut G,
        pos: BlockPos,
        amount: i32,
        flags: UpdateFlags,
    ) -> bool
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        let current = Self::get_amount(grid, pos);

        if amount <= 0 {
            if grid.get_block_kind(pos) != BlockKind::Liquid {
                return false;
            }
            if !grid.set_block_and_level(pos, BlockKind::Air, 0, UpdateFlags::ALL) {
                return false;
            }
            grid.cancel_run(pos);
            return true;
        }

        let amount = amount.min(i32::from(MAX_AMOUNT)) as u8;
        if current == Some(amount) {
            return false;
        }
        if !grid.set_block_and_level(pos, BlockKind::Liquid, amount - 1, flags) {
            return false;
        }
        grid.schedule_run(pos, self.tick_delay);
        true
    }

    /// Pours `amount` into `pos` and returns what did not fit.
    ///
    /// Incompatible cells absorb nothing. Negative input is treated as zero.
    pub fn add_amount<G>(&self, grid: &mut G, pos: BlockPos, amount: i32) -> i32
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        let amount = amount.max(0);
        let Some(current) = Self::get_amount(grid, pos) else {
            return amount;
        };

        let absorbed = amount.min(i32::from(MAX_AMOUNT - current));
        if absorbed > 0 {
            self.set_amount(grid, pos, i32::from(current) + absorbed);
        }
        amount - absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BlockState;
    use crate::world::{World, WorldConfig};

    fn world() -> World {
        World::new(WorldConfig::default())
    }

    #[test]
    fn test_get_amount() {
        let mut world = world();
        let pos = BlockPos::new(0, 10, 0);

        assert_eq!(AmountCodec::get_amount(&world, pos), Some(0));

        world.set_block(pos, BlockState::SOLID);
        assert_eq!(AmountCodec::get_amount(&world, pos), None);

        world.set_block(pos, BlockState::liquid(0));
        assert_eq!(AmountCodec::get_amount(&world, pos), Some(1));

        world.set_block(pos, BlockState::liquid(15));
        assert_eq!(AmountCodec::get_amount(&world, pos), Some(16));
    }

    #[test]
    fn test_set_amount_rearms() {
        let mut world = world();
        let codec = AmountCodec::new(5);
        let pos = BlockPos::new(0, 10, 0);

        assert!(codec.set_amount(&mut world, pos, 7));
        assert_eq!(world.block_state(pos), BlockState::liquid(6));
        assert!(world.ticks().has_scheduled_tick(pos));

        // Same amount again changes nothing.
        assert!(!codec.set_amount(&mut world, pos, 7));
    }

    #[test]
    fn test_set_amount_clears() {
        let mut world = world();
        let codec = AmountCodec::new(5);
        let pos = BlockPos::new(0, 10, 0);

        codec.set_amount(&mut world, pos, 3);
        assert!(codec.set_amount(&mut world, pos, 0));
        assert_eq!(world.block_state(pos), BlockState::AIR);
        assert!(!world.ticks().has_scheduled_tick(pos));

        // Clearing air or a solid block is a no-op.
        assert!(!codec.set_amount(&mut world, pos, -2));
        world.set_block(pos, BlockState::SOLID);
        assert!(!codec.set_amount(&mut world, pos, 0));
        assert_eq!(world.block_state(pos), BlockState::SOLID);
    }

    #[test]
    fn test_set_amount_clamps() {
        let mut world = world();
        let codec = AmountCodec::new(5);
        let pos = BlockPos::new(0, 10, 0);

        codec.set_amount(&mut world, pos, 40);
        assert_eq!(AmountCodec::get_amount(&world, pos), Some(MAX_AMOUNT));
    }

    #[test]
    fn test_add_amount() {
        let mut world = world();
        let codec = AmountCodec::new(5);
        let pos = BlockPos::new(0, 10, 0);

        assert_eq!(codec.add_amount(&mut world, pos, 10), 0);
        assert_eq!(codec.add_amount(&mut world, pos, 10), 4);
        assert_eq!(AmountCodec::get_amount(&world, pos), Some(16));
        assert_eq!(codec.add_amount(&mut world, pos, 3), 3);

        assert_eq!(codec.add_amount(&mut world, pos, -5), 0);
        assert_eq!(AmountCodec::get_amount(&world, pos), Some(16));

        let solid = BlockPos::new(1, 10, 0);
        world.set_block(solid, BlockState::SOLID);
        assert_eq!(codec.add_amount(&mut world, solid, 9), 9);
        assert_eq!(world.block_state(solid), BlockState::SOLID);
    }
}
