//! Finite liquid behaviour.
//!
//! Unlike vanilla flowing fluids, a finite liquid never creates volume: every
//! unit that shows up in a neighbour was taken out of the cell that spread.

pub mod amount;
pub mod bounding_box;
pub mod flood_fill;

use serde::Deserialize;
use trickle_utils::{BlockPos, UpdateFlags};

pub use amount::{AmountCodec, MAX_AMOUNT};
pub use bounding_box::{Aabb, liquid_shape};
pub use flood_fill::{
    FloodFill, MAX_GRAVITY_TRANSFER, MAX_JOB_STEPS, SPREAD_RADIUS, SpreadAction, SpreadReport,
    SpreadState, SpreadStep,
};

use crate::grid::{BlockAccess, TickTrigger};

/// Default delay in ticks between a change and the next spread run.
pub const DEFAULT_TICK_DELAY: u32 = 5;

/// Settings for a finite liquid block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiquidSettings {
    /// Registered block name.
    pub name: String,
    /// Delay in ticks before a changed cell spreads again.
    pub tick_delay: u32,
}

impl Default for LiquidSettings {
    fn default() -> Self {
        Self {
            name: "finite_water".to_string(),
            tick_delay: DEFAULT_TICK_DELAY,
        }
    }
}

/// Block behaviour of a finite liquid.
///
/// All operations take the grid as an injected capability; the liquid keeps no
/// per-cell state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiniteLiquid {
    name: String,
    codec: AmountCodec,
}

impl FiniteLiquid {
    /// Creates a liquid from its settings.
    #[must_use]
    pub fn new(settings: &LiquidSettings) -> Self {
        Self {
            name: settings.name.clone(),
            codec: AmountCodec::new(settings.tick_delay),
        }
    }

    /// The registered block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delay in ticks used whenever a run is scheduled.
    #[must_use]
    pub const fn tick_delay(&self) -> u32 {
        self.codec.tick_delay()
    }

    /// Changes the scheduling delay.
    pub fn set_tick_delay(&mut self, delay: u32) {
        self.codec.set_tick_delay(delay);
    }

    /// The codec used for every volume read and write.
    #[must_use]
    pub const fn codec(&self) -> &AmountCodec {
        &self.codec
    }

    /// Returns the volume at `pos`, `None` for incompatible cells.
    #[must_use]
    pub fn amount<G: BlockAccess + ?Sized>(&self, grid: &G, pos: BlockPos) -> Option<u8> {
        AmountCodec::get_amount(grid, pos)
    }

    /// Places a full cell at `pos` and schedules its first run.
    pub fn place<G>(&self, grid: &mut G, pos: BlockPos) -> bool
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        self.codec
            .set_amount_with_flags(grid, pos, i32::from(MAX_AMOUNT), UpdateFlags::ALL)
    }

    /// Pours `amount` units into `pos` and returns what did not fit.
    pub fn add_volume<G>(&self, grid: &mut G, pos: BlockPos, amount: i32) -> i32
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        self.codec.add_amount(grid, pos, amount)
    }

    /// Runs one spread job seeded at `pos`.
    ///
    /// Does nothing if `pos` holds no liquid.
    pub fn run<G>(&self, grid: &mut G, pos: BlockPos) -> SpreadReport
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        FloodFill::new(&self.codec, grid, pos)
            .map_or_else(|| SpreadReport::noop(pos), FloodFill::run)
    }

    /// Called when the block is first added to the world.
    pub fn on_block_added<T: TickTrigger + ?Sized>(&self, trigger: &mut T, pos: BlockPos) {
        trigger.schedule_run(pos, self.tick_delay());
    }

    /// Called when a neighbouring block changes.
    pub fn on_neighbor_changed<T: TickTrigger + ?Sized>(&self, trigger: &mut T, pos: BlockPos) {
        trigger.schedule_run(pos, self.tick_delay());
    }

    /// Called when a scheduled run fires.
    pub fn on_scheduled_tick<G>(&self, grid: &mut G, pos: BlockPos) -> SpreadReport
    where
        G: BlockAccess + TickTrigger + ?Sized,
    {
        self.run(grid, pos)
    }

    /// Cell-local shape of the liquid at `pos`.
    ///
    /// Collision and selection share this shape.
    #[must_use]
    pub fn shape<G: BlockAccess + ?Sized>(&self, grid: &G, pos: BlockPos) -> Option<Aabb> {
        self.amount(grid, pos)
            .and_then(|amount| liquid_shape(i32::from(amount)))
    }

    /// World-space collision box of the cell at `pos`.
    #[must_use]
    pub fn collision_box<G: BlockAccess + ?Sized>(&self, grid: &G, pos: BlockPos) -> Option<Aabb> {
        self.shape(grid, pos)
            .map(|aabb| aabb.offset(pos))
    }

    /// World-space selection box of the cell at `pos`.
    #[must_use]
    pub fn selection_box<G: BlockAccess + ?Sized>(&self, grid: &G, pos: BlockPos) -> Option<Aabb> {
        self.shape(grid, pos)
            .map(|aabb| aabb.offset(pos))
    }

    /// Appends the collision box at `pos` to `out` if it intersects `mask`.
    pub fn add_collision_boxes<G: BlockAccess + ?Sized>(
        &self,
        grid: &G,
        pos: BlockPos,
        mask: &Aabb,
        out: &mut Vec<Aabb>,
    ) {
        if let Some(aabb) = self.collision_box(grid, pos)
            && aabb.intersects(mask)
        {
            out.push(aabb);
        }
    }
}

impl Default for FiniteLiquid {
    fn default() -> Self {
        Self::new(&LiquidSettings::default())
    }
}
