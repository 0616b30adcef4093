//! In-memory voxel world.
//!
//! A sparse map of non-air cells plus the liquid tick queue. The world is the
//! single owner of the grid: spread jobs borrow it mutably one at a time from
//! [`World::tick`], on the caller's thread.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use trickle_utils::{BlockPos, Direction, UpdateFlags};

use crate::grid::{BlockAccess, BlockKind, BlockState, TickTrigger};
use crate::liquid::{AmountCodec, FiniteLiquid, LiquidSettings, SpreadReport};
use crate::ticks::LiquidTicks;

/// Default runs processed per tick.
pub const DEFAULT_MAX_RUNS_PER_TICK: usize = 65536;

/// World construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// Lowest buildable y coordinate.
    pub min_y: i32,
    /// Number of buildable layers above `min_y`.
    pub height: i32,
    /// The liquid simulated in this world.
    pub liquid: LiquidSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_y: -64,
            height: 384,
            liquid: LiquidSettings::default(),
        }
    }
}

/// What happened during one [`World::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Game time after the tick.
    pub game_time: u64,
    /// Spread jobs executed.
    pub runs: usize,
    /// Units moved out of job origins.
    pub moved: u32,
    /// Jobs that ran out of volume before their frontier emptied.
    pub drained: usize,
}

/// A sparse in-memory world.
pub struct World {
    /// Every non-air cell.
    blocks: FxHashMap<BlockPos, BlockState>,
    /// Cells written with [`UpdateFlags::UPDATE_CLIENTS`] since the last drain.
    changed: FxHashSet<BlockPos>,
    ticks: LiquidTicks,
    liquid: Arc<FiniteLiquid>,
    game_time: u64,
    min_y: i32,
    height: i32,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            blocks: FxHashMap::default(),
            changed: FxHashSet::default(),
            ticks: LiquidTicks::new(),
            liquid: Arc::new(FiniteLiquid::new(&config.liquid)),
            game_time: 0,
            min_y: config.min_y,
            height: config.height,
        }
    }

    /// The liquid simulated in this world.
    #[must_use]
    pub fn liquid(&self) -> &Arc<FiniteLiquid> {
        &self.liquid
    }

    /// The pending liquid runs.
    #[must_use]
    pub fn ticks(&self) -> &LiquidTicks {
        &self.ticks
    }

    /// Current game time.
    #[must_use]
    pub const fn game_time(&self) -> u64 {
        self.game_time
    }

    /// Whether `pos` lies inside the buildable height range.
    #[must_use]
    pub const fn is_in_valid_bounds(&self, pos: &BlockPos) -> bool {
        pos.y() >= self.min_y && pos.y() < self.min_y + self.height
    }

    /// The block at `pos`. Cells outside the world read as solid.
    #[must_use]
    pub fn block_state(&self, pos: BlockPos) -> BlockState {
        if !self.is_in_valid_bounds(&pos) {
            return BlockState::SOLID;
        }
        self.blocks.get(&pos).copied().unwrap_or(BlockState::AIR)
    }

    /// Replaces the block at `pos`, notifying neighbours.
    ///
    /// Liquid written over a non-liquid cell schedules its first run.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) -> bool {
        let was_liquid = self.get_block_kind(pos) == BlockKind::Liquid;
        if !self.set_block_and_level(pos, state.kind, state.level, UpdateFlags::ALL) {
            return false;
        }
        if state.kind == BlockKind::Liquid && !was_liquid {
            let liquid = Arc::clone(&self.liquid);
            liquid.on_block_added(self, pos);
        }
        true
    }

    /// The liquid volume at `pos`, `None` if the cell is incompatible.
    #[must_use]
    pub fn amount(&self, pos: BlockPos) -> Option<u8> {
        AmountCodec::get_amount(self, pos)
    }

    /// Sum of all liquid volume in the world.
    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.liquid_cells().map(|(_, amount)| u64::from(amount)).sum()
    }

    /// Every liquid cell with its volume, in no particular order.
    pub fn liquid_cells(&self) -> impl Iterator<Item = (BlockPos, u8)> + '_ {
        self.blocks
            .iter()
            .filter(|(_, state)| state.kind == BlockKind::Liquid)
            .filter_map(|(pos, _)| self.amount(*pos).map(|amount| (*pos, amount)))
    }

    /// Takes the set of cells changed since the previous call.
    pub fn take_changes(&mut self) -> Vec<BlockPos> {
        self.changed.drain().collect()
    }

    /// Places a full liquid cell at `pos`.
    pub fn place_liquid(&mut self, pos: BlockPos) -> bool {
        let liquid = Arc::clone(&self.liquid);
        liquid.place(self, pos)
    }

    /// Pours `amount` units into `pos`, returning what did not fit.
    pub fn add_volume(&mut self, pos: BlockPos, amount: i32) -> i32 {
        let liquid = Arc::clone(&self.liquid);
        liquid.add_volume(self, pos, amount)
    }

    /// Runs a spread job at `pos` right away.
    pub fn run_liquid(&mut self, pos: BlockPos) -> SpreadReport {
        let liquid = Arc::clone(&self.liquid);
        liquid.run(self, pos)
    }

    /// Advances game time by one and runs every liquid job that became due,
    /// up to `max_runs`.
    pub fn tick(&mut self, max_runs: usize) -> TickSummary {
        self.game_time += 1;
        let due = self.ticks.tick(self.game_time, max_runs);
        let liquid = Arc::clone(&self.liquid);

        let mut summary = TickSummary {
            game_time: self.game_time,
            ..TickSummary::default()
        };
        for pos in due {
            if self.get_block_kind(pos) != BlockKind::Liquid {
                continue;
            }
            let report = liquid.on_scheduled_tick(self, pos);
            summary.runs += 1;
            summary.moved += u32::from(report.distributed());
            if report.drained {
                summary.drained += 1;
            }
        }
        summary
    }

    /// Runs ticks until no liquid run is pending or `max_ticks` have passed.
    ///
    /// Returns the number of ticks executed.
    pub fn settle(&mut self, max_ticks: u64) -> u64 {
        let mut elapsed = 0;
        while elapsed < max_ticks && !self.ticks.is_empty() {
            self.tick(DEFAULT_MAX_RUNS_PER_TICK);
            elapsed += 1;
        }
        elapsed
    }

    fn notify_neighbors(&mut self, pos: BlockPos) {
        let liquid_neighbors: SmallVec<[BlockPos; 6]> = Direction::ALL
            .iter()
            .map(|direction| direction.relative(pos))
            .filter(|neighbor| self.get_block_kind(*neighbor) == BlockKind::Liquid)
            .collect();

        let liquid = Arc::clone(&self.liquid);
        for neighbor in liquid_neighbors {
            liquid.on_neighbor_changed(self, neighbor);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl BlockAccess for World {
    fn get_block_kind(&self, pos: BlockPos) -> BlockKind {
        self.block_state(pos).kind
    }

    fn get_stored_level(&self, pos: BlockPos) -> u8 {
        self.block_state(pos).level
    }

    fn set_block_and_level(
        &mut self,
        pos: BlockPos,
        kind: BlockKind,
        level: u8,
        flags: UpdateFlags,
    ) -> bool {
        if !self.is_in_valid_bounds(&pos) {
            log::warn!("Rejected block write outside world bounds at {pos}");
            return false;
        }

        let state = BlockState { kind, level };
        let previous = if kind == BlockKind::Air {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, state)
        };
        if previous.unwrap_or(BlockState::AIR) == state {
            return true;
        }

        if flags.contains(UpdateFlags::UPDATE_CLIENTS) {
            self.changed.insert(pos);
        }
        if flags.contains(UpdateFlags::NOTIFY_NEIGHBORS) {
            self.notify_neighbors(pos);
        }
        true
    }
}

impl TickTrigger for World {
    fn schedule_run(&mut self, pos: BlockPos, delay: u32) {
        self.ticks.schedule(pos, self.game_time, delay);
    }

    fn cancel_run(&mut self, pos: BlockPos) {
        self.ticks.cancel(pos);
    }
}
