//! Coalescing tick queue.

use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use trickle_utils::BlockPos;

use super::ScheduledTick;

/// Pending liquid runs, at most one per position.
///
/// Rescheduling a position replaces its pending run. The replaced heap entry
/// stays in the queue and is skipped when it surfaces, since its
/// `sub_tick_order` no longer matches the live entry.
pub struct LiquidTicks {
    /// Priority queue of scheduled ticks, ordered by trigger time.
    tick_queue: BinaryHeap<ScheduledTick>,
    /// The live `sub_tick_order` for every position with a pending run.
    pending: FxHashMap<BlockPos, u64>,
    /// Counter for generating unique sub-tick order values.
    sub_tick_counter: u64,
}

impl LiquidTicks {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_queue: BinaryHeap::new(),
            pending: FxHashMap::default(),
            sub_tick_counter: 0,
        }
    }

    /// Schedules a run at `current_tick + delay`, replacing any pending run
    /// for `pos`.
    ///
    /// Returns `true` if an earlier pending run was replaced.
    pub fn schedule(&mut self, pos: BlockPos, current_tick: u64, delay: u32) -> bool {
        let trigger_tick = current_tick + u64::from(delay);
        let sub_tick_order = self.sub_tick_counter;
        self.sub_tick_counter += 1;

        self.tick_queue
            .push(ScheduledTick::new(pos, trigger_tick, sub_tick_order));
        let replaced = self.pending.insert(pos, sub_tick_order).is_some();

        log::trace!("Scheduled liquid tick at {pos} for tick {trigger_tick} (delay={delay})");
        replaced
    }

    /// Drops the pending run for `pos`, returning whether there was one.
    pub fn cancel(&mut self, pos: BlockPos) -> bool {
        self.pending.remove(&pos).is_some()
    }

    /// Checks if a run is pending for `pos`.
    #[must_use]
    pub fn has_scheduled_tick(&self, pos: BlockPos) -> bool {
        self.pending.contains_key(&pos)
    }

    /// Pops up to `max_ticks` runs due at or before `current_tick`, in
    /// (trigger tick, insertion) order.
    pub fn tick(&mut self, current_tick: u64, max_ticks: usize) -> Vec<BlockPos> {
        let mut due = Vec::new();

        while due.len() < max_ticks {
            let Some(tick) = self.tick_queue.peek() else {
                break;
            };
            if tick.trigger_tick > current_tick {
                break;
            }
            let Some(tick) = self.tick_queue.pop() else {
                break;
            };

            if self.pending.get(&tick.pos) == Some(&tick.sub_tick_order) {
                self.pending.remove(&tick.pos);
                due.push(tick.pos);
            }
        }

        if !due.is_empty() {
            log::trace!(
                "{} liquid ticks due at {current_tick}, {} still pending",
                due.len(),
                self.pending.len()
            );
        }
        due
    }

    /// Number of pending runs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending run.
    pub fn clear(&mut self) {
        self.tick_queue.clear();
        self.pending.clear();
    }
}

impl Default for LiquidTicks {
    fn default() -> Self {
        Self::new()
    }
}
