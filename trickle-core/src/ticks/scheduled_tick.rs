//! Scheduled tick type.

use std::cmp::Ordering;

use trickle_utils::BlockPos;

/// A scheduled run of the liquid at a position.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTick {
    /// The position to run.
    pub pos: BlockPos,
    /// The absolute game tick when this should fire.
    pub trigger_tick: u64,
    /// Insertion order, used to break ties between ticks due at the same time.
    /// Lower values run first.
    pub sub_tick_order: u64,
}

impl ScheduledTick {
    /// Creates a new scheduled tick.
    #[must_use]
    pub const fn new(pos: BlockPos, trigger_tick: u64, sub_tick_order: u64) -> Self {
        Self {
            pos,
            trigger_tick,
            sub_tick_order,
        }
    }
}

impl PartialEq for ScheduledTick {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_tick == other.trigger_tick && self.sub_tick_order == other.sub_tick_order
    }
}

impl Eq for ScheduledTick {}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTick {
    /// `BinaryHeap` is a max-heap, so the comparison is reversed to pop the
    /// earliest tick first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| other.sub_tick_order.cmp(&self.sub_tick_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_ordering() {
        let pos = BlockPos::new(0, 0, 0);

        // Earlier trigger_tick should come first
        let tick1 = ScheduledTick::new(pos, 100, 0);
        let tick2 = ScheduledTick::new(pos, 200, 0);
        assert!(tick1 > tick2);

        // Same trigger_tick, lower sub_tick_order should come first
        let tick3 = ScheduledTick::new(pos, 100, 5);
        let tick4 = ScheduledTick::new(pos, 100, 10);
        assert!(tick3 > tick4);
    }
}
