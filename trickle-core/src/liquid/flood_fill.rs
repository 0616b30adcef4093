//! Bounded breadth-first redistribution of liquid volume.
//!
//! One [`FloodFill`] job is seeded from an origin cell and pulls that cell's
//! volume out into the surrounding grid:
//!
//! 1. The frontier head drops up to [`MAX_GRAVITY_TRANSFER`] units into the
//!    cell below it if that cell is compatible and not full.
//! 2. Otherwise, a cell other than the origin is raised by one unit if it sits
//!    more than one unit below the volume still carried.
//! 3. The job keeps expanding past a cell while volume remains after a gravity
//!    transfer, or while more than one unit remains otherwise. If a cell
//!    without a gravity transfer leaves one unit or less, the job stops there.
//!    That last unit stays at the origin.
//! 4. Expansion enqueues the horizontal neighbours in [`Direction::SPREAD_ORDER`]
//!    that are compatible, unvisited and within [`SPREAD_RADIUS`] of the origin.
//!
//! When the frontier empties or the carried volume reaches zero, the leftover
//! is written back to the origin. The grid is mutated in place, there is no
//! copy buffer.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use trickle_utils::{BlockPos, Direction};

use super::amount::{AmountCodec, MAX_AMOUNT};
use crate::grid::{BlockAccess, TickTrigger};

/// Chebyshev distance from the origin a job may never exceed.
pub const SPREAD_RADIUS: u32 = 16;

/// Most units a single dequeue may drop into the cell below.
pub const MAX_GRAVITY_TRANSFER: u8 = 4;

/// Upper bound on dequeues per job: every cell of the square layer within the radius.
pub const MAX_JOB_STEPS: usize = ((2 * SPREAD_RADIUS + 1) * (2 * SPREAD_RADIUS + 1)) as usize;

/// Lifecycle of a spread job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadState {
    /// Created, nothing processed yet.
    Seeded,
    /// Frontier is being processed.
    Running,
    /// The carried volume ran out; the rest of the frontier is abandoned.
    Drained,
    /// Leftover written back. Terminal.
    Done,
}

/// The single action a dequeued cell applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadAction {
    /// Units dropped into the cell below.
    Gravity {
        /// The cell that received the volume.
        target: BlockPos,
        /// How many units moved.
        units: u8,
    },
    /// The cell itself was raised by one unit.
    Raise,
    /// Nothing was written.
    Hold,
}

/// One dequeue of a spread job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadStep {
    /// The dequeued position.
    pub pos: BlockPos,
    /// What it did.
    pub action: SpreadAction,
    /// Whether its neighbours were considered for the frontier.
    pub expanded: bool,
}

/// Summary of a finished spread job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadReport {
    /// Where the job was seeded.
    pub origin: BlockPos,
    /// Volume at the origin when the job started.
    pub initial: u8,
    /// Volume written back to the origin.
    pub leftover: u8,
    /// Whether the job stopped because its volume ran out.
    pub drained: bool,
    /// Every dequeue in processing order.
    pub steps: Vec<SpreadStep>,
}

impl SpreadReport {
    /// Report for a seed that held no liquid.
    #[must_use]
    pub const fn noop(origin: BlockPos) -> Self {
        Self {
            origin,
            initial: 0,
            leftover: 0,
            drained: false,
            steps: Vec::new(),
        }
    }

    /// Whether the job touched nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }

    /// Units moved out of the origin.
    #[must_use]
    pub const fn distributed(&self) -> u8 {
        self.initial - self.leftover
    }

    /// Number of gravity transfers performed.
    #[must_use]
    pub fn gravity_transfers(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.action, SpreadAction::Gravity { .. }))
            .count()
    }

    /// Number of lateral raises performed.
    #[must_use]
    pub fn lateral_raises(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.action == SpreadAction::Raise)
            .count()
    }
}

/// What happens after a cell has been processed.
enum Continuation {
    Expand,
    Stop,
    Drained,
}

/// A single spread job.
///
/// The job borrows the grid mutably for its whole lifetime: it runs to
/// completion inside [`FloodFill::run`] and never re-enters itself. Writes may
/// schedule future jobs through the [`TickTrigger`], nothing more.
pub struct FloodFill<'a, G: ?Sized> {
    codec: &'a AmountCodec,
    grid: &'a mut G,
    origin: BlockPos,
    initial: u8,
    remaining: u8,
    state: SpreadState,
    frontier: VecDeque<BlockPos>,
    visited: FxHashSet<BlockPos>,
    steps: Vec<SpreadStep>,
}

impl<'a, G> FloodFill<'a, G>
where
    G: BlockAccess + TickTrigger + ?Sized,
{
    /// Seeds a job at `origin`.
    ///
    /// Returns `None` if the origin holds no liquid; such a seed would not
    /// change anything.
    pub fn new(codec: &'a AmountCodec, grid: &'a mut G, origin: BlockPos) -> Option<Self> {
        let amount = AmountCodec::get_amount(grid, origin).filter(|&amount| amount > 0)?;

        let mut frontier = VecDeque::with_capacity(64);
        frontier.push_back(origin);
        let mut visited = FxHashSet::default();
        visited.insert(origin);

        Some(Self {
            codec,
            grid,
            origin,
            initial: amount,
            remaining: amount,
            state: SpreadState::Seeded,
            frontier,
            visited,
            steps: Vec::new(),
        })
    }

    /// Current state of the job.
    #[must_use]
    pub const fn state(&self) -> SpreadState {
        self.state
    }

    /// Volume the job still carries.
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Processes the frontier until it empties, the volume runs out, or a cell
    /// leaves too little to continue, then writes the leftover back to the
    /// origin.
    pub fn run(mut self) -> SpreadReport {
        self.state = SpreadState::Running;

        while let Some(here) = self.frontier.pop_front() {
            let (action, continuation) = self.process(here);

            let expanded = matches!(continuation, Continuation::Expand);
            if expanded {
                self.expand(here);
            }
            self.steps.push(SpreadStep {
                pos: here,
                action,
                expanded,
            });

            match continuation {
                Continuation::Expand => {}
                Continuation::Stop => break,
                Continuation::Drained => {
                    self.state = SpreadState::Drained;
                    break;
                }
            }
        }

        self.write_back()
    }

    fn process(&mut self, here: BlockPos) -> (SpreadAction, Continuation) {
        let below = here.below();
        if let Some(below_amount) = AmountCodec::get_amount(&*self.grid, below)
            && below_amount < MAX_AMOUNT
        {
            let units = self
                .remaining
                .min(MAX_GRAVITY_TRANSFER)
                .min(MAX_AMOUNT - below_amount);
            self.codec
                .set_amount(&mut *self.grid, below, i32::from(below_amount + units));
            self.remaining -= units;

            let continuation = if self.remaining > 0 {
                Continuation::Expand
            } else {
                Continuation::Drained
            };
            return (
                SpreadAction::Gravity {
                    target: below,
                    units,
                },
                continuation,
            );
        }

        if here == self.origin {
            return (SpreadAction::Hold, Continuation::Expand);
        }

        let mut action = SpreadAction::Hold;
        if let Some(amount) = AmountCodec::get_amount(&*self.grid, here)
            && amount + 1 < self.remaining
        {
            self.codec.set_amount(&mut *self.grid, here, i32::from(amount + 1));
            self.remaining -= 1;
            action = SpreadAction::Raise;
        }

        let continuation = if self.remaining > 1 {
            Continuation::Expand
        } else {
            Continuation::Stop
        };
        (action, continuation)
    }

    fn expand(&mut self, here: BlockPos) {
        for direction in Direction::SPREAD_ORDER {
            let next = direction.relative(here);
            if !self.origin.is_in_range(&next, SPREAD_RADIUS) || self.visited.contains(&next) {
                continue;
            }
            if AmountCodec::get_amount(&*self.grid, next).is_none() {
                continue;
            }
            self.visited.insert(next);
            self.frontier.push_back(next);
        }
    }

    fn write_back(mut self) -> SpreadReport {
        self.codec
            .set_amount(&mut *self.grid, self.origin, i32::from(self.remaining));
        let drained = self.state == SpreadState::Drained;
        self.state = SpreadState::Done;

        log::debug!(
            "Spread at {} moved {} of {} units over {} cells",
            self.origin,
            self.initial - self.remaining,
            self.initial,
            self.steps.len()
        );

        SpreadReport {
            origin: self.origin,
            initial: self.initial,
            leftover: self.remaining,
            drained,
            steps: self.steps,
        }
    }
}
