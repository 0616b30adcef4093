//! Builds the initial world from the scenario section of the config.

use trickle_core::World;
use trickle_core::config::{Pour, ScenarioSettings};
use trickle_core::grid::BlockState;
use trickle_utils::BlockPos;

/// What a scenario put into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenarioStats {
    /// Solid cells placed.
    pub solids: usize,
    /// Liquid units poured.
    pub poured: u64,
    /// Units that found no room.
    pub spilled: u64,
}

/// Places the floor, walls and pours of `scenario` into `world`.
pub fn apply(world: &mut World, scenario: &ScenarioSettings) -> ScenarioStats {
    let mut stats = ScenarioStats::default();

    let radius = scenario.floor_radius;
    for x in -radius..=radius {
        for z in -radius..=radius {
            if world.set_block(BlockPos::new(x, scenario.floor_y, z), BlockState::SOLID) {
                stats.solids += 1;
            }
        }
    }
    for wall in &scenario.walls {
        if world.set_block(BlockPos::from(*wall), BlockState::SOLID) {
            stats.solids += 1;
        }
    }

    for pour in &scenario.pours {
        let spilled = pour_column(world, pour);
        stats.poured += u64::from(pour.amount.max(0).unsigned_abs() - spilled);
        stats.spilled += u64::from(spilled);
    }

    log::info!(
        "Scenario placed {} solid cells and {} liquid units",
        stats.solids,
        stats.poured
    );
    stats
}

/// Pours into the column starting at the pour position, stacking overflow
/// upward. Returns the units that did not fit below the world ceiling.
fn pour_column(world: &mut World, pour: &Pour) -> u32 {
    let mut pos = BlockPos::from(pour.pos);
    let mut remaining = pour.amount.max(0);

    while remaining > 0 && world.is_in_valid_bounds(&pos) {
        remaining = world.add_volume(pos, remaining);
        pos = pos.above();
    }

    if remaining > 0 {
        log::warn!(
            "Pour at {} spilled {remaining} units above the world",
            BlockPos::from(pour.pos)
        );
    }
    remaining.unsigned_abs()
}
