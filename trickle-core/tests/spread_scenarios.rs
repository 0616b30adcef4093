//! End-to-end spread scenarios against the in-memory world.

use rustc_hash::FxHashSet;
use trickle_core::grid::BlockState;
use trickle_core::liquid::{MAX_JOB_STEPS, SPREAD_RADIUS, SpreadAction};
use trickle_core::world::{DEFAULT_MAX_RUNS_PER_TICK, World, WorldConfig};
use trickle_utils::{BlockPos, Direction};

const ORIGIN: BlockPos = BlockPos::new(0, 1, 0);

fn floored_world(radius: i32) -> World {
    let mut world = World::new(WorldConfig::default());
    for x in -radius..=radius {
        for z in -radius..=radius {
            world.set_block(BlockPos::new(x, 0, z), BlockState::SOLID);
        }
    }
    world
}

fn sorted_liquid_cells(world: &World) -> Vec<(BlockPos, u8)> {
    let mut cells: Vec<_> = world.liquid_cells().collect();
    cells.sort_by_key(|(pos, _)| (pos.y(), pos.x(), pos.z()));
    cells
}

#[test]
fn test_full_cell_on_flat_floor() {
    let mut world = floored_world(SPREAD_RADIUS as i32 + 1);
    world.set_block(ORIGIN, BlockState::liquid(15));

    let report = world.run_liquid(ORIGIN);

    assert_eq!(report.initial, 16);
    assert_eq!(report.leftover, 1);
    assert_eq!(report.lateral_raises(), 15);
    assert_eq!(report.gravity_transfers(), 0);
    assert!(!report.drained);
    // The fifteenth raise leaves one unit and ends the job.
    assert_eq!(report.steps.len(), 16);
    assert!(!report.steps[15].expanded);

    let mut expected: Vec<(BlockPos, u8)> = [
        (0, 0),
        (0, -1),
        (0, 1),
        (1, 0),
        (-1, 0),
        (0, -2),
        (1, -1),
        (-1, -1),
        (0, 2),
        (1, 1),
        (-1, 1),
        (2, 0),
        (-2, 0),
        (0, -3),
        (1, -2),
        (-1, -2),
    ]
    .into_iter()
    .map(|(x, z)| (BlockPos::new(x, 1, z), 1))
    .collect();
    expected.sort_by_key(|(pos, _)| (pos.y(), pos.x(), pos.z()));

    assert_eq!(sorted_liquid_cells(&world), expected);
    assert_eq!(world.total_volume(), 16);
}

#[test]
fn test_each_cell_dequeued_once() {
    let mut world = floored_world(SPREAD_RADIUS as i32 + 1);
    world.set_block(ORIGIN, BlockState::liquid(15));

    let report = world.run_liquid(ORIGIN);

    let mut seen = FxHashSet::default();
    for step in &report.steps {
        assert!(seen.insert(step.pos), "{} dequeued twice", step.pos);
        assert!(ORIGIN.is_in_range(&step.pos, SPREAD_RADIUS));
    }
    assert!(report.steps.len() <= MAX_JOB_STEPS);
}

#[test]
fn test_run_on_air_changes_nothing() {
    let mut world = floored_world(4);
    let before = world.total_volume();

    let report = world.run_liquid(ORIGIN);

    assert!(report.is_noop());
    assert_eq!(world.block_state(ORIGIN), BlockState::AIR);
    assert_eq!(world.total_volume(), before);
}

#[test]
fn test_job_conserves_volume() {
    let mut world = floored_world(SPREAD_RADIUS as i32 + 1);
    world.set_block(BlockPos::new(0, 0, 0), BlockState::AIR);
    world.set_block(BlockPos::new(0, -1, 0), BlockState::SOLID);
    world.set_block(ORIGIN, BlockState::liquid(11));

    let report = world.run_liquid(ORIGIN);

    assert_eq!(report.initial, 12);
    let received: u32 = world
        .liquid_cells()
        .filter(|(pos, _)| *pos != ORIGIN)
        .map(|(_, amount)| u32::from(amount))
        .sum();
    assert_eq!(received, u32::from(report.distributed()));
    assert_eq!(world.total_volume(), 12);
}

/// A one wide corridor along +x from `ORIGIN`, pre-filled with 15 units so a
/// full origin walks it without raising anything, over a floor with a hole at
/// `hole_x`.
fn corridor_world(hole_x: i32) -> World {
    let mut world = World::new(WorldConfig::default());
    let end = SPREAD_RADIUS as i32 + 4;
    for x in -1..=end {
        for z in -1..=1 {
            world.set_block(BlockPos::new(x, 0, z), BlockState::SOLID);
        }
        world.set_block(BlockPos::new(x, 1, -1), BlockState::SOLID);
        world.set_block(BlockPos::new(x, 1, 1), BlockState::SOLID);
    }
    world.set_block(BlockPos::new(-1, 1, 0), BlockState::SOLID);
    world.set_block(BlockPos::new(end, 1, 0), BlockState::SOLID);

    world.set_block(BlockPos::new(hole_x, 0, 0), BlockState::AIR);
    world.set_block(BlockPos::new(hole_x, -1, 0), BlockState::SOLID);

    for x in 1..end {
        world.set_block(BlockPos::new(x, 1, 0), BlockState::liquid(14));
    }
    world.set_block(ORIGIN, BlockState::liquid(15));
    world
}

#[test]
fn test_radius_edge_is_reachable() {
    let edge = SPREAD_RADIUS as i32;
    let mut world = corridor_world(edge);

    let report = world.run_liquid(ORIGIN);

    assert_eq!(world.amount(BlockPos::new(edge, 0, 0)), Some(4));
    assert_eq!(report.leftover, 12);
    assert_eq!(report.lateral_raises(), 0);
}

#[test]
fn test_beyond_radius_is_unreachable() {
    let beyond = SPREAD_RADIUS as i32 + 1;
    let mut world = corridor_world(beyond);

    let report = world.run_liquid(ORIGIN);

    assert_eq!(world.block_state(BlockPos::new(beyond, 0, 0)), BlockState::AIR);
    assert_eq!(report.leftover, 16);
    assert_eq!(report.steps.len(), SPREAD_RADIUS as usize + 1);
    assert!(
        report
            .steps
            .iter()
            .all(|step| step.pos.x() <= SPREAD_RADIUS as i32)
    );
}

/// Two enclosed eight-unit columns whose only shared face is the cell at
/// `x = 1`.
fn twin_columns() -> (World, BlockPos, BlockPos) {
    let mut world = floored_world(4);
    let left = ORIGIN;
    let right = ORIGIN.offset(2, 0, 0);
    for pos in [left, right] {
        for direction in Direction::SPREAD_ORDER {
            world.set_block(direction.relative(pos), BlockState::SOLID);
        }
    }
    let boundary = ORIGIN.offset(1, 0, 0);
    world.set_block(boundary.offset(0, 0, -1), BlockState::SOLID);
    world.set_block(boundary.offset(0, 0, 1), BlockState::SOLID);
    world.set_block(boundary, BlockState::AIR);
    world.set_block(left, BlockState::liquid(7));
    world.set_block(right, BlockState::liquid(7));
    (world, left, right)
}

#[test]
fn test_open_boundary_is_crossed() {
    let (mut world, left, right) = twin_columns();

    let report = world.run_liquid(left);

    assert!(report.steps.iter().any(|step| step.pos == right));
    assert_eq!(world.amount(ORIGIN.offset(1, 0, 0)), Some(1));
    assert_eq!(world.amount(left), Some(7));
    assert_eq!(world.amount(right), Some(8));
    assert_eq!(world.total_volume(), 16);
}

#[test]
fn test_solid_wall_blocks_transfer() {
    let (mut world, left, right) = twin_columns();
    world.set_block(ORIGIN.offset(1, 0, 0), BlockState::SOLID);

    for (origin, other) in [(left, right), (right, left)] {
        let report = world.run_liquid(origin);

        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].action, SpreadAction::Hold);
        assert_eq!(report.leftover, 8);
        assert_eq!(world.amount(origin), Some(8));
        assert_eq!(world.amount(other), Some(8));
    }
}

#[test]
fn test_isolated_column_drains_into_floor_cell() {
    let below = BlockPos::new(0, 0, 0);
    for base in [0u8, 10] {
        for amount in 1..=16u8 {
            let mut world = floored_world(2);
            for direction in Direction::SPREAD_ORDER {
                world.set_block(direction.relative(ORIGIN), BlockState::SOLID);
            }
            world.set_block(below, BlockState::AIR);
            if base > 0 {
                world.set_block(below, BlockState::liquid(base - 1));
            }
            world.set_block(BlockPos::new(0, -1, 0), BlockState::SOLID);
            world.set_block(ORIGIN, BlockState::liquid(amount - 1));

            let report = world.run_liquid(ORIGIN);
            let origin_after = world.amount(ORIGIN).expect("origin stays compatible");
            let below_after = world.amount(below).expect("floor cell stays compatible");

            assert_eq!(below_after - base, amount - origin_after, "a={amount} base={base}");
            assert_eq!(below_after - base, amount.min(4).min(16 - base));
            assert_eq!(report.distributed(), amount - origin_after);

            world.settle(1000);
            let filled = world.amount(below).expect("floor cell stays compatible");
            let left = world.amount(ORIGIN).expect("origin stays compatible");
            assert!(
                filled == 16 || left == 0,
                "a={amount} base={base}: floor {filled}, origin {left}"
            );
            assert_eq!(filled + left, amount + base);
        }
    }
}

#[test]
fn test_shaft_settles_at_bottom() {
    let mut world = floored_world(2);
    for y in 1..=6 {
        let pos = BlockPos::new(0, y, 0);
        for direction in Direction::SPREAD_ORDER {
            world.set_block(direction.relative(pos), BlockState::SOLID);
        }
    }
    let top = BlockPos::new(0, 5, 0);
    world.place_liquid(top);

    let first = world.run_liquid(top);
    assert_eq!(first.distributed(), 4);
    assert_eq!(world.amount(top.below()), Some(4));
    assert_eq!(world.amount(top), Some(12));

    let elapsed = world.settle(1000);
    assert!(elapsed < 1000, "shaft never settled");
    assert!(world.ticks().is_empty());
    assert_eq!(
        sorted_liquid_cells(&world),
        vec![(BlockPos::new(0, 1, 0), 16)]
    );
}

#[test]
fn test_ticks_conserve_volume() {
    let mut world = floored_world(24);
    world.set_block(BlockPos::new(3, 1, 0), BlockState::SOLID);
    world.add_volume(BlockPos::new(0, 6, 0), 16);
    world.add_volume(BlockPos::new(0, 7, 0), 9);
    world.add_volume(BlockPos::new(5, 1, 5), 13);

    for _ in 0..300 {
        world.tick(DEFAULT_MAX_RUNS_PER_TICK);
        assert_eq!(world.total_volume(), 38);
    }
    assert!(world.liquid_cells().all(|(pos, _)| pos.y() >= 1));
}

#[test]
fn test_rescheduling_replaces_pending_run() {
    let mut world = floored_world(2);
    for direction in Direction::SPREAD_ORDER {
        world.set_block(direction.relative(ORIGIN), BlockState::SOLID);
    }
    world.set_block(ORIGIN, BlockState::liquid(4));
    let delay = u64::from(world.liquid().tick_delay());

    for _ in 0..3 {
        world.tick(DEFAULT_MAX_RUNS_PER_TICK);
    }
    // A neighbour change re-arms the cell from the current time.
    world.set_block(ORIGIN.above(), BlockState::SOLID);
    assert_eq!(world.ticks().count(), 1);

    let mut fired_at = Vec::new();
    for _ in 0..(delay + 3) {
        let summary = world.tick(DEFAULT_MAX_RUNS_PER_TICK);
        if summary.runs > 0 {
            fired_at.push(summary.game_time);
        }
    }
    assert_eq!(fired_at, vec![3 + delay]);
}
