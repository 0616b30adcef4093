//! # Trickle
//!
//! Headless driver for the finite liquid simulation. Builds a world from the
//! config scenario and advances it on a fixed tick interval until the tick
//! limit is reached or the run is cancelled.

use std::time::Duration;

use tokio::select;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use trickle_core::World;
use trickle_core::config::{SimulationSettings, TrickleConfig};

pub mod scenario;

/// Totals of a finished simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Spread jobs executed.
    pub runs: usize,
    /// Cells rewritten during the run.
    pub updated_cells: usize,
    /// Liquid volume before the first tick.
    pub initial_volume: u64,
    /// Liquid volume after the last tick.
    pub final_volume: u64,
    /// Whether the run stopped because it was cancelled.
    pub interrupted: bool,
}

/// A world plus the loop that ticks it.
pub struct Simulation {
    world: World,
    settings: SimulationSettings,
    /// The cancellation token for graceful shutdown.
    cancel_token: CancellationToken,
}

impl Simulation {
    /// Builds the world described by `config`.
    #[must_use]
    pub fn new(config: &TrickleConfig) -> Self {
        let mut world = World::new(config.world_config());
        scenario::apply(&mut world, &config.scenario);
        // Scenario writes are the initial state, not updates.
        world.take_changes();

        Self {
            world,
            settings: config.simulation,
            cancel_token: CancellationToken::new(),
        }
    }

    /// The simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// A token that stops [`Self::run`] when cancelled.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Stops the simulation.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    /// Ticks the world until the tick limit or cancellation.
    pub async fn run(&mut self) -> RunSummary {
        let cancel_token = self.cancel_token.clone();
        let mut interval = time::interval(Duration::from_millis(self.settings.tick_interval_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = RunSummary {
            initial_volume: self.world.total_volume(),
            ..RunSummary::default()
        };
        tracing::info!(
            liquid = self.world.liquid().name(),
            volume = summary.initial_volume,
            pending = self.world.ticks().count(),
            "Starting simulation"
        );

        loop {
            if self.settings.max_ticks != 0 && summary.ticks >= self.settings.max_ticks {
                break;
            }

            select! {
                biased;
                () = cancel_token.cancelled() => {
                    summary.interrupted = true;
                    break;
                }
                _ = interval.tick() => {}
            }

            self.step(&mut summary);
        }

        summary.final_volume = self.world.total_volume();
        if summary.final_volume == summary.initial_volume {
            tracing::info!(
                ticks = summary.ticks,
                runs = summary.runs,
                updated_cells = summary.updated_cells,
                volume = summary.final_volume,
                interrupted = summary.interrupted,
                "Simulation finished"
            );
        } else {
            tracing::error!(
                initial = summary.initial_volume,
                volume = summary.final_volume,
                "Liquid volume changed during the simulation"
            );
        }
        summary
    }

    fn step(&mut self, summary: &mut RunSummary) {
        let span = tracing::debug_span!("tick", game_time = self.world.game_time() + 1);
        let _enter = span.enter();

        let tick = self.world.tick(self.settings.max_runs_per_tick);
        let updated = self.world.take_changes().len();
        summary.ticks += 1;
        summary.runs += tick.runs;
        summary.updated_cells += updated;

        if tick.runs > 0 {
            tracing::debug!(
                runs = tick.runs,
                moved = tick.moved,
                drained = tick.drained,
                updated,
                "Liquid tick"
            );
        }

        let report_every = self.settings.report_every;
        if report_every != 0 && summary.ticks % report_every == 0 {
            tracing::info!(
                game_time = tick.game_time,
                cells = self.world.liquid_cells().count(),
                volume = self.world.total_volume(),
                pending = self.world.ticks().count(),
                "Liquid report"
            );
        }
    }
}
