//! JSON5 configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::liquid::LiquidSettings;
use crate::world::{DEFAULT_MAX_RUNS_PER_TICK, WorldConfig};

const DEFAULT_CONFIG: &str = include_str!("../../package-content/trickle_config.json5");

/// Default file name of the configuration.
pub const CONFIG_FILE_NAME: &str = "trickle_config.json5";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON5 or does not match the schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json5::Error,
    },
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Validation(&'static str),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrickleConfig {
    /// The simulated liquid.
    pub liquid: LiquidSettings,
    /// World dimensions.
    pub world: WorldSettings,
    /// Tick loop settings.
    pub simulation: SimulationSettings,
    /// Initial world contents.
    pub scenario: ScenarioSettings,
}

/// World dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSettings {
    /// Lowest buildable y coordinate.
    pub min_y: i32,
    /// Number of buildable layers.
    pub height: i32,
}

/// Tick loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Wall-clock length of a tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Ticks to run before stopping, 0 for no limit.
    pub max_ticks: u64,
    /// Most spread jobs executed in one tick.
    pub max_runs_per_tick: usize,
    /// Ticks between volume reports, 0 to disable them.
    pub report_every: u64,
}

/// Initial world contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioSettings {
    /// Height of the solid floor.
    pub floor_y: i32,
    /// Half extent of the square floor around the y axis.
    pub floor_radius: i32,
    /// Extra solid cells.
    #[serde(default)]
    pub walls: Vec<[i32; 3]>,
    /// Liquid poured in before the first tick.
    #[serde(default)]
    pub pours: Vec<Pour>,
}

/// Liquid poured into one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pour {
    /// The first cell filled. Overflow stacks upward.
    pub pos: [i32; 3],
    /// Units poured.
    pub amount: i32,
}

impl TrickleConfig {
    /// Loads the config at `path`, writing the default file first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json5::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.liquid.name.is_empty() {
            return Err(ConfigError::Validation("Liquid name must not be empty"));
        }
        if self.liquid.tick_delay == 0 {
            return Err(ConfigError::Validation("Tick delay must be at least 1"));
        }
        if !(1..=4096).contains(&self.world.height) {
            return Err(ConfigError::Validation("World height must be in range 1..=4096"));
        }
        if self.simulation.max_runs_per_tick == 0 {
            return Err(ConfigError::Validation("Max runs per tick must be at least 1"));
        }
        if self.scenario.floor_radius < 0 {
            return Err(ConfigError::Validation("Floor radius must not be negative"));
        }
        if self.scenario.pours.iter().any(|pour| pour.amount < 0) {
            return Err(ConfigError::Validation("Pour amounts must not be negative"));
        }
        Ok(())
    }

    /// Parameters for building the world.
    #[must_use]
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            min_y: self.world.min_y,
            height: self.world.height,
            liquid: self.liquid.clone(),
        }
    }
}

impl Default for TrickleConfig {
    fn default() -> Self {
        Self {
            liquid: LiquidSettings::default(),
            world: WorldSettings {
                min_y: -64,
                height: 384,
            },
            simulation: SimulationSettings {
                tick_interval_ms: 50,
                max_ticks: 200,
                max_runs_per_tick: DEFAULT_MAX_RUNS_PER_TICK,
                report_every: 20,
            },
            scenario: ScenarioSettings {
                floor_y: 0,
                floor_radius: 24,
                walls: vec![[3, 1, -1], [3, 1, 0], [3, 1, 1]],
                pours: vec![
                    Pour {
                        pos: [0, 4, 0],
                        amount: 48,
                    },
                    Pour {
                        pos: [-8, 1, 8],
                        amount: 12,
                    },
                ],
            },
        }
    }
}
