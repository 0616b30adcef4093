//! Runs the finite liquid simulation from a JSON5 config file.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tokio::signal;
use trickle::Simulation;
use trickle_core::config::{CONFIG_FILE_NAME, TrickleConfig};
use trickle_utils::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init("info")?;

    let path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), PathBuf::from);
    let config = TrickleConfig::load_or_create(&path)
        .with_context(|| format!("could not load {}", path.display()))?;

    let mut simulation = Simulation::new(&config);

    let cancel_token = simulation.cancel_token();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupted, stopping simulation");
                cancel_token.cancel();
            }
            Err(err) => tracing::warn!("Failed to listen for ctrl-c: {err}"),
        }
    });

    simulation.run().await;
    Ok(())
}
