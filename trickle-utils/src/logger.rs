//! Process-wide logger setup.
//!
//! Library crates log through the `log` facade. Binaries call [`init`] once,
//! which installs a `tracing` fmt subscriber and bridges `log` records into it.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_directive` when it is set and parses.
pub fn init(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish()
        .try_init()?;

    log::debug!("Logger initialised");
    Ok(())
}
