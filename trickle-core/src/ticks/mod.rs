//! Scheduled tick system for liquid runs.
//!
//! A liquid cell that changed asks to be run again after a delay. Requests are
//! coalesced per position: a newer request replaces the pending one.
//!
//! - [`ScheduledTick`] - a single scheduled run
//! - [`LiquidTicks`] - the coalescing queue

mod liquid_ticks;
mod scheduled_tick;

pub use liquid_ticks::LiquidTicks;
pub use scheduled_tick::ScheduledTick;
