//! Tick scheduling for Hearth.
//!
//! The world advances in ticks: once per interval (200 ms by default) the
//! server drains connection events and commands and processes them. The
//! interval is a throttle, not part of the game rules; nothing in the
//! world depends on wall-clock time.
//!
//! The loop doesn't talk to a timer directly. It asks a [`TickSource`]
//! for the next tick:
//!
//! - [`TickScheduler`]: the real thing, backed by `tokio::time`
//! - [`ManualTicks`]: yields a fixed number of ticks immediately, for
//!   tests that want to drive the loop without waiting
//!
//! # Integration
//!
//! ```ignore
//! while let Some(tick) = source.next_tick().await {
//!     world.step()?;
//!     source.record_tick_end();
//! }
//! ```

mod manual;
mod scheduler;

pub use manual::ManualTicks;
pub use scheduler::{TickConfig, TickMetrics, TickPolicy, TickScheduler};

use std::future::Future;
use std::time::Duration;

/// Information about one tick, handed to the loop body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// Nominal interval between ticks.
    pub dt: Duration,
    /// `true` if this tick fired late (scheduler detected overrun).
    pub overrun: bool,
    /// How many intervals were skipped because of the overrun.
    pub ticks_skipped: u64,
}

/// Something that says when the next tick happens.
pub trait TickSource {
    /// Waits for the next tick. `None` means the source is exhausted and
    /// the loop should stop.
    fn next_tick(&mut self) -> impl Future<Output = Option<TickInfo>> + Send;

    /// Called after the loop body for the current tick finished.
    /// Sources that monitor how long ticks take hook in here.
    fn record_tick_end(&mut self) {}
}
