//! A tick source that doesn't wait.

use std::future::Future;
use std::time::Duration;

use crate::{TickInfo, TickSource};

/// Yields `remaining` ticks back to back, then `None`.
///
/// `dt` is reported as given but never slept. Lets tests run the real
/// loop code for an exact number of iterations.
#[derive(Debug, Clone)]
pub struct ManualTicks {
    remaining: u64,
    tick: u64,
    dt: Duration,
}

impl ManualTicks {
    /// A source that yields `count` ticks with a nominal 200 ms `dt`.
    pub fn new(count: u64) -> Self {
        Self {
            remaining: count,
            tick: 0,
            dt: Duration::from_millis(200),
        }
    }

    /// Ticks produced so far.
    pub fn ticks_produced(&self) -> u64 {
        self.tick
    }
}

impl TickSource for ManualTicks {
    fn next_tick(&mut self) -> impl Future<Output = Option<TickInfo>> + Send {
        let next = if self.remaining == 0 {
            None
        } else {
            self.remaining -= 1;
            self.tick += 1;
            Some(TickInfo {
                tick: self.tick,
                dt: self.dt,
                overrun: false,
                ticks_skipped: 0,
            })
        };
        std::future::ready(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_ticks_yields_exact_count() {
        let mut src = ManualTicks::new(3);
        let mut seen = Vec::new();
        while let Some(info) = src.next_tick().await {
            seen.push(info.tick);
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(src.ticks_produced(), 3);
        assert!(src.next_tick().await.is_none());
    }

    #[tokio::test]
    async fn test_manual_ticks_zero_is_empty() {
        let mut src = ManualTicks::new(0);
        assert!(src.next_tick().await.is_none());
    }
}
