//! Tick pacing and tick-time tracking.
//!
//! Speeds are in pixels per tick, so the loop runs a fixed number of ticks
//! per second rather than scaling movement by elapsed time.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Fixed-rate tick pacer.
#[derive(Debug)]
pub struct TickClock {
    /// Time budget per tick
    tick_budget: Duration,
    /// Start of the current tick
    tick_start: Instant,
    /// Recent tick durations in seconds
    tick_times: VecDeque<f32>,
    /// Maximum samples kept for averaging
    max_samples: usize,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TickClock {
    /// Create a pacer for `target_tps` ticks per second.
    #[must_use]
    pub fn new(target_tps: u32) -> Self {
        Self {
            tick_budget: budget_for(target_tps.max(1)),
            tick_start: Instant::now(),
            tick_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Record the end of a tick and start timing the next one.
    /// Returns the duration of the finished tick.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.tick_start;
        self.tick_start = now;
        self.record(elapsed);
        elapsed
    }

    /// Sleep for what is left of the tick budget, then start the next tick.
    pub fn wait(&mut self) {
        let elapsed = self.tick_start.elapsed();
        if elapsed < self.tick_budget {
            std::thread::sleep(self.tick_budget - elapsed);
        }
        self.lap();
    }

    fn record(&mut self, elapsed: Duration) {
        self.tick_times.push_back(elapsed.as_secs_f32());
        if self.tick_times.len() > self.max_samples {
            self.tick_times.pop_front();
        }
    }

    /// Get the average tick time in milliseconds.
    #[must_use]
    pub fn average_tick_ms(&self) -> f32 {
        if self.tick_times.is_empty() {
            return 0.0;
        }

        (self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32) * 1000.0
    }

    /// Get the measured tick rate, averaged over recent ticks.
    #[must_use]
    pub fn current_tps(&self) -> f32 {
        let avg_ms = self.average_tick_ms();
        if avg_ms > 0.0 {
            1000.0 / avg_ms
        } else {
            0.0
        }
    }
}

fn budget_for(tps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(tps))
}
