//! Simulation-time condition timers.
//!
//! All timing here is driven by simulation time, never the wall clock, so a
//! paused host or a replay produces identical behavior.

use serde::{Deserialize, Serialize};

/// Seconds for which a condition has been continuously true.
///
/// While the condition is false the reference time tracks the current time,
/// so the elapsed value reads zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSinceCondition {
    event_time: f64,
    initialized: bool,
}

impl TimeSinceCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, simulation_time: f64, condition: bool) -> f64 {
        if !self.initialized {
            self.event_time = simulation_time;
            self.initialized = true;
        }
        if !condition || self.event_time == 0.0 {
            self.event_time = simulation_time;
        }
        simulation_time - self.event_time
    }
}

/// Stopwatch over simulation time, for dwell/debounce windows measured in
/// milliseconds (the fuel pump logic's native unit).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DwellTimer {
    started_at: f64,
    accumulated_ms: f64,
}

impl DwellTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the dwell window at zero.
    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    /// Advance by the tick's delta time.
    pub fn advance(&mut self, dt_s: f64) {
        self.accumulated_ms += dt_s * 1000.0;
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.accumulated_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_since_condition_counts_only_while_true() {
        let mut t = TimeSinceCondition::new();
        assert_eq!(t.step(10.0, false), 0.0);
        assert_eq!(t.step(11.0, true), 1.0);
        assert_eq!(t.step(12.5, true), 2.5);
        assert_eq!(t.step(13.0, false), 0.0);
        assert_eq!(t.step(14.0, true), 1.0);
    }

    #[test]
    fn dwell_timer_accumulates_ms() {
        let mut t = DwellTimer::new();
        t.advance(0.5);
        t.advance(0.25);
        assert_eq!(t.elapsed_ms(), 750.0);
        t.reset();
        assert_eq!(t.elapsed_ms(), 0.0);
    }
}
