//! Boolean conditioning nodes: confirm, pulse, hysteresis, value latch.

use serde::{Deserialize, Serialize};

/// Confirm node: the output follows the input only after the input has held
/// its new value for `time_delay` seconds.
///
/// With `rising_edge = true` only the false→true transition is delayed (a
/// true→false transition passes through immediately); with `false` it is the
/// other way around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmNode {
    rising_edge: bool,
    time_delay: f64,
    output: bool,
    since: f64,
    initialized: bool,
}

impl ConfirmNode {
    pub fn new(rising_edge: bool, time_delay: f64) -> Self {
        Self {
            rising_edge,
            time_delay,
            output: false,
            since: 0.0,
            initialized: false,
        }
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn step(&mut self, input: bool, dt: f64) -> bool {
        if !self.initialized {
            self.output = input;
            self.since = 0.0;
            self.initialized = true;
            return self.output;
        }

        if input == self.output {
            self.since = 0.0;
            return self.output;
        }

        let delayed = if self.rising_edge { input } else { !input };
        if delayed {
            self.since += dt;
            if self.since >= self.time_delay {
                self.output = input;
                self.since = 0.0;
            }
        } else {
            self.output = input;
            self.since = 0.0;
        }
        self.output
    }
}

/// Pulse node: emits true for exactly one step on the configured edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseNode {
    rising_edge: bool,
    prev: bool,
    initialized: bool,
}

impl PulseNode {
    pub fn new(rising_edge: bool) -> Self {
        Self {
            rising_edge,
            prev: false,
            initialized: false,
        }
    }

    pub fn step(&mut self, input: bool) -> bool {
        if !self.initialized {
            self.prev = input;
            self.initialized = true;
            return false;
        }
        let edge = if self.rising_edge {
            input && !self.prev
        } else {
            !input && self.prev
        };
        self.prev = input;
        edge
    }
}

/// Two-threshold hysteresis: turns on at or above `on_at`, off at or below
/// `off_at`, holds in between.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HysteresisNode {
    on_at: f64,
    off_at: f64,
    state: bool,
}

impl HysteresisNode {
    /// `off_at` must be below `on_at`; equal thresholds degenerate to a plain
    /// comparator which callers should write directly.
    pub fn new(on_at: f64, off_at: f64) -> Self {
        debug_assert!(off_at < on_at);
        Self {
            on_at,
            off_at,
            state: false,
        }
    }

    pub fn step(&mut self, input: f64) -> bool {
        if input >= self.on_at {
            self.state = true;
        } else if input <= self.off_at {
            self.state = false;
        }
        self.state
    }
}

/// Holds the last value seen while inactive; while active, the stored value
/// is frozen. Used for "remember the reference at mode entry" logic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatchedValue {
    storage: f64,
    initialized: bool,
}

impl LatchedValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, active: bool, u: f64) -> f64 {
        if !active || !self.initialized {
            self.storage = u;
            self.initialized = true;
        }
        self.storage
    }
}
