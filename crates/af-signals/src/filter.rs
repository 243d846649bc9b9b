//! First-order and lead-lag discrete filters (bilinear transform).
//!
//! All three filters share the same state shape: previous input, previous
//! output, and a first-call latch. On the first `step` the filter seeds both
//! with the current input, so the initial output equals the input exactly
//! (steady-state start, no engage transient).

use serde::{Deserialize, Serialize};

/// First-order low-pass: `C1 / (s + C1)` discretized with the bilinear
/// transform.
///
/// Recurrence with `a = dt*C1`:
/// `y = ((2 - a)/(a + 2)) * y_prev + (a/(a + 2)) * (u + u_prev)`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LagFilter {
    prev_input: f64,
    prev_output: f64,
    initialized: bool,
}

impl LagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop state; the next `step` re-latches on its input.
    pub fn reset(&mut self) {
        self.initialized = false;
    }

    pub fn step(&mut self, u: f64, c1: f64, dt: f64) -> f64 {
        if !self.initialized {
            self.prev_input = u;
            self.prev_output = u;
            self.initialized = true;
        }

        let a = dt * c1;
        let ca = a / (a + 2.0);
        let y = (2.0 - a) / (a + 2.0) * self.prev_output + ca * (u + self.prev_input);
        self.prev_output = y;
        self.prev_input = u;
        y
    }
}

/// First-order high-pass (washout): `s / (s + C1)`.
///
/// Same recurrence shape as [`LagFilter`] but with `ca = 2/(a + 2)` and the
/// input difference instead of the sum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WashoutFilter {
    prev_input: f64,
    prev_output: f64,
    initialized: bool,
}

impl WashoutFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }

    pub fn step(&mut self, u: f64, c1: f64, dt: f64) -> f64 {
        if !self.initialized {
            self.prev_input = u;
            self.prev_output = u;
            self.initialized = true;
        }

        let a = dt * c1;
        let ca = 2.0 / (a + 2.0);
        let y = (2.0 - a) / (a + 2.0) * self.prev_output + ca * (u - self.prev_input);
        self.prev_output = y;
        self.prev_input = u;
        y
    }
}

/// Lead-lag: `(C1*s + C2) / (C3*s + C4)` discretized with the bilinear
/// transform. `C3`/`C4` must not both be zero for the denominator to stay
/// away from singularity at any `dt > 0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadLagFilter {
    prev_input: f64,
    prev_output: f64,
    initialized: bool,
}

impl LeadLagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn step(&mut self, u: f64, c1: f64, c2: f64, c3: f64, c4: f64, dt: f64) -> f64 {
        if !self.initialized {
            self.prev_input = u;
            self.prev_output = u;
            self.initialized = true;
        }

        let denom = 2.0 * c3 + dt * c4;
        let num = dt * c2;
        let y = ((2.0 * c1 + num) / denom) * u + ((num - 2.0 * c1) / denom) * self.prev_input
            + ((2.0 * c3 - dt * c4) / denom) * self.prev_output;
        self.prev_output = y;
        self.prev_input = u;
        y
    }
}
