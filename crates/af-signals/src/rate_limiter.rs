//! Rate limiters with per-call (possibly dynamic) bounds.

use serde::{Deserialize, Serialize};

/// Slew-rate limiter.
///
/// Each step clamps the change relative to the previous output to
/// `[-|lo|*dt, +|up|*dt]`. The bounds are call arguments, not construction
/// parameters, because several laws drive them from live signals.
///
/// The first call initializes the output to the configured initial value and
/// then applies the limited delta from there.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimiter {
    init: f64,
    prev_output: f64,
    initialized: bool,
}

impl RateLimiter {
    /// Limiter whose first output starts from `init`.
    pub fn new(init: f64) -> Self {
        Self {
            init,
            prev_output: 0.0,
            initialized: false,
        }
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }

    /// Re-seed the held output, e.g. when a law takes over an already-moving
    /// command and must not introduce a step.
    pub fn reset_to(&mut self, value: f64) {
        self.prev_output = value;
        self.initialized = true;
    }

    pub fn output(&self) -> f64 {
        if self.initialized {
            self.prev_output
        } else {
            self.init
        }
    }

    pub fn step(&mut self, u: f64, up: f64, lo: f64, dt: f64) -> f64 {
        if !self.initialized {
            self.prev_output = self.init;
            self.initialized = true;
        }

        let delta = (u - self.prev_output)
            .min(up.abs() * dt)
            .max(-lo.abs() * dt);
        self.prev_output += delta;
        self.prev_output
    }
}

/// Rate limiter over a boolean input, treated as 0/1.
///
/// Used where a discrete switch feeds a blend factor that must fade rather
/// than snap (e.g. ground-transition gains).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolRateLimiter {
    inner: RateLimiter,
}

impl BoolRateLimiter {
    pub fn new(init: bool) -> Self {
        Self {
            inner: RateLimiter::new(if init { 1.0 } else { 0.0 }),
        }
    }

    /// Returns the blend factor in `[0, 1]`.
    pub fn step(&mut self, u: bool, up: f64, lo: f64, dt: f64) -> f64 {
        let target = if u { 1.0 } else { 0.0 };
        self.inner.step(target, up, lo, dt).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_starts_from_init() {
        let mut r = RateLimiter::new(5.0);
        // Large dt so the target is reachable in one step
        assert_eq!(r.step(5.0, 1.0, 1.0, 1.0), 5.0);
    }

    #[test]
    fn limits_rise_rate() {
        let mut r = RateLimiter::new(0.0);
        let y = r.step(100.0, 2.0, 2.0, 0.5);
        assert_eq!(y, 1.0); // 2.0 * 0.5
    }

    #[test]
    fn limits_fall_rate_with_negative_lo() {
        // lo is used by magnitude, sign-insensitive
        let mut r = RateLimiter::new(0.0);
        let y = r.step(-100.0, 2.0, -4.0, 0.5);
        assert_eq!(y, -2.0);
    }

    #[test]
    fn reaches_target_and_holds() {
        let mut r = RateLimiter::new(0.0);
        let mut y = 0.0;
        for _ in 0..20 {
            y = r.step(3.0, 1.0, 1.0, 0.25);
        }
        assert_eq!(y, 3.0);
        assert_eq!(r.step(3.0, 1.0, 1.0, 0.25), 3.0);
    }

    #[test]
    fn bool_variant_fades_between_zero_and_one() {
        let mut r = BoolRateLimiter::new(false);
        let y = r.step(true, 0.5, 0.5, 1.0);
        assert_eq!(y, 0.5);
        let y = r.step(true, 0.5, 0.5, 1.0);
        assert_eq!(y, 1.0);
        let y = r.step(false, 0.5, 0.5, 1.0);
        assert_eq!(y, 0.5);
    }
}
