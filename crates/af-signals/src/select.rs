//! Signal selection: median voting and hysteretic path selection.

use serde::{Deserialize, Serialize};

/// Median-of-three voter.
///
/// Reconciles independently derived command candidates; the middle value
/// wins. Deterministic explicit comparisons, no sorting allocation.
pub fn median_of_three(u1: f64, u2: f64, u3: f64) -> f64 {
    if u1 < u2 {
        if u2 < u3 {
            u2
        } else if u1 < u3 {
            u3
        } else {
            u1
        }
    } else if u1 < u3 {
        u1
    } else if u2 < u3 {
        u3
    } else {
        u2
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
enum PathLock {
    #[default]
    Any,
    Left,
    Right,
}

/// Hysteretic left/right path selector.
///
/// Picks the smaller-magnitude of two candidate signals by default, but
/// latches onto one side once its magnitude lies in the commit band
/// `[10, 20]`, holding it until either the short-path override asserts or
/// both magnitudes drop below 10. Prevents command chatter when two
/// near-equal paths cross (e.g. left-turn vs right-turn heading error).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSelector {
    lock: PathLock,
    active: bool,
}

const COMMIT_BAND_LO: f64 = 10.0;
const COMMIT_BAND_HI: f64 = 20.0;

impl PathSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn shorter(left: f64, right: f64) -> f64 {
        if left.abs() < right.abs() {
            left
        } else {
            right
        }
    }

    pub fn step(&mut self, right: f64, left: f64, use_short_path: bool) -> f64 {
        if !self.active {
            self.active = true;
            self.lock = PathLock::Any;
            return Self::shorter(left, right);
        }

        match self.lock {
            PathLock::Any => {
                let r = right.abs();
                let l = left.abs();
                if !use_short_path && r < l && (COMMIT_BAND_LO..=COMMIT_BAND_HI).contains(&r) {
                    self.lock = PathLock::Right;
                    right
                } else if !use_short_path && l < r && (COMMIT_BAND_LO..=COMMIT_BAND_HI).contains(&l)
                {
                    self.lock = PathLock::Left;
                    left
                } else {
                    Self::shorter(left, right)
                }
            }
            PathLock::Left => {
                if use_short_path || right.abs() < COMMIT_BAND_LO || left.abs() < COMMIT_BAND_LO {
                    self.lock = PathLock::Any;
                    Self::shorter(left, right)
                } else {
                    left
                }
            }
            PathLock::Right => {
                if use_short_path || right.abs() < COMMIT_BAND_LO || left.abs() < COMMIT_BAND_LO {
                    self.lock = PathLock::Any;
                    Self::shorter(left, right)
                } else {
                    right
                }
            }
        }
    }
}
