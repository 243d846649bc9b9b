//! Lateral guidance laws (per-mode bank-angle targets).

use crate::modes::LateralMode;
use af_signals::{LagFilter, PathSelector, RateLimiter};
use serde::{Deserialize, Serialize};

/// Nominal bank limit, degrees.
const BANK_LIMIT_DEG: f64 = 25.0;
/// Bank limit close to the ground (runway / roll-out phases).
const BANK_LIMIT_GROUND_DEG: f64 = 5.0;
/// Bank command slew rate, degrees per second.
const BANK_RATE_DEG_S: f64 = 5.0;

/// Heading-error gain into bank.
const HEADING_GAIN: f64 = 2.5;
/// Cross-track (nm) and track-angle-error (deg) gains for NAV.
const XTK_GAIN: f64 = 9.0;
const TAE_GAIN: f64 = 1.8;
/// Localizer deviation and deviation-rate gains.
const LOC_GAIN: f64 = 11.0;
const LOC_RATE_GAIN: f64 = 5.0;

#[derive(Clone, Copy, Debug)]
pub struct LateralInput {
    pub dt_s: f64,
    pub mode: LateralMode,
    pub heading_deg: f64,
    pub track_deg: f64,
    pub selected_heading_deg: f64,
    /// Cross-track error to the active leg, nm (positive right of course).
    pub cross_track_error_nm: f64,
    /// Track angle error to the active leg, degrees.
    pub track_angle_error_deg: f64,
    pub loc_error_deg: f64,
    pub loc_valid: bool,
    pub on_ground: bool,
}

/// Per-tick lateral command record. Rebuilt every tick; only the law's
/// internal filter state persists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LateralLawOutput {
    /// Raw law demand before slew limiting.
    pub phi_target_deg: f64,
    /// Slew- and bank-limited command sent to the roll channel.
    pub phi_limited_deg: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LateralLaws {
    turn_selector: PathSelector,
    loc_filter: LagFilter,
    loc_rate_filter: LagFilter,
    prev_loc_error_deg: Option<f64>,
    phi_limiter: RateLimiter,
}

/// Wrap an angle difference into (-180, 180].
fn wrap180(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

impl LateralLaws {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading (or track) error resolved through the hysteretic turn-path
    /// selector: the short way around by default, but once the short-side
    /// error sits in the commit band the turn direction is latched, so a
    /// small overshoot through the target cannot flip the turn.
    fn turn_error(&mut self, current_deg: f64, selected_deg: f64) -> f64 {
        let right = (selected_deg - current_deg).rem_euclid(360.0);
        let left = right - 360.0;
        self.turn_selector.step(right, left, false)
    }

    pub fn update(&mut self, input: &LateralInput) -> LateralLawOutput {
        let phi_target = match input.mode {
            LateralMode::Off => 0.0,
            LateralMode::Runway | LateralMode::RollOut => {
                // Wings level, small heading correction only
                (HEADING_GAIN * wrap180(input.selected_heading_deg - input.heading_deg))
                    .clamp(-BANK_LIMIT_GROUND_DEG, BANK_LIMIT_GROUND_DEG)
            }
            LateralMode::RunwayTrack | LateralMode::GaTrack | LateralMode::TrackHold => {
                let error = self.turn_error(input.track_deg, input.selected_heading_deg);
                HEADING_GAIN * error
            }
            LateralMode::HeadingHold => {
                let error = self.turn_error(input.heading_deg, input.selected_heading_deg);
                HEADING_GAIN * error
            }
            LateralMode::Nav => {
                XTK_GAIN * input.cross_track_error_nm + TAE_GAIN * input.track_angle_error_deg
            }
            LateralMode::LocCapture | LateralMode::LocTrack | LateralMode::Land
            | LateralMode::Flare => {
                if input.loc_valid {
                    let filtered =
                        self.loc_filter.step(input.loc_error_deg, 1.5, input.dt_s);
                    let raw_rate = match self.prev_loc_error_deg {
                        Some(prev) if input.dt_s > 0.0 => {
                            (input.loc_error_deg - prev) / input.dt_s
                        }
                        _ => 0.0,
                    };
                    self.prev_loc_error_deg = Some(input.loc_error_deg);
                    let rate = self.loc_rate_filter.step(raw_rate, 2.0, input.dt_s);
                    LOC_GAIN * filtered + LOC_RATE_GAIN * rate
                } else {
                    0.0
                }
            }
        };

        let limit = if input.on_ground {
            BANK_LIMIT_GROUND_DEG
        } else {
            BANK_LIMIT_DEG
        };
        let phi_target = phi_target.clamp(-limit, limit);
        let phi_limited = self
            .phi_limiter
            .step(phi_target, BANK_RATE_DEG_S, BANK_RATE_DEG_S, input.dt_s);

        LateralLawOutput {
            phi_target_deg: phi_target,
            phi_limited_deg: phi_limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mode: LateralMode) -> LateralInput {
        LateralInput {
            dt_s: 0.1,
            mode,
            heading_deg: 0.0,
            track_deg: 0.0,
            selected_heading_deg: 0.0,
            cross_track_error_nm: 0.0,
            track_angle_error_deg: 0.0,
            loc_error_deg: 0.0,
            loc_valid: false,
            on_ground: false,
        }
    }

    #[test]
    fn wrap180_basics() {
        assert_eq!(wrap180(10.0), 10.0);
        assert_eq!(wrap180(190.0), -170.0);
        assert_eq!(wrap180(-190.0), 170.0);
        assert_eq!(wrap180(360.0), 0.0);
    }

    #[test]
    fn heading_hold_turns_toward_selection() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::HeadingHold);
        i.heading_deg = 0.0;
        i.selected_heading_deg = 30.0;
        let out = laws.update(&i);
        assert!(out.phi_target_deg > 0.0, "right turn expected");

        i.selected_heading_deg = 330.0;
        let mut laws = LateralLaws::new();
        let out = laws.update(&i);
        assert!(out.phi_target_deg < 0.0, "left turn expected");
    }

    #[test]
    fn bank_target_is_clamped() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::HeadingHold);
        i.selected_heading_deg = 170.0;
        let out = laws.update(&i);
        assert!(out.phi_target_deg <= BANK_LIMIT_DEG);
    }

    #[test]
    fn bank_command_is_slew_limited() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::HeadingHold);
        i.selected_heading_deg = 90.0;
        let first = laws.update(&i);
        // 5 deg/s at dt 0.1: at most 0.5 deg away from the initial 0
        assert!(first.phi_limited_deg.abs() <= BANK_RATE_DEG_S * i.dt_s + 1e-12);
        let second = laws.update(&i);
        assert!(
            (second.phi_limited_deg - first.phi_limited_deg).abs()
                <= BANK_RATE_DEG_S * i.dt_s + 1e-12
        );
    }

    #[test]
    fn committed_turn_survives_small_overshoot() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::HeadingHold);
        i.heading_deg = 0.0;

        // 15° right error sits in the commit band: latch the right turn
        // (the very first call only seeds the selector)
        i.selected_heading_deg = 15.0;
        let first = laws.update(&i);
        assert!(first.phi_target_deg > 0.0);
        let latched = laws.update(&i);
        assert!(latched.phi_target_deg > 0.0);

        // Overshoot 12° past the target: still committed right
        i.selected_heading_deg = 348.0;
        let out = laws.update(&i);
        assert!(out.phi_target_deg > 0.0, "latched turn must not flip");

        // Within 10° the latch releases and the short path wins again
        i.selected_heading_deg = 352.0;
        let out = laws.update(&i);
        assert!(out.phi_target_deg < 0.0);
    }

    #[test]
    fn nav_steers_back_to_course() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::Nav);
        i.cross_track_error_nm = -1.0; // left of course
        let out = laws.update(&i);
        assert!(out.phi_target_deg < 0.0);
    }

    #[test]
    fn loc_law_needs_valid_receiver() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::LocCapture);
        i.loc_error_deg = 1.0;
        i.loc_valid = false;
        assert_eq!(laws.update(&i).phi_target_deg, 0.0);

        i.loc_valid = true;
        assert!(laws.update(&i).phi_target_deg > 0.0);
    }

    #[test]
    fn ground_modes_use_small_bank() {
        let mut laws = LateralLaws::new();
        let mut i = input(LateralMode::RollOut);
        i.on_ground = true;
        i.selected_heading_deg = 40.0;
        let out = laws.update(&i);
        assert!(out.phi_target_deg.abs() <= BANK_LIMIT_GROUND_DEG);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wrap180_stays_in_range(angle in -10000.0_f64..10000.0) {
            let wrapped = wrap180(angle);
            prop_assert!(wrapped > -180.0 - 1e-9);
            prop_assert!(wrapped <= 180.0 + 1e-9);
        }

        #[test]
        fn bank_target_never_exceeds_limit(
            heading in 0.0_f64..360.0,
            selected in 0.0_f64..360.0,
        ) {
            let mut laws = LateralLaws::new();
            let mut i = LateralInput {
                dt_s: 0.1,
                mode: LateralMode::HeadingHold,
                heading_deg: heading,
                track_deg: heading,
                selected_heading_deg: selected,
                cross_track_error_nm: 0.0,
                track_angle_error_deg: 0.0,
                loc_error_deg: 0.0,
                loc_valid: false,
                on_ground: false,
            };
            for _ in 0..5 {
                let out = laws.update(&i);
                prop_assert!(out.phi_target_deg.abs() <= BANK_LIMIT_DEG + 1e-9);
                prop_assert!(out.phi_limited_deg.abs() <= BANK_LIMIT_DEG + 1e-9);
                i.heading_deg = (i.heading_deg + 1.0).rem_euclid(360.0);
            }
        }
    }
}
