//! Vertical guidance laws (per-mode pitch / flight-path targets).
//!
//! Every mode first produces a vertical-speed demand; the demand is then
//! passed through the speed-protection selection (VLS/VMAX envelopes) and a
//! normal-load limiter before being converted to a flight-path-angle and
//! pitch target. Three independently derived candidates are reconciled with
//! the median-of-three voter.

use crate::modes::VerticalMode;
use af_signals::{median_of_three, LagFilter, RateLimiter};
use serde::{Deserialize, Serialize};

/// Altitude-hold gain, fpm per ft of altitude error.
const ALT_HOLD_GAIN: f64 = 8.0;
/// Maximum vertical speed demanded by the altitude modes, fpm.
const ALT_VS_LIMIT_FPM: f64 = 6000.0;
/// Glideslope deviation gain, fpm per degree.
const GS_GAIN: f64 = 1500.0;
/// Speed-protection margin, knots.
const SPEED_MARGIN_KN: f64 = 5.0;
/// Speed-error gain into vertical speed for the protections, fpm per knot.
const SPEED_PROTECTION_GAIN: f64 = 150.0;
/// SRS initial-climb floor, fpm.
const SRS_MIN_CLIMB_FPM: f64 = 1000.0;
/// Feet per minute of climb per knot of ground speed at 1° of path angle
/// is derived from 1 kn = 101.2686 fpm; used to convert V/S to FPA.
const FPM_PER_KN: f64 = 101.2686;
/// Pitch command slew rate, degrees per second.
const PITCH_RATE_DEG_S: f64 = 3.0;

#[derive(Clone, Copy, Debug)]
pub struct VerticalInput {
    pub dt_s: f64,
    pub mode: VerticalMode,
    pub altitude_ft: f64,
    pub selected_altitude_ft: f64,
    pub vs_fpm: f64,
    pub selected_vs_fpm: f64,
    pub selected_fpa_deg: f64,
    pub ias_kn: f64,
    pub tas_kn: f64,
    pub selected_speed_kn: f64,
    pub vls_kn: f64,
    pub vmax_kn: f64,
    pub gs_error_deg: f64,
    pub gs_valid: bool,
    pub radio_height_ft: f64,
    pub on_ground: bool,
}

/// Per-tick vertical command record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VerticalLawOutput {
    pub vs_target_fpm: f64,
    pub fpa_target_deg: f64,
    /// Slew-limited pitch command, degrees.
    pub theta_command_deg: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VerticalLaws {
    gs_filter: LagFilter,
    theta_limiter: RateLimiter,
}

/// Lower speed reference used by the protection: a captured speed at or
/// below VLS aims 5 kn under VLS so the protection has authority.
fn low_speed_reference(selected_speed_kn: f64, vls_kn: f64) -> f64 {
    if selected_speed_kn <= vls_kn {
        vls_kn - 5.0
    } else {
        vls_kn
    }
}

/// Normal-load-factor limit on vertical-speed changes, expressed as an FPA
/// ceiling. Guards against the near-zero TAS singularity by flooring the
/// speed term.
fn fpa_limit_deg(tas_kn: f64) -> f64 {
    let tas_mps = tas_kn.max(30.0) * 0.514444;
    (9.81 / tas_mps * 0.1).to_degrees()
}

fn vs_to_fpa_deg(vs_fpm: f64, tas_kn: f64) -> f64 {
    (vs_fpm / (tas_kn.max(30.0) * FPM_PER_KN)).atan().to_degrees()
}

impl VerticalLaws {
    pub fn new() -> Self {
        Self::default()
    }

    fn raw_vs_demand(&mut self, input: &VerticalInput) -> f64 {
        match input.mode {
            VerticalMode::Off | VerticalMode::RollOut => 0.0,
            VerticalMode::AltHold | VerticalMode::AltCapture | VerticalMode::Climb
            | VerticalMode::Descent => {
                let error_ft = input.selected_altitude_ft - input.altitude_ft;
                (ALT_HOLD_GAIN * error_ft).clamp(-ALT_VS_LIMIT_FPM, ALT_VS_LIMIT_FPM)
            }
            VerticalMode::OpenClimb => ALT_VS_LIMIT_FPM.min(
                (ALT_HOLD_GAIN * (input.selected_altitude_ft - input.altitude_ft)).max(0.0),
            ),
            VerticalMode::OpenDescent => (-ALT_VS_LIMIT_FPM).max(
                (ALT_HOLD_GAIN * (input.selected_altitude_ft - input.altitude_ft)).min(0.0),
            ),
            VerticalMode::VerticalSpeed => input.selected_vs_fpm,
            VerticalMode::FlightPathAngle => {
                input.selected_fpa_deg.to_radians().tan() * input.tas_kn.max(30.0) * FPM_PER_KN
            }
            VerticalMode::GsCapture | VerticalMode::GsTrack => {
                if input.gs_valid {
                    let filtered = self.gs_filter.step(input.gs_error_deg, 1.0, input.dt_s);
                    // Nominal 3° descent plus deviation correction
                    let nominal = -3.0_f64.to_radians().tan() * input.tas_kn * FPM_PER_KN;
                    nominal + GS_GAIN * filtered
                } else {
                    0.0
                }
            }
            VerticalMode::Flare => -300.0,
            VerticalMode::Srs | VerticalMode::SrsGa => {
                // Speed-reference climb: hold the target speed with pitch,
                // never shallower than the minimum climb
                let speed_error = input.ias_kn - input.selected_speed_kn;
                (SPEED_PROTECTION_GAIN * speed_error).max(SRS_MIN_CLIMB_FPM)
            }
        }
    }

    pub fn update(&mut self, input: &VerticalInput) -> VerticalLawOutput {
        let law_vs = self.raw_vs_demand(input);

        // Speed-protection envelope: a low-speed floor that pitches the nose
        // down and a high-speed ceiling that pitches it up, reconciled with
        // the law demand by the median voter.
        let vls_ref = low_speed_reference(input.selected_speed_kn, input.vls_kn);
        let low_speed_vs =
            law_vs.min(SPEED_PROTECTION_GAIN * (input.ias_kn - (vls_ref + SPEED_MARGIN_KN)));
        let high_speed_vs =
            law_vs.max(SPEED_PROTECTION_GAIN * (input.ias_kn - (input.vmax_kn - SPEED_MARGIN_KN)));

        let vs_target = if input.ias_kn < vls_ref + SPEED_MARGIN_KN {
            median_of_three(law_vs, low_speed_vs, low_speed_vs)
        } else if input.ias_kn > input.vmax_kn - SPEED_MARGIN_KN {
            median_of_three(law_vs, high_speed_vs, high_speed_vs)
        } else {
            median_of_three(law_vs, low_speed_vs, high_speed_vs)
        };

        let limit = fpa_limit_deg(input.tas_kn);
        let fpa_unlimited = vs_to_fpa_deg(vs_target, input.tas_kn);
        let fpa_target = fpa_unlimited.clamp(-limit.max(3.5), limit.max(3.5));

        let theta_command = if input.on_ground && input.mode == VerticalMode::Off {
            self.theta_limiter.reset_to(0.0);
            0.0
        } else {
            self.theta_limiter
                .step(fpa_target, PITCH_RATE_DEG_S, PITCH_RATE_DEG_S, input.dt_s)
        };

        VerticalLawOutput {
            vs_target_fpm: vs_target,
            fpa_target_deg: fpa_target,
            theta_command_deg: theta_command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mode: VerticalMode) -> VerticalInput {
        VerticalInput {
            dt_s: 0.1,
            mode,
            altitude_ft: 10000.0,
            selected_altitude_ft: 10000.0,
            vs_fpm: 0.0,
            selected_vs_fpm: 0.0,
            selected_fpa_deg: 0.0,
            ias_kn: 250.0,
            tas_kn: 280.0,
            selected_speed_kn: 250.0,
            vls_kn: 180.0,
            vmax_kn: 350.0,
            gs_error_deg: 0.0,
            gs_valid: false,
            radio_height_ft: 5000.0,
            on_ground: false,
        }
    }

    #[test]
    fn alt_hold_level_at_target() {
        let mut laws = VerticalLaws::new();
        let out = laws.update(&input(VerticalMode::AltHold));
        assert_eq!(out.vs_target_fpm, 0.0);
        assert_eq!(out.fpa_target_deg, 0.0);
    }

    #[test]
    fn alt_hold_climbs_toward_higher_selection() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::AltHold);
        i.selected_altitude_ft = 12000.0;
        let out = laws.update(&i);
        assert!(out.vs_target_fpm > 0.0);
        assert!(out.vs_target_fpm <= ALT_VS_LIMIT_FPM);
        assert!(out.fpa_target_deg > 0.0);
    }

    #[test]
    fn open_descent_never_climbs() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::OpenDescent);
        i.selected_altitude_ft = 12000.0; // above us, but OP DES only descends
        let out = laws.update(&i);
        assert!(out.vs_target_fpm <= 0.0);
    }

    #[test]
    fn vs_mode_follows_selection() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::VerticalSpeed);
        i.selected_vs_fpm = -1500.0;
        let out = laws.update(&i);
        assert_eq!(out.vs_target_fpm, -1500.0);
        assert!(out.fpa_target_deg < 0.0);
    }

    #[test]
    fn low_speed_protection_caps_climb() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::VerticalSpeed);
        i.selected_vs_fpm = 4000.0;
        i.ias_kn = 178.0; // below VLS
        let out = laws.update(&i);
        assert!(
            out.vs_target_fpm < 0.0,
            "protection must pitch down below VLS, got {}",
            out.vs_target_fpm
        );
    }

    #[test]
    fn high_speed_protection_caps_descent() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::VerticalSpeed);
        i.selected_vs_fpm = -4000.0;
        i.ias_kn = 349.0; // within the VMAX margin
        let out = laws.update(&i);
        assert!(
            out.vs_target_fpm > -4000.0,
            "protection must shallow the descent"
        );
    }

    #[test]
    fn degenerate_tas_yields_finite_output() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::VerticalSpeed);
        i.selected_vs_fpm = 2000.0;
        i.tas_kn = 0.0;
        let out = laws.update(&i);
        assert!(out.fpa_target_deg.is_finite());
        assert!(out.theta_command_deg.is_finite());
    }

    #[test]
    fn srs_keeps_minimum_climb() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::Srs);
        i.ias_kn = 140.0;
        i.selected_speed_kn = 145.0;
        i.vls_kn = 120.0;
        let out = laws.update(&i);
        assert!(out.vs_target_fpm >= SRS_MIN_CLIMB_FPM);
    }

    #[test]
    fn glideslope_tracks_beam() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::GsTrack);
        i.gs_valid = true;
        i.gs_error_deg = 0.0;
        let on_beam = laws.update(&i);
        assert!(on_beam.vs_target_fpm < 0.0, "nominal descent on the beam");

        // Below the beam: shallower descent commanded
        let mut laws = VerticalLaws::new();
        i.gs_error_deg = 0.5;
        let below = laws.update(&i);
        assert!(below.vs_target_fpm > on_beam.vs_target_fpm);
    }

    #[test]
    fn pitch_command_is_slew_limited() {
        let mut laws = VerticalLaws::new();
        let mut i = input(VerticalMode::VerticalSpeed);
        i.selected_vs_fpm = 6000.0;
        let first = laws.update(&i);
        assert!(first.theta_command_deg.abs() <= PITCH_RATE_DEG_S * i.dt_s + 1e-12);
    }
}
