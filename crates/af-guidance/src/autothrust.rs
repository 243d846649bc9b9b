//! Autothrust: thrust-lever interpretation, engagement status and N1
//! command computation.

use crate::modes::{AthrMode, AthrStatus};
use af_signals::{LagFilter, RateLimiter, TimeSinceCondition};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thrust-lever detents, degrees.
const TLA_CLB_DEG: f64 = 25.0;
const TLA_MCT_DEG: f64 = 35.0;
const TLA_TOGA_DEG: f64 = 45.0;
/// Reverse interpolation segment, degrees of lever below zero.
const TLA_REV_BEGIN_DEG: f64 = 6.0;
const TLA_REV_END_DEG: f64 = 20.0;

/// Disconnect button hold time for a hard (latched-off) disconnect.
const DISCONNECT_HOLD_S: f64 = 0.2;

/// Speed-error gain into N1, percent per knot.
const SPEED_GAIN: f64 = 0.5;
/// N1 command slew rate, percent per second.
const N1_RATE_PCT_S: f64 = 4.0;

/// Per-engine thrust-lever and limit context for the N1 mapping.
#[derive(Clone, Copy, Debug)]
pub struct ThrustLimitsPercent {
    pub idle: f64,
    pub clb: f64,
    pub flex: f64,
    pub mct: f64,
    pub toga: f64,
    pub reverse: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct AutothrustInput {
    pub dt_s: f64,
    pub simulation_time_s: f64,
    pub athr_push: bool,
    pub athr_disconnect: bool,
    pub tla_1_deg: f64,
    pub tla_2_deg: f64,
    /// Main-gear strut compression ratios; the on-ground decision hystereses
    /// on these rather than the host's boolean.
    pub strut_compression_1: f64,
    pub strut_compression_2: f64,
    pub flex_temperature_deg_c: f64,
    pub tat_deg_c: f64,
    /// Host flight-phase code; below 3 counts as the takeoff phase for the
    /// FLEX latch.
    pub flight_phase: f64,
    pub limits: ThrustLimitsPercent,
    pub ias_kn: f64,
    pub selected_speed_kn: f64,
    pub ap_engaged: bool,
    pub engine_1_operative: bool,
    pub engine_2_operative: bool,
}

/// Per-tick autothrust command record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AutothrustOutput {
    pub status: AthrStatus,
    pub mode: AthrMode,
    pub n1_commanded_1_percent: f64,
    pub n1_commanded_2_percent: f64,
    pub engine_1_in_reverse: bool,
    pub engine_2_in_reverse: bool,
    pub is_flex_active: bool,
    /// Wire code of the thrust-limit regime the levers select
    /// (0 none, 1 CLB, 2 MCT, 3 FLEX, 4 TOGA, 5 REVERSE).
    pub thrust_limit_type_code: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
enum GroundContact {
    #[default]
    OnGround,
    InAir,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Autothrust {
    ground: GroundContact,
    status: AthrStatus,
    flex_latch: bool,
    hard_disconnect: bool,
    prev_push: bool,
    disconnect_held: TimeSinceCondition,
    speed_filter: LagFilter,
    n1_limiter_1: RateLimiter,
    n1_limiter_2: RateLimiter,
}

impl Autothrust {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gear-strut hysteresis: airborne only once both struts are fully
    /// extended, back on ground as soon as either compresses measurably.
    fn step_ground_contact(&mut self, input: &AutothrustInput) -> bool {
        match self.ground {
            GroundContact::OnGround => {
                if input.strut_compression_1 == 0.0 && input.strut_compression_2 == 0.0 {
                    self.ground = GroundContact::InAir;
                }
            }
            GroundContact::InAir => {
                if input.strut_compression_1 > 0.05 || input.strut_compression_2 > 0.05 {
                    self.ground = GroundContact::OnGround;
                }
            }
        }
        self.ground == GroundContact::OnGround
    }

    /// Commanded N1 for one lever position, interpolating between the limit
    /// breakpoints of the surrounding detents.
    fn tla_to_n1(
        &self,
        tla_deg: f64,
        on_ground: bool,
        flex_active: bool,
        limits: &ThrustLimitsPercent,
    ) -> (f64, bool) {
        let mut tla = tla_deg;
        if !on_ground && tla < 0.0 {
            // Reverse is not available in flight
            tla = 0.0;
        }
        let in_reverse = tla < 0.0;

        let (tla_begin, n1_begin, tla_end, n1_end) = if tla >= 0.0 {
            if tla <= TLA_CLB_DEG {
                (0.0, limits.idle, TLA_CLB_DEG, limits.clb)
            } else if tla <= TLA_MCT_DEG {
                let upper = if flex_active { limits.flex } else { limits.mct };
                (TLA_CLB_DEG, limits.clb, TLA_MCT_DEG, upper)
            } else {
                let lower = if flex_active { limits.flex } else { limits.mct };
                (TLA_MCT_DEG, lower, TLA_TOGA_DEG, limits.toga)
            }
        } else {
            let magnitude = tla.abs().max(TLA_REV_BEGIN_DEG);
            return (
                (limits.reverse.abs() - (limits.idle + 1.0).abs())
                    / (TLA_REV_END_DEG - TLA_REV_BEGIN_DEG)
                    * (magnitude - TLA_REV_BEGIN_DEG)
                    + (limits.idle + 1.0).abs(),
                in_reverse,
            );
        };

        let n1 = (n1_end - n1_begin) / (tla_end - tla_begin) * (tla - tla_begin) + n1_begin;
        (n1, in_reverse)
    }

    /// Highest detent either operative engine's lever selects, as the
    /// thrust-limit-type wire code.
    fn limit_type_code(&self, input: &AutothrustInput, flex_active: bool) -> f64 {
        let tla = input.tla_1_deg.max(input.tla_2_deg);
        if tla < 0.0 {
            5.0
        } else if tla >= TLA_TOGA_DEG {
            4.0
        } else if tla >= TLA_MCT_DEG {
            if flex_active { 3.0 } else { 2.0 }
        } else if tla > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn tla_in_active_range(&self, input: &AutothrustInput) -> bool {
        if input.engine_1_operative && input.engine_2_operative {
            (0.0..=TLA_CLB_DEG).contains(&input.tla_1_deg)
                && (0.0..=TLA_CLB_DEG).contains(&input.tla_2_deg)
        } else {
            (input.engine_1_operative && (0.0..=TLA_MCT_DEG).contains(&input.tla_1_deg))
                || (input.engine_2_operative && (0.0..=TLA_MCT_DEG).contains(&input.tla_2_deg))
        }
    }

    pub fn update(&mut self, input: &AutothrustInput) -> AutothrustOutput {
        let on_ground = self.step_ground_contact(input);

        // FLEX condition and latch: armed on the ground at the FLX detent
        // with a flex temperature above TAT, held through the takeoff until
        // the levers leave the FLX gate for CLB or TOGA.
        let flex_condition = input.flex_temperature_deg_c > input.tat_deg_c
            && input.flex_temperature_deg_c != 0.0
            && input.flight_phase < 3.0;
        if flex_condition
            && on_ground
            && input.tla_1_deg == TLA_MCT_DEG
            && input.tla_2_deg == TLA_MCT_DEG
        {
            self.flex_latch = true;
        }
        if self.flex_latch
            && ((input.tla_1_deg == TLA_CLB_DEG && input.tla_2_deg == TLA_CLB_DEG)
                || (input.tla_1_deg == TLA_TOGA_DEG && input.tla_2_deg == TLA_TOGA_DEG))
        {
            self.flex_latch = false;
        }
        let flex_active = (flex_condition && on_ground) || (!on_ground && self.flex_latch);

        // Disconnect: the instinctive button held past the threshold latches
        // the autothrust off until re-armed.
        let held_s = self
            .disconnect_held
            .step(input.simulation_time_s, input.athr_disconnect);
        if held_s >= DISCONNECT_HOLD_S && self.status != AthrStatus::Disengaged {
            self.hard_disconnect = true;
            self.status = AthrStatus::Disengaged;
            debug!("autothrust hard disconnect");
        }

        // Push-button edges toggle engagement
        let push_edge = input.athr_push && !self.prev_push;
        self.prev_push = input.athr_push;
        if push_edge {
            self.status = match self.status {
                AthrStatus::Disengaged => {
                    self.hard_disconnect = false;
                    AthrStatus::Armed
                }
                AthrStatus::Armed | AthrStatus::Active => AthrStatus::Disengaged,
            };
        }

        // Armed goes active once airborne with the levers in the active
        // range (or immediately at takeoff thrust on the ground).
        let takeoff_levers = input.tla_1_deg >= TLA_MCT_DEG && input.tla_2_deg >= TLA_MCT_DEG;
        if self.status == AthrStatus::Armed
            && !self.hard_disconnect
            && ((on_ground && takeoff_levers) || (!on_ground && self.tla_in_active_range(input)))
        {
            self.status = AthrStatus::Active;
        }
        // Back to armed when the levers leave the active range in flight
        if self.status == AthrStatus::Active
            && !on_ground
            && !self.tla_in_active_range(input)
            && !takeoff_levers
        {
            self.status = AthrStatus::Armed;
        }

        // Mode selection
        let mode = if self.status != AthrStatus::Active {
            AthrMode::None
        } else if input.tla_1_deg >= TLA_TOGA_DEG || input.tla_2_deg >= TLA_TOGA_DEG {
            AthrMode::ManualToga
        } else if input.tla_1_deg >= TLA_MCT_DEG || input.tla_2_deg >= TLA_MCT_DEG {
            if flex_active {
                AthrMode::ManualFlex
            } else {
                AthrMode::ManualMct
            }
        } else if on_ground {
            AthrMode::ThrustIdle
        } else {
            AthrMode::Speed
        };

        // N1 demand per engine
        let (tla_n1_1, in_reverse_1) =
            self.tla_to_n1(input.tla_1_deg, on_ground, flex_active, &input.limits);
        let (tla_n1_2, in_reverse_2) =
            self.tla_to_n1(input.tla_2_deg, on_ground, flex_active, &input.limits);

        let (target_1, target_2) = if mode == AthrMode::Speed {
            // Hold the selected speed with N1, never exceeding what the
            // levers authorize and never below idle
            let speed_error = input.selected_speed_kn - input.ias_kn;
            let filtered = self.speed_filter.step(speed_error, 0.8, input.dt_s);
            let demand = input.limits.idle + 25.0 + SPEED_GAIN * filtered;
            (
                demand.clamp(input.limits.idle, tla_n1_1),
                demand.clamp(input.limits.idle, tla_n1_2),
            )
        } else {
            (tla_n1_1, tla_n1_2)
        };

        let n1_1 = self
            .n1_limiter_1
            .step(target_1, N1_RATE_PCT_S, N1_RATE_PCT_S, input.dt_s);
        let n1_2 = self
            .n1_limiter_2
            .step(target_2, N1_RATE_PCT_S, N1_RATE_PCT_S, input.dt_s);

        AutothrustOutput {
            status: self.status,
            mode,
            n1_commanded_1_percent: n1_1,
            n1_commanded_2_percent: n1_2,
            engine_1_in_reverse: in_reverse_1,
            engine_2_in_reverse: in_reverse_2,
            is_flex_active: flex_active,
            thrust_limit_type_code: self.limit_type_code(input, flex_active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ThrustLimitsPercent {
        ThrustLimitsPercent {
            idle: 20.0,
            clb: 86.0,
            flex: 82.0,
            mct: 88.0,
            toga: 92.0,
            reverse: 75.0,
        }
    }

    fn input() -> AutothrustInput {
        AutothrustInput {
            dt_s: 0.1,
            simulation_time_s: 0.0,
            athr_push: false,
            athr_disconnect: false,
            tla_1_deg: 0.0,
            tla_2_deg: 0.0,
            strut_compression_1: 0.5,
            strut_compression_2: 0.5,
            flex_temperature_deg_c: 0.0,
            tat_deg_c: 15.0,
            flight_phase: 5.0,
            limits: limits(),
            ias_kn: 250.0,
            selected_speed_kn: 250.0,
            ap_engaged: false,
            engine_1_operative: true,
            engine_2_operative: true,
        }
    }

    fn athr() -> Autothrust {
        Autothrust::new()
    }

    #[test]
    fn tla_detents_map_to_limits() {
        let a = athr();
        let l = limits();
        let (idle, _) = a.tla_to_n1(0.0, true, false, &l);
        assert_eq!(idle, l.idle);
        let (clb, _) = a.tla_to_n1(TLA_CLB_DEG, true, false, &l);
        assert_eq!(clb, l.clb);
        let (mct, _) = a.tla_to_n1(TLA_MCT_DEG, true, false, &l);
        assert_eq!(mct, l.mct);
        let (toga, _) = a.tla_to_n1(TLA_TOGA_DEG, true, false, &l);
        assert_eq!(toga, l.toga);
    }

    #[test]
    fn tla_between_detents_interpolates() {
        let a = athr();
        let l = limits();
        let (mid, _) = a.tla_to_n1(12.5, true, false, &l);
        assert!((mid - (l.idle + l.clb) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn flex_replaces_mct_at_the_gate() {
        let a = athr();
        let l = limits();
        let (with_flex, _) = a.tla_to_n1(TLA_MCT_DEG, true, true, &l);
        assert_eq!(with_flex, l.flex);
    }

    #[test]
    fn reverse_maps_only_on_ground() {
        let a = athr();
        let l = limits();
        let (_, in_reverse) = a.tla_to_n1(-15.0, true, false, &l);
        assert!(in_reverse);
        let (n1, in_reverse) = a.tla_to_n1(-15.0, false, false, &l);
        assert!(!in_reverse);
        assert_eq!(n1, l.idle);
    }

    #[test]
    fn ground_contact_hysteresis() {
        let mut a = athr();
        let mut i = input();
        assert!(a.step_ground_contact(&i));
        // Partially extended struts: still on ground
        i.strut_compression_1 = 0.02;
        i.strut_compression_2 = 0.0;
        assert!(a.step_ground_contact(&i));
        // Fully extended: airborne
        i.strut_compression_1 = 0.0;
        assert!(!a.step_ground_contact(&i));
        // Light touch stays airborne until measurable compression
        i.strut_compression_1 = 0.03;
        assert!(!a.step_ground_contact(&i));
        i.strut_compression_1 = 0.2;
        assert!(a.step_ground_contact(&i));
    }

    #[test]
    fn push_arms_then_activates_in_flight() {
        let mut a = athr();
        let mut i = input();
        // Airborne, levers in climb range
        i.strut_compression_1 = 0.0;
        i.strut_compression_2 = 0.0;
        i.tla_1_deg = 20.0;
        i.tla_2_deg = 20.0;
        a.update(&i); // go airborne

        i.athr_push = true;
        let out = a.update(&i);
        assert_eq!(out.status, AthrStatus::Active);
        assert_eq!(out.mode, AthrMode::Speed);
    }

    #[test]
    fn push_again_disengages() {
        let mut a = athr();
        let mut i = input();
        i.strut_compression_1 = 0.0;
        i.strut_compression_2 = 0.0;
        i.tla_1_deg = 20.0;
        i.tla_2_deg = 20.0;
        a.update(&i);

        i.athr_push = true;
        a.update(&i);
        i.athr_push = false;
        a.update(&i);
        i.athr_push = true;
        let out = a.update(&i);
        assert_eq!(out.status, AthrStatus::Disengaged);
    }

    #[test]
    fn held_disconnect_latches_off() {
        let mut a = athr();
        let mut i = input();
        i.strut_compression_1 = 0.0;
        i.strut_compression_2 = 0.0;
        i.tla_1_deg = 20.0;
        i.tla_2_deg = 20.0;
        a.update(&i);
        i.athr_push = true;
        a.update(&i);
        i.athr_push = false;

        i.athr_disconnect = true;
        i.simulation_time_s = 10.0;
        a.update(&i);
        i.simulation_time_s = 10.5; // held 0.5 s
        let out = a.update(&i);
        assert_eq!(out.status, AthrStatus::Disengaged);
    }

    #[test]
    fn speed_mode_obeys_lever_ceiling() {
        let mut a = athr();
        let mut i = input();
        i.strut_compression_1 = 0.0;
        i.strut_compression_2 = 0.0;
        i.tla_1_deg = 20.0;
        i.tla_2_deg = 20.0;
        i.selected_speed_kn = 330.0; // far above current speed
        a.update(&i);
        i.athr_push = true;

        let l = limits();
        let (ceiling, _) = a.tla_to_n1(20.0, false, false, &l);
        let mut out = AutothrustOutput::default();
        for t in 0..600 {
            i.simulation_time_s = 0.1 * f64::from(t);
            out = a.update(&i);
        }
        assert_eq!(out.mode, AthrMode::Speed);
        assert!(out.n1_commanded_1_percent <= ceiling + 1e-9);
        assert!(out.n1_commanded_1_percent >= l.idle);
    }

    #[test]
    fn flex_latch_through_takeoff() {
        let mut a = athr();
        let mut i = input();
        // On ground, FLX temp set, levers at the FLX gate, takeoff phase
        i.flex_temperature_deg_c = 55.0;
        i.flight_phase = 1.0;
        i.tla_1_deg = TLA_MCT_DEG;
        i.tla_2_deg = TLA_MCT_DEG;
        let out = a.update(&i);
        assert!(out.is_flex_active);
        assert_eq!(out.thrust_limit_type_code, 3.0);

        // Airborne, levers still at the gate: latched
        i.strut_compression_1 = 0.0;
        i.strut_compression_2 = 0.0;
        a.update(&i); // leaves ground
        let out = a.update(&i);
        assert!(out.is_flex_active);

        // Thrust reduction to CLB releases the latch
        i.tla_1_deg = TLA_CLB_DEG;
        i.tla_2_deg = TLA_CLB_DEG;
        let out = a.update(&i);
        assert!(!out.is_flex_active);
        assert_eq!(out.thrust_limit_type_code, 1.0);
    }
}
