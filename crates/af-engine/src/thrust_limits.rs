//! Thrust limit computation: IDLE/TOGA/FLEX/CLB/MCT N1 for the current
//! flight condition, with the timed FLEX→CLB handover and the high-altitude
//! MCT/TOGA convergence.

use crate::tables::{limit_n1, LimitRegime};
use serde::{Deserialize, Serialize};

/// Active thrust-limit regime as selected by the autothrust (wire codes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrustLimitType {
    #[default]
    None,
    Clb,
    Mct,
    Flex,
    Toga,
    Reverse,
}

impl ThrustLimitType {
    pub fn from_code(code: f64) -> Self {
        match code as i64 {
            1 => Self::Clb,
            2 => Self::Mct,
            3 => Self::Flex,
            4 => Self::Toga,
            5 => Self::Reverse,
            _ => Self::None,
        }
    }

    pub fn code(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Clb => 1.0,
            Self::Mct => 2.0,
            Self::Flex => 3.0,
            Self::Toga => 4.0,
            Self::Reverse => 5.0,
        }
    }
}

/// Computed N1 limits, percent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThrustLimitSet {
    pub idle: f64,
    pub toga: f64,
    pub flex: f64,
    pub clb: f64,
    pub mct: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct ThrustLimitInput {
    pub simulation_time_s: f64,
    pub press_altitude_ft: f64,
    pub ambient_temp_deg_c: f64,
    pub mach: f64,
    pub idle_n1_percent: f64,
    pub flex_temperature_deg_c: f64,
    pub thrust_limit_type: ThrustLimitType,
    pub packs: bool,
    pub engine_anti_ice: bool,
    pub wing_anti_ice: bool,
}

// FLEX→CLB handover: fixed wait, then a linear ramp. Empirically tuned; do
// not retune without flight-test data.
const TRANSITION_WAIT_S: f64 = 10.0;
const TRANSITION_RAMP_PCT_PER_S: f64 = 0.2;

/// Altitude cap for the takeoff/go-around grids.
const TO_GA_ALT_CAP_FT: f64 = 16600.0;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ThrustLimits {
    is_flex_active: bool,
    is_transition_active: bool,
    transition_start_time_s: f64,
    transition_factor: f64,
    prev_thrust_limit_type: ThrustLimitType,
    prev_flex_temperature: f64,
}

impl ThrustLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flex_active(&self) -> bool {
        self.is_flex_active
    }

    pub fn update(&mut self, input: &ThrustLimitInput) -> ThrustLimitSet {
        let alt = input.press_altitude_ft;
        let temp = input.ambient_temp_deg_c;
        let flex_temp = input.flex_temperature_deg_c;
        let bleeds = (input.packs, input.engine_anti_ice, input.wing_anti_ice);

        let capped_alt = alt.min(TO_GA_ALT_CAP_FT);
        let to = limit_n1(LimitRegime::Takeoff, capped_alt, temp, 0.0, bleeds.0, bleeds.1, bleeds.2);
        let ga = limit_n1(LimitRegime::GoAround, capped_alt, temp, 0.0, bleeds.0, bleeds.1, bleeds.2);
        let (flex_to, flex_ga) = if flex_temp > 0.0 {
            (
                limit_n1(LimitRegime::Takeoff, capped_alt, temp, flex_temp, bleeds.0, bleeds.1, bleeds.2),
                limit_n1(LimitRegime::GoAround, capped_alt, temp, flex_temp, bleeds.0, bleeds.1, bleeds.2),
            )
        } else {
            (0.0, 0.0)
        };
        let mut clb = limit_n1(LimitRegime::Climb, alt, temp, 0.0, bleeds.0, bleeds.1, bleeds.2);
        let mut mct =
            limit_n1(LimitRegime::MaxContinuous, alt, temp, 0.0, bleeds.0, bleeds.1, bleeds.2);

        // TO↔GA blend over Mach 0.04–0.08
        let mach_factor_low = ((input.mach - 0.04) / 0.04).clamp(0.0, 1.0);
        let mut toga = to + (ga - to) * mach_factor_low;
        let flex = flex_to + (flex_ga - flex_to) * mach_factor_low;

        // FLEX activation edges and the timed handover toward CLB
        if (self.prev_thrust_limit_type != ThrustLimitType::Flex
            && input.thrust_limit_type == ThrustLimitType::Flex)
            || (self.prev_flex_temperature == 0.0 && flex_temp > 0.0)
        {
            self.is_flex_active = true;
        } else if flex_temp == 0.0 || input.thrust_limit_type == ThrustLimitType::Toga {
            self.is_flex_active = false;
        }

        if self.is_flex_active
            && !self.is_transition_active
            && input.thrust_limit_type == ThrustLimitType::Clb
        {
            self.is_transition_active = true;
            self.transition_start_time_s = input.simulation_time_s;
            self.transition_factor = TRANSITION_RAMP_PCT_PER_S;
        } else if !self.is_flex_active {
            self.is_transition_active = false;
            self.transition_start_time_s = 0.0;
            self.transition_factor = 0.0;
        }

        let mut delta_thrust = 0.0;
        if self.is_transition_active {
            let time_difference =
                ((input.simulation_time_s - self.transition_start_time_s) - TRANSITION_WAIT_S)
                    .max(0.0);
            if time_difference > 0.0 && clb > flex {
                delta_thrust = (time_difference * self.transition_factor).min(clb - flex);
            }
            if flex + delta_thrust >= clb {
                self.is_flex_active = false;
                self.is_transition_active = false;
            }
        }

        if self.is_flex_active {
            clb = clb.min(flex) + delta_thrust;
        }

        self.prev_thrust_limit_type = input.thrust_limit_type;
        self.prev_flex_temperature = flex_temp;

        // MCT/TOGA convergence with altitude and Mach
        let mach_factor = ((input.mach - 0.37) / 0.05).clamp(0.0, 1.0);
        let altitude_factor_low = ((alt - TO_GA_ALT_CAP_FT) / 500.0).clamp(0.0, 1.0);
        let altitude_factor_high = ((alt - 25000.0) / 500.0).clamp(0.0, 1.0);

        if alt >= 25000.0 {
            mct = clb.max(mct + (clb - mct) * altitude_factor_high);
            toga = mct;
        } else if mct > toga {
            mct = toga + (mct - toga) * (altitude_factor_low + mach_factor).min(1.0);
            toga = mct;
        } else {
            toga += (mct - toga) * (altitude_factor_low + mach_factor).min(1.0);
        }

        ThrustLimitSet {
            idle: input.idle_n1_percent,
            toga,
            flex,
            clb,
            mct,
        }
    }
}
