//! Calibration tables: spool relationship, idle parameters, thrust-limit
//! grids.
//!
//! Table values are calibration data for a high-bypass twin configuration.

use crate::corrections;
use crate::polynomials;
use af_signals::{Lookup1d, Lookup2d};
use serde::{Deserialize, Serialize};

/// Corrected N2 → corrected N1 spool relationship (table 1502 lineage).
pub fn spool_table() -> Lookup1d {
    Lookup1d::new(
        vec![
            17.1846, 20.7725, 24.5494, 53.8197, 66.0, 71.245, 75.611, 81.0766, 84.5383, 88.3644,
            91.0973, 94.7412, 110.0,
        ],
        vec![
            0.0, 2.1327, 2.8061, 14.3674, 22.0, 26.5111, 32.038, 41.7774, 51.0025, 66.2776,
            78.5135, 86.6708, 105.0,
        ],
    )
    .expect("static spool table is well-formed")
}

/// Expected corrected N2 at idle for a pressure altitude.
pub fn idle_cn2(press_altitude_ft: f64) -> f64 {
    66.0 / ((288.15 - 1.98 * press_altitude_ft / 1000.0) / 288.15).sqrt()
}

/// Expected corrected N1 at idle, from the spool relationship.
pub fn idle_cn1(spool: &Lookup1d, press_altitude_ft: f64) -> f64 {
    spool.interpolate(idle_cn2(press_altitude_ft))
}

/// Idle reference parameters for the current flight condition, republished to
/// the bus every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdleParameters {
    pub n1_percent: f64,
    pub n2_percent: f64,
    pub fuel_flow_kgh: f64,
    pub egt_deg_c: f64,
}

pub fn idle_parameters(
    spool: &Lookup1d,
    press_altitude_ft: f64,
    ambient_temp_deg_c: f64,
    ambient_pressure_mbar: f64,
) -> IdleParameters {
    let cn1 = idle_cn1(spool, press_altitude_ft);
    let cn2 = idle_cn2(press_altitude_ft);

    let n1 = cn1 * corrections::theta2(0.0, ambient_temp_deg_c).sqrt();
    let n2 = cn2 * corrections::theta(ambient_temp_deg_c).sqrt();

    let cff_lbs_h = polynomials::corrected_fuel_flow(cn1, 0.0, press_altitude_ft);
    let ff_kgh = af_core::lbs_to_kg(cff_lbs_h)
        * corrections::delta2_from_pressure(0.0, ambient_pressure_mbar)
        * corrections::theta2(0.0, ambient_temp_deg_c).sqrt();

    let egt = polynomials::corrected_egt(cn1, cff_lbs_h, 0.0, press_altitude_ft)
        * corrections::theta2(0.0, ambient_temp_deg_c);

    IdleParameters {
        n1_percent: n1,
        n2_percent: n2,
        fuel_flow_kgh: ff_kgh.max(0.0),
        egt_deg_c: egt,
    }
}

/// Thrust-limit regime selector for the calibration grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitRegime {
    Takeoff,
    GoAround,
    Climb,
    MaxContinuous,
}

const LIMIT_ALT_BP: [f64; 5] = [0.0, 5000.0, 10000.0, 16600.0, 25000.0];
const LIMIT_TEMP_BP: [f64; 5] = [-40.0, 0.0, 30.0, 45.0, 70.0];

// Corrected N1 limit grids, rows = altitude, cols = temperature. Flat-rated
// below the corner point, falling above it.
const TAKEOFF_N1: [f64; 25] = [
    89.0, 91.5, 93.0, 86.5, 74.0, //
    91.0, 93.5, 95.0, 88.0, 75.5, //
    93.0, 95.5, 97.0, 89.5, 77.0, //
    95.0, 97.5, 99.0, 91.0, 78.5, //
    96.0, 98.5, 100.0, 92.0, 79.5,
];
const GO_AROUND_N1: [f64; 25] = [
    89.5, 92.0, 93.5, 87.0, 74.5, //
    91.5, 94.0, 95.5, 88.5, 76.0, //
    93.5, 96.0, 97.5, 90.0, 77.5, //
    95.5, 98.0, 99.5, 91.5, 79.0, //
    96.5, 99.0, 100.5, 92.5, 80.0,
];
const CLIMB_N1: [f64; 25] = [
    80.0, 84.0, 86.5, 82.0, 72.0, //
    82.5, 86.5, 89.0, 84.0, 73.5, //
    85.0, 89.0, 91.5, 86.0, 75.0, //
    87.5, 91.5, 94.0, 88.0, 76.5, //
    89.0, 93.0, 95.5, 89.5, 77.5,
];
const MCT_N1: [f64; 25] = [
    84.0, 87.0, 89.0, 84.5, 75.0, //
    86.0, 89.0, 91.0, 86.5, 76.5, //
    88.0, 91.0, 93.0, 88.5, 78.0, //
    90.0, 93.0, 95.0, 90.5, 79.5, //
    91.5, 94.5, 96.5, 92.0, 80.5,
];

// Bleed penalties on the N1 limit, percent.
const PACKS_DELTA: f64 = -0.6;
const ENGINE_ANTI_ICE_DELTA: f64 = -0.7;
const WING_ANTI_ICE_DELTA: f64 = -0.9;

fn limit_table(regime: LimitRegime) -> Lookup2d {
    let values = match regime {
        LimitRegime::Takeoff => TAKEOFF_N1,
        LimitRegime::GoAround => GO_AROUND_N1,
        LimitRegime::Climb => CLIMB_N1,
        LimitRegime::MaxContinuous => MCT_N1,
    };
    Lookup2d::new(LIMIT_ALT_BP.to_vec(), LIMIT_TEMP_BP.to_vec(), values.to_vec())
        .expect("static limit table is well-formed")
}

/// N1 limit for a regime and flight condition, with bleed penalties.
///
/// A positive `flex_temperature_deg_c` replaces the ambient temperature in
/// the grid lookup (flexible-temperature derate).
#[allow(clippy::too_many_arguments)]
pub fn limit_n1(
    regime: LimitRegime,
    press_altitude_ft: f64,
    ambient_temp_deg_c: f64,
    flex_temperature_deg_c: f64,
    packs: bool,
    engine_anti_ice: bool,
    wing_anti_ice: bool,
) -> f64 {
    let temp = if flex_temperature_deg_c > 0.0 {
        flex_temperature_deg_c
    } else {
        ambient_temp_deg_c
    };
    let mut n1 = limit_table(regime).interpolate(press_altitude_ft, temp);
    if packs {
        n1 += PACKS_DELTA;
    }
    if engine_anti_ice {
        n1 += ENGINE_ANTI_ICE_DELTA;
    }
    if wing_anti_ice {
        n1 += WING_ANTI_ICE_DELTA;
    }
    n1
}
