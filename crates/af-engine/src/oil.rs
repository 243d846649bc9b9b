//! Oil temperature, quantity and pressure model (per engine).

use crate::imbalance::ImbalanceSet;
use crate::polynomials;
use serde::{Deserialize, Serialize};

/// Oil burn rate, quarts per second.
const OIL_BURN_QT_PER_S: f64 = 0.00011111;

/// Thermal-energy low-pass retention per tick.
const THERMAL_RETENTION: f64 = 0.995;

#[derive(Clone, Copy, Debug)]
pub struct OilTickInput {
    pub dt_s: f64,
    pub on_ground: bool,
    pub engine_off: bool,
    pub ambient_temp_deg_c: f64,
    pub egt_deg_c: f64,
    pub thrust_lbs: f64,
    pub sim_n2_percent: f64,
    pub delta_n2_percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OilTickOutput {
    pub temperature_deg_c: f64,
    pub quantity_qt: f64,
    pub total_qt: f64,
    pub pressure_psi: f64,
}

/// Per-engine oil state advanced once per tick in the steady branch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OilModel {
    thermal_energy: f64,
    temperature_pre_deg_c: f64,
    temperature_max_deg_c: f64,
    quantity_qt: f64,
    total_qt: f64,
}

impl OilModel {
    pub fn new(total_qt: f64, initial_temp_deg_c: f64, temperature_max_deg_c: f64) -> Self {
        Self {
            thermal_energy: 0.0,
            temperature_pre_deg_c: initial_temp_deg_c,
            temperature_max_deg_c,
            quantity_qt: total_qt,
            total_qt,
        }
    }

    pub fn temperature_deg_c(&self) -> f64 {
        self.temperature_pre_deg_c
    }

    /// Direct temperature override used by the start procedure, which drives
    /// oil temperature from core speed rather than the thermal model.
    pub fn set_temperature(&mut self, temp_deg_c: f64) {
        self.temperature_pre_deg_c = temp_deg_c;
    }

    pub fn update(&mut self, imbalance: &ImbalanceSet, input: &OilTickInput) -> OilTickOutput {
        // Temperature
        let temperature = if input.on_ground
            && input.engine_off
            && input.ambient_temp_deg_c > self.temperature_pre_deg_c - 10.0
        {
            input.ambient_temp_deg_c
        } else {
            let steady = input.egt_deg_c.min(self.temperature_max_deg_c);
            if input.dt_s > 0.0 {
                self.thermal_energy =
                    THERMAL_RETENTION * self.thermal_energy + input.delta_n2_percent / input.dt_s;
            }
            polynomials::oil_temperature(
                self.thermal_energy,
                self.temperature_pre_deg_c,
                steady,
                input.dt_s,
            )
        };

        // Quantity: gulp into the engine as thrust rises, plus slow burn
        let gulp_objective = self.total_qt * (1.0 - polynomials::oil_gulp_pct(input.thrust_lbs));
        let temp_delta = temperature - self.temperature_pre_deg_c;
        let burn = OIL_BURN_QT_PER_S * input.dt_s;
        self.quantity_qt = (self.quantity_qt - temp_delta - burn)
            .clamp(0.0, gulp_objective.max(0.0));
        self.total_qt = (self.total_qt - burn).max(0.0);

        // Pressure
        let pressure = (polynomials::oil_pressure(input.sim_n2_percent)
            - imbalance.oil_pressure_psi
            + imbalance.oil_pressure_idle_psi)
            .max(0.0);

        self.temperature_pre_deg_c = temperature;

        OilTickOutput {
            temperature_deg_c: temperature,
            quantity_qt: self.quantity_qt - imbalance.oil_quantity_qt,
            total_qt: self.total_qt,
            pressure_psi: pressure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imbalance::ImbalanceCode;

    fn nominal_imbalance() -> ImbalanceSet {
        // Engine 2 imbalanced; engine 1 sees zero deltas
        ImbalanceCode(205043002150306).decode().unwrap().for_engine(1)
    }

    fn running_input() -> OilTickInput {
        OilTickInput {
            dt_s: 0.5,
            on_ground: false,
            engine_off: false,
            ambient_temp_deg_c: 15.0,
            egt_deg_c: 420.0,
            thrust_lbs: 12000.0,
            sim_n2_percent: 80.0,
            delta_n2_percent: 0.0,
        }
    }

    #[test]
    fn temperature_warms_toward_capped_egt() {
        let mut oil = OilModel::new(16.0, 15.0, 90.0);
        let imbalance = nominal_imbalance();
        let mut last = 15.0;
        for _ in 0..10000 {
            last = oil.update(&imbalance, &running_input()).temperature_deg_c;
        }
        // Steady temperature is capped by the oil temperature maximum, not
        // the EGT itself
        assert!(last > 60.0);
        assert!(last <= 90.0 + 1.0);
    }

    #[test]
    fn parked_cold_engine_reads_ambient() {
        let mut oil = OilModel::new(16.0, 20.0, 90.0);
        let imbalance = nominal_imbalance();
        let mut input = running_input();
        input.on_ground = true;
        input.engine_off = true;
        input.egt_deg_c = 15.0;
        let out = oil.update(&imbalance, &input);
        assert_eq!(out.temperature_deg_c, input.ambient_temp_deg_c);
    }

    #[test]
    fn oil_burns_down_over_time() {
        let mut oil = OilModel::new(16.0, 75.0, 90.0);
        let imbalance = nominal_imbalance();
        let mut input = running_input();
        input.egt_deg_c = 75.0; // thermal equilibrium, isolate the burn term
        let first = oil.update(&imbalance, &input).total_qt;
        let mut last = first;
        for _ in 0..100 {
            last = oil.update(&imbalance, &input).total_qt;
        }
        assert!(last < first);
    }

    #[test]
    fn pressure_follows_core_speed_and_never_negative() {
        let mut oil = OilModel::new(16.0, 75.0, 90.0);
        let imbalance = nominal_imbalance();
        let mut input = running_input();
        input.sim_n2_percent = 0.0;
        let stopped = oil.update(&imbalance, &input).pressure_psi;
        input.sim_n2_percent = 90.0;
        let running = oil.update(&imbalance, &input).pressure_psi;
        assert!(running > stopped);
        assert!(stopped >= 0.0);
    }
}
