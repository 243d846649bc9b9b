//! Fuel consumption, transfer and tankering model.
//!
//! The model keeps its own pre-cycle tank quantities (in pounds) and
//! reconciles them against the host's tank readings every tick: engine burn
//! is integrated from fuel flow, aux-tank and center-tank outflow is
//! transferred into the main tanks, and main-tank overflow spills into the
//! center tank. An implausibly fast quantity change outside of a refuel is
//! treated as UI tampering and freezes the model for the tick.

use crate::config::FuelConfiguration;
use crate::state::{EnginePhase, EngineState};
use af_core::{kg_to_lbs, lbs_to_gallons};
use af_signals::DwellTimer;
use serde::{Deserialize, Serialize};

/// Wing pump activity derived from tank-quantity edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PumpState {
    #[default]
    Off,
    Draining,
    Filling,
}

impl PumpState {
    pub fn code(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Draining => 1.0,
            Self::Filling => 2.0,
        }
    }
}

// Pump dwell windows, milliseconds.
const PUMP_REARM_MS: f64 = 1000.0;
const PUMP_DRAIN_MS: f64 = 2100.0;
const PUMP_FILL_MS: f64 = 2700.0;

/// Quantity-change rate above which a non-refuel change is tampering.
const FUEL_THRESHOLD: f64 = 661.0; // lbs/sec

/// Checkpoint interval while on the ground with engines not running.
const CHECKPOINT_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug)]
pub struct FuelTickInput {
    pub dt_s: f64,
    pub sim_paused: bool,
    pub on_ground: bool,
    pub refuel_started_by_user: bool,
    pub refuel_rate: f64,
    pub fuel_weight_per_gallon_lbs: f64,
    pub tank_center_gal: f64,
    pub tank_left_gal: f64,
    pub tank_right_gal: f64,
    pub tank_left_aux_gal: f64,
    pub tank_right_aux_gal: f64,
    pub tank_left_capacity_gal: f64,
    pub tank_right_capacity_gal: f64,
    pub engine1_ff_kgh: f64,
    pub engine2_ff_kgh: f64,
    pub engine1_state: EngineState,
    pub engine2_state: EngineState,
}

/// Quantities published back to the host, in gallons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelTickOutput {
    pub tank_center_gal: f64,
    pub tank_left_gal: f64,
    pub tank_right_gal: f64,
    pub tank_left_aux_gal: f64,
    pub tank_right_aux_gal: f64,
    pub pump_state_left: PumpState,
    pub pump_state_right: PumpState,
    /// Set when the periodic on-ground checkpoint fired this tick.
    pub checkpoint: Option<FuelConfiguration>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuelSystem {
    center_pre_lbs: f64,
    left_pre_lbs: f64,
    right_pre_lbs: f64,
    aux_left_pre_lbs: f64,
    aux_right_pre_lbs: f64,
    engine1_pre_ff_kgh: f64,
    engine2_pre_ff_kgh: f64,
    fuel_used_left_kg: f64,
    fuel_used_right_kg: f64,
    pump_left: PumpState,
    pump_right: PumpState,
    timer_left: DwellTimer,
    timer_right: DwellTimer,
    timer_checkpoint: DwellTimer,
}

impl FuelSystem {
    /// Seed the pre-cycle quantities from the persisted configuration.
    pub fn new(config: &FuelConfiguration, fuel_weight_per_gallon_lbs: f64) -> Self {
        let fw = fuel_weight_per_gallon_lbs;
        Self {
            center_pre_lbs: config.center_gal * fw,
            left_pre_lbs: config.left_gal * fw,
            right_pre_lbs: config.right_gal * fw,
            aux_left_pre_lbs: config.left_aux_gal * fw,
            aux_right_pre_lbs: config.right_aux_gal * fw,
            engine1_pre_ff_kgh: 0.0,
            engine2_pre_ff_kgh: 0.0,
            fuel_used_left_kg: 0.0,
            fuel_used_right_kg: 0.0,
            pump_left: PumpState::Off,
            pump_right: PumpState::Off,
            timer_left: DwellTimer::new(),
            timer_right: DwellTimer::new(),
            timer_checkpoint: DwellTimer::new(),
        }
    }

    pub fn fuel_used_left_kg(&self) -> f64 {
        self.fuel_used_left_kg
    }

    pub fn fuel_used_right_kg(&self) -> f64 {
        self.fuel_used_right_kg
    }

    /// The start procedure zeroes the used-fuel accumulator on the ground.
    pub fn reset_fuel_used(&mut self, engine: u8) {
        match engine {
            1 => self.fuel_used_left_kg = 0.0,
            _ => self.fuel_used_right_kg = 0.0,
        }
    }

    fn step_pump(
        pump: &mut PumpState,
        timer: &mut DwellTimer,
        pre_lbs: &mut f64,
        quantity_lbs: f64,
    ) {
        match *pump {
            PumpState::Off => {
                if timer.elapsed_ms() == 0.0 || timer.elapsed_ms() >= PUMP_REARM_MS {
                    if *pre_lbs - quantity_lbs > 0.0 && quantity_lbs == 0.0 {
                        timer.reset();
                        *pump = PumpState::Draining;
                    } else if *pre_lbs == 0.0 && quantity_lbs - *pre_lbs > 0.0 {
                        timer.reset();
                        *pump = PumpState::Filling;
                    }
                }
            }
            PumpState::Draining => {
                if timer.elapsed_ms() >= PUMP_DRAIN_MS {
                    *pump = PumpState::Off;
                    *pre_lbs = 0.0;
                    timer.reset();
                }
            }
            PumpState::Filling => {
                if timer.elapsed_ms() >= PUMP_FILL_MS {
                    *pump = PumpState::Off;
                    timer.reset();
                }
            }
        }
    }

    /// Trapezoidal burn over the tick from the flow at both ends, in kg.
    /// `dt_h` is the tick length in hours.
    fn cycle_burn_kg(ff_kgh: f64, pre_ff_kgh: f64, dt_h: f64) -> f64 {
        let m = (ff_kgh - pre_ff_kgh) / dt_h;
        let b = pre_ff_kgh;
        m * dt_h * dt_h / 2.0 + b * dt_h
    }

    pub fn update(&mut self, input: &FuelTickInput) -> FuelTickOutput {
        let fw = input.fuel_weight_per_gallon_lbs;
        let dt = input.dt_s;

        self.timer_left.advance(dt);
        self.timer_right.advance(dt);
        self.timer_checkpoint.advance(dt);

        let left_qty_lbs = input.tank_left_gal * fw;
        let right_qty_lbs = input.tank_right_gal * fw;
        let left_aux_qty_lbs = input.tank_left_aux_gal * fw;
        let right_aux_qty_lbs = input.tank_right_aux_gal * fw;
        let center_qty_lbs = input.tank_center_gal * fw;

        Self::step_pump(
            &mut self.pump_left,
            &mut self.timer_left,
            &mut self.left_pre_lbs,
            left_qty_lbs,
        );
        Self::step_pump(
            &mut self.pump_right,
            &mut self.timer_right,
            &mut self.right_pre_lbs,
            right_qty_lbs,
        );

        let total_actual_lbs =
            left_qty_lbs + right_qty_lbs + left_aux_qty_lbs + right_aux_qty_lbs + center_qty_lbs;
        let total_pre_lbs = self.left_pre_lbs
            + self.right_pre_lbs
            + self.aux_left_pre_lbs
            + self.aux_right_pre_lbs
            + self.center_pre_lbs;
        let delta_fuel_rate = if dt > 0.0 {
            (total_actual_lbs - total_pre_lbs).abs() / (fw * dt)
        } else {
            0.0
        };

        let ui_fuel_tamper = (!input.refuel_started_by_user && delta_fuel_rate > FUEL_THRESHOLD)
            || (input.refuel_started_by_user
                && delta_fuel_rate > FUEL_THRESHOLD
                && input.refuel_rate < 2.0);

        let (center_out, left_out, right_out, aux_left_out, aux_right_out);

        if input.sim_paused || ui_fuel_tamper {
            // Freeze the model: republish the last good pre-cycle quantities.
            center_out = self.center_pre_lbs;
            left_out = self.left_pre_lbs;
            right_out = self.right_pre_lbs;
            aux_left_out = self.aux_left_pre_lbs;
            aux_right_out = self.aux_right_pre_lbs;
        } else if input.refuel_started_by_user {
            // Deliberate refuel: adopt the new quantities as the baseline.
            self.left_pre_lbs = left_qty_lbs;
            self.right_pre_lbs = right_qty_lbs;
            self.aux_left_pre_lbs = left_aux_qty_lbs;
            self.aux_right_pre_lbs = right_aux_qty_lbs;
            self.center_pre_lbs = center_qty_lbs;
            center_out = center_qty_lbs;
            left_out = left_qty_lbs;
            right_out = right_qty_lbs;
            aux_left_out = left_aux_qty_lbs;
            aux_right_out = right_aux_qty_lbs;
        } else {
            let dt_h = dt / 3600.0;

            // Left engine and wing
            let mut fuel_burn1_kg = 0.0;
            let mut xfr_aux_left = 0.0;
            if self.left_pre_lbs > 0.0 {
                fuel_burn1_kg =
                    Self::cycle_burn_kg(input.engine1_ff_kgh, self.engine1_pre_ff_kgh, dt_h);
                self.fuel_used_left_kg += fuel_burn1_kg;
                if self.aux_left_pre_lbs > left_aux_qty_lbs {
                    xfr_aux_left = self.aux_left_pre_lbs - left_aux_qty_lbs;
                }
            } else {
                self.left_pre_lbs = 0.0;
            }

            // Right engine and wing
            let mut fuel_burn2_kg = 0.0;
            let mut xfr_aux_right = 0.0;
            if self.right_pre_lbs > 0.0 {
                fuel_burn2_kg =
                    Self::cycle_burn_kg(input.engine2_ff_kgh, self.engine2_pre_ff_kgh, dt_h);
                self.fuel_used_right_kg += fuel_burn2_kg;
                if self.aux_right_pre_lbs > right_aux_qty_lbs {
                    xfr_aux_right = self.aux_right_pre_lbs - right_aux_qty_lbs;
                }
            } else {
                self.right_pre_lbs = 0.0;
            }

            // Center tank outflow splits evenly into the mains
            let mut xfr_center = 0.0;
            if self.center_pre_lbs > center_qty_lbs {
                xfr_center = self.center_pre_lbs - center_qty_lbs;
            }

            let mut fuel_left =
                self.left_pre_lbs - kg_to_lbs(fuel_burn1_kg) + xfr_aux_left + xfr_center / 2.0;
            let mut fuel_right =
                self.right_pre_lbs - kg_to_lbs(fuel_burn2_kg) + xfr_aux_right + xfr_center / 2.0;

            // Main-tank capacity clamp; overflow always lands in the center
            let left_capacity_lbs = input.tank_left_capacity_gal * fw;
            let right_capacity_lbs = input.tank_right_capacity_gal * fw;
            let mut fuel_center = center_qty_lbs;
            if fuel_left > left_capacity_lbs {
                fuel_center += fuel_left - left_capacity_lbs;
                fuel_left = left_capacity_lbs;
            }
            if fuel_right > right_capacity_lbs {
                fuel_center += fuel_right - right_capacity_lbs;
                fuel_right = right_capacity_lbs;
            }

            // New pre-cycle baseline
            self.engine1_pre_ff_kgh = input.engine1_ff_kgh;
            self.engine2_pre_ff_kgh = input.engine2_ff_kgh;
            self.aux_left_pre_lbs = left_aux_qty_lbs;
            self.aux_right_pre_lbs = right_aux_qty_lbs;
            self.center_pre_lbs = fuel_center;
            self.left_pre_lbs = fuel_left;
            self.right_pre_lbs = fuel_right;

            center_out = fuel_center;
            left_out = fuel_left;
            right_out = fuel_right;
            aux_left_out = left_aux_qty_lbs;
            aux_right_out = right_aux_qty_lbs;
        }

        // Periodic checkpoint while parked with engines not running
        let engine_not_running = |s: EngineState| {
            matches!(s.phase, EnginePhase::Off | EnginePhase::Shutting)
        };
        let mut checkpoint = None;
        if self.timer_checkpoint.elapsed_ms() >= CHECKPOINT_MS
            && input.on_ground
            && (engine_not_running(input.engine1_state) || engine_not_running(input.engine2_state))
        {
            checkpoint = Some(FuelConfiguration {
                center_gal: lbs_to_gallons(self.center_pre_lbs, fw),
                left_gal: lbs_to_gallons(self.left_pre_lbs, fw),
                right_gal: lbs_to_gallons(self.right_pre_lbs, fw),
                left_aux_gal: lbs_to_gallons(self.aux_left_pre_lbs, fw),
                right_aux_gal: lbs_to_gallons(self.aux_right_pre_lbs, fw),
            });
            self.timer_checkpoint.reset();
        }

        FuelTickOutput {
            tank_center_gal: lbs_to_gallons(center_out, fw),
            tank_left_gal: lbs_to_gallons(left_out, fw),
            tank_right_gal: lbs_to_gallons(right_out, fw),
            tank_left_aux_gal: lbs_to_gallons(aux_left_out, fw),
            tank_right_aux_gal: lbs_to_gallons(aux_right_out, fw),
            pump_state_left: self.pump_left,
            pump_state_right: self.pump_right,
            checkpoint,
        }
    }
}
