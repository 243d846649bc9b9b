//! Per-tick FADEC orchestration.
//!
//! [`EngineControl`] owns everything the engine side persists across ticks:
//! both engine snapshots, the oil models, the fuel system, the thrust-limit
//! state and the session imbalance. The host (or the offline scenario
//! runner) constructs it once at session start and calls
//! [`EngineControl::update`] every frame; engine 1 is always evaluated
//! before engine 2.

use crate::config::FuelConfiguration;
use crate::corrections;
use crate::fuel::{FuelSystem, FuelTickInput, FuelTickOutput};
use crate::imbalance::{ImbalanceCode, ImbalanceSet};
use crate::machine::{self, IgniterMode, TransitionInput};
use crate::oil::{OilModel, OilTickInput};
use crate::polynomials;
use crate::state::{EnginePhase, EngineSnapshot};
use crate::tables::{self, IdleParameters};
use crate::thrust_limits::{ThrustLimitInput, ThrustLimitSet, ThrustLimitType, ThrustLimits};
use af_core::lbs_to_kg;
use af_signals::Lookup1d;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::debug;

/// Start-valve opening delay after engine master ON, seconds.
const START_VALVE_DELAY_S: f64 = 1.7;
/// Delay before the spool-down math begins on shutdown, seconds.
const SHUTDOWN_DELAY_S: f64 = 1.8;
/// EGT convergence band that collapses a re-start into a normal start, °C.
const RESTART_EGT_BAND_DEG_C: f64 = 1.5;

/// Host sensor readings for one engine.
#[derive(Clone, Copy, Debug)]
pub struct EngineSensors {
    pub starter_on: bool,
    pub igniter: IgniterMode,
    pub sim_n1_percent: f64,
    pub sim_n2_percent: f64,
    pub corrected_n1_percent: f64,
    pub thrust_lbs: f64,
}

/// Host fuel-system readings.
#[derive(Clone, Copy, Debug)]
pub struct FuelSensors {
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
}

/// Everything the engine model reads from the host in one tick.
#[derive(Clone, Copy, Debug)]
pub struct EngineTickInput {
    pub delta_time_s: f64,
    pub simulation_time_s: f64,
    /// The host's animation delta; two identical consecutive values signal a
    /// paused simulation.
    pub animation_delta_time_s: f64,
    pub mach: f64,
    pub press_altitude_ft: f64,
    pub ambient_temp_deg_c: f64,
    pub ambient_pressure_mbar: f64,
    pub on_ground: bool,
    pub packs: bool,
    pub engine_anti_ice: bool,
    pub wing_anti_ice: bool,
    pub flex_temperature_deg_c: f64,
    pub thrust_limit_type: ThrustLimitType,
    pub engines: [EngineSensors; 2],
    pub fuel: FuelSensors,
}

/// Everything the engine model publishes back after one tick.
#[derive(Clone, Debug)]
pub struct EngineTickOutput {
    pub engines: [EngineSnapshot; 2],
    pub idle: IdleParameters,
    pub thrust_limits: ThrustLimitSet,
    pub fuel: FuelTickOutput,
    pub imbalance_code: f64,
}

/// Session starting conditions, used to seed oil temperatures.
#[derive(Clone, Copy, Debug)]
pub struct SessionInit {
    pub on_ground: bool,
    pub engines_running: bool,
    pub ambient_temp_deg_c: f64,
}

pub struct EngineControl {
    spool: Lookup1d,
    imbalance_code: ImbalanceCode,
    imbalance: ImbalanceSet,
    engines: [EngineSnapshot; 2],
    oil: [OilModel; 2],
    sim_n2_pre: [f64; 2],
    fuel: FuelSystem,
    thrust_limits: ThrustLimits,
    prev_animation_delta_time_s: Option<f64>,
    sim_paused: bool,
    config_path: Option<PathBuf>,
}

impl EngineControl {
    /// Construct the session model. `seed` drives the one-off imbalance and
    /// initial oil fill; a fixed seed reproduces the session exactly.
    pub fn new(
        seed: u64,
        fuel_config: &FuelConfiguration,
        fuel_weight_per_gallon_lbs: f64,
        init: SessionInit,
        config_path: Option<PathBuf>,
    ) -> Self {
        let imbalance_code = ImbalanceCode::generate(seed);
        let imbalance = imbalance_code
            .decode()
            .expect("generated imbalance codes always decode");

        let oil_temp = match (init.on_ground, init.engines_running) {
            (true, true) => 75.0,
            (false, true) => 85.0,
            _ => init.ambient_temp_deg_c,
        };

        let mut oil_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
        let oil = std::array::from_fn(|i| {
            let engine = (i + 1) as u8;
            let fill_qt = f64::from(oil_rng.gen_range(140..=200)) / 10.0;
            let fill_qt = fill_qt - imbalance.for_engine(engine).oil_quantity_qt;
            OilModel::new(
                fill_qt,
                oil_temp,
                imbalance.oil_temperature_max_deg_c,
            )
        });

        debug!(code = imbalance_code.0, "session engine imbalance generated");

        Self {
            spool: tables::spool_table(),
            imbalance_code,
            imbalance,
            engines: std::array::from_fn(|_| EngineSnapshot::cold(init.ambient_temp_deg_c)),
            oil,
            sim_n2_pre: [0.0; 2],
            fuel: FuelSystem::new(fuel_config, fuel_weight_per_gallon_lbs),
            thrust_limits: ThrustLimits::new(),
            prev_animation_delta_time_s: None,
            sim_paused: false,
            config_path,
        }
    }

    pub fn engine(&self, engine: u8) -> &EngineSnapshot {
        &self.engines[usize::from(engine.clamp(1, 2)) - 1]
    }

    pub fn imbalance(&self) -> &ImbalanceSet {
        &self.imbalance
    }

    pub fn update(&mut self, input: &EngineTickInput) -> EngineTickOutput {
        // Pause detection: the host's animation clock freezes when paused.
        let delta_time_diff = match self.prev_animation_delta_time_s {
            Some(prev) => input.animation_delta_time_s - prev,
            None => input.animation_delta_time_s,
        };
        self.prev_animation_delta_time_s = Some(input.animation_delta_time_s);

        let idle = tables::idle_parameters(
            &self.spool,
            input.press_altitude_ft,
            input.ambient_temp_deg_c,
            input.ambient_pressure_mbar,
        );

        for index in 0..2 {
            self.step_engine(index, input, &idle, delta_time_diff);
        }
        self.sim_paused = delta_time_diff == 0.0;

        let fuel_input = FuelTickInput {
            dt_s: input.delta_time_s,
            sim_paused: self.sim_paused,
            on_ground: input.on_ground,
            refuel_started_by_user: input.fuel.refuel_started_by_user,
            refuel_rate: input.fuel.refuel_rate,
            fuel_weight_per_gallon_lbs: input.fuel.fuel_weight_per_gallon_lbs,
            tank_center_gal: input.fuel.tank_center_gal,
            tank_left_gal: input.fuel.tank_left_gal,
            tank_right_gal: input.fuel.tank_right_gal,
            tank_left_aux_gal: input.fuel.tank_left_aux_gal,
            tank_right_aux_gal: input.fuel.tank_right_aux_gal,
            tank_left_capacity_gal: input.fuel.tank_left_capacity_gal,
            tank_right_capacity_gal: input.fuel.tank_right_capacity_gal,
            engine1_ff_kgh: self.engines[0].fuel_flow_kgh,
            engine2_ff_kgh: self.engines[1].fuel_flow_kgh,
            engine1_state: self.engines[0].state,
            engine2_state: self.engines[1].state,
        };
        let fuel = self.fuel.update(&fuel_input);
        self.engines[0].fuel_used_kg = self.fuel.fuel_used_left_kg();
        self.engines[1].fuel_used_kg = self.fuel.fuel_used_right_kg();

        if let (Some(checkpoint), Some(path)) = (&fuel.checkpoint, &self.config_path) {
            checkpoint.save(path);
        }

        let thrust_limits = self.thrust_limits.update(&ThrustLimitInput {
            simulation_time_s: input.simulation_time_s,
            press_altitude_ft: input.press_altitude_ft,
            ambient_temp_deg_c: input.ambient_temp_deg_c,
            mach: input.mach,
            idle_n1_percent: idle.n1_percent,
            flex_temperature_deg_c: input.flex_temperature_deg_c,
            thrust_limit_type: input.thrust_limit_type,
            packs: input.packs,
            engine_anti_ice: input.engine_anti_ice,
            wing_anti_ice: input.wing_anti_ice,
        });

        EngineTickOutput {
            engines: self.engines.clone(),
            idle,
            thrust_limits,
            fuel,
            imbalance_code: self.imbalance_code.to_bus(),
        }
    }

    fn step_engine(
        &mut self,
        index: usize,
        input: &EngineTickInput,
        idle: &IdleParameters,
        delta_time_diff: f64,
    ) {
        let engine_no = (index + 1) as u8;
        let sensors = &input.engines[index];

        let transition = machine::evaluate(
            self.engines[index].state,
            &TransitionInput {
                igniter: sensors.igniter,
                starter_on: sensors.starter_on,
                sim_n2_percent: sensors.sim_n2_percent,
                idle_n2_percent: idle.n2_percent,
                egt_deg_c: self.engines[index].egt_deg_c,
                ambient_temp_deg_c: input.ambient_temp_deg_c,
                delta_time_diff,
            },
        );
        if transition.next.phase != self.engines[index].state.phase {
            debug!(
                engine = engine_no,
                from = ?self.engines[index].state.phase,
                to = ?transition.next.phase,
                "engine state transition"
            );
        }
        self.engines[index].state = transition.next;
        if transition.reset_timer {
            self.engines[index].timer_s = 0.0;
        }

        let delta_n2 = sensors.sim_n2_percent - self.sim_n2_pre[index];
        self.sim_n2_pre[index] = sensors.sim_n2_percent;

        if self.engines[index].state.paused {
            // Paused: no parameter evolution at all this tick.
            return;
        }

        match self.engines[index].state.phase {
            EnginePhase::Starting | EnginePhase::Restarting => {
                self.start_procedure(index, engine_no, input, idle);
            }
            EnginePhase::Shutting => {
                self.shutdown_procedure(index, input);
                self.update_fuel_flow(index, engine_no, input);
            }
            EnginePhase::Off | EnginePhase::On => {
                self.update_primary(index, engine_no, sensors);
                let cff = self.update_fuel_flow(index, engine_no, input);
                self.update_egt(index, engine_no, input, cff);
                self.update_oil(index, engine_no, input, delta_n2);
            }
        }
    }

    /// Spool-up while STARTING/RESTARTING: valve-open delay first, then the
    /// bounded N2 approach with N1/FF/EGT derived from it.
    fn start_procedure(
        &mut self,
        index: usize,
        engine_no: u8,
        input: &EngineTickInput,
        idle: &IdleParameters,
    ) {
        let imb = self.imbalance.for_engine(engine_no);
        let snap = &mut self.engines[index];

        if snap.timer_s < START_VALVE_DELAY_S {
            if input.on_ground {
                self.fuel.reset_fuel_used(engine_no);
                snap.fuel_used_kg = 0.0;
            }
            snap.timer_s += input.delta_time_s;
            return;
        }

        let target_n2 = idle.n2_percent - imb.n2_percent;
        let pre_n2 = snap.n2_percent;
        let pre_egt = snap.egt_deg_c;

        let new_n2 = polynomials::start_n2(input.engines[index].sim_n2_percent, pre_n2, target_n2);
        snap.n2_percent = new_n2;
        snap.n1_percent = polynomials::start_n1(new_n2, target_n2, idle.n1_percent);
        snap.fuel_flow_kgh =
            polynomials::start_ff(new_n2, target_n2, idle.fuel_flow_kgh - imb.fuel_flow_kgh);

        let start_egt = polynomials::start_egt(
            new_n2,
            target_n2,
            input.ambient_temp_deg_c,
            idle.egt_deg_c - imb.egt_deg_c,
        );

        if snap.state.phase == EnginePhase::Restarting {
            // Re-light from a hot engine: converge the EGT before treating
            // this as a normal start, so the gauge never jumps.
            if (start_egt - pre_egt).abs() <= RESTART_EGT_BAND_DEG_C {
                snap.egt_deg_c = start_egt;
                snap.state.phase = EnginePhase::Starting;
            } else if start_egt > pre_egt {
                snap.egt_deg_c = pre_egt + 0.75 * input.delta_time_s * (target_n2 - new_n2);
            } else {
                snap.egt_deg_c =
                    polynomials::shutdown_egt(pre_egt, input.ambient_temp_deg_c, input.delta_time_s);
            }
        } else {
            snap.egt_deg_c = start_egt;
        }

        let oil_temp =
            polynomials::start_oil_temp(new_n2, idle.n2_percent, input.ambient_temp_deg_c);
        self.oil[index].set_temperature(oil_temp);
        snap.oil_temperature_deg_c = oil_temp;
    }

    /// Spool-down while SHUTTING: delay, then exponential decay with the
    /// windmilling floor on N1.
    fn shutdown_procedure(&mut self, index: usize, input: &EngineTickInput) {
        let snap = &mut self.engines[index];

        if snap.timer_s < SHUTDOWN_DELAY_S {
            snap.timer_s += input.delta_time_s;
            return;
        }

        let dt = input.delta_time_s;
        let sim_n1 = input.engines[index].sim_n1_percent;

        let mut new_n1 = polynomials::shutdown_n1(snap.n1_percent, dt);
        if sim_n1 < 5.0 && sim_n1 > new_n1 {
            // Windmilling: the airstream keeps the fan above the decay curve
            new_n1 = sim_n1;
        }
        snap.n1_percent = new_n1;
        snap.n2_percent = polynomials::shutdown_n2(snap.n2_percent, dt);
        snap.egt_deg_c =
            polynomials::shutdown_egt(snap.egt_deg_c, input.ambient_temp_deg_c, dt);
    }

    /// Steady-state spool readings: N1 passed through, N2 offset by the
    /// session imbalance.
    fn update_primary(&mut self, index: usize, engine_no: u8, sensors: &EngineSensors) {
        let imb = self.imbalance.for_engine(engine_no);
        let snap = &mut self.engines[index];
        snap.n1_percent = sensors.sim_n1_percent;
        snap.n2_percent = (sensors.sim_n2_percent - imb.n2_percent).max(0.0);
    }

    /// Fuel flow from the corrected-flow calibration, with the flameout
    /// floor. Returns the corrected flow (lb/h) for the EGT computation.
    fn update_fuel_flow(&mut self, index: usize, engine_no: u8, input: &EngineTickInput) -> f64 {
        let imb = self.imbalance.for_engine(engine_no);
        let cn1 = input.engines[index].corrected_n1_percent;
        let cff = polynomials::corrected_fuel_flow(cn1, input.mach, input.press_altitude_ft);

        let out = if cff < 1.0 {
            0.0
        } else {
            lbs_to_kg(cff)
                * corrections::delta2_from_pressure(input.mach, input.ambient_pressure_mbar)
                * corrections::theta2(input.mach, input.ambient_temp_deg_c).sqrt()
                - imb.fuel_flow_kgh
        };
        self.engines[index].fuel_flow_kgh = out.max(0.0);
        cff
    }

    /// Steady-state EGT: corrected calibration scaled to total conditions,
    /// blended from the previous value with a time-varying exponent.
    fn update_egt(&mut self, index: usize, engine_no: u8, input: &EngineTickInput, cff: f64) {
        let imb = self.imbalance.for_engine(engine_no);
        let snap = &mut self.engines[index];

        if input.on_ground && snap.state.phase == EnginePhase::Off {
            snap.egt_deg_c = input.ambient_temp_deg_c;
            return;
        }

        let cn1 = input.engines[index].corrected_n1_percent;
        let corrected =
            polynomials::corrected_egt(cn1, cff, input.mach, input.press_altitude_ft);
        let actual = corrected * corrections::theta2(input.mach, input.ambient_temp_deg_c)
            - imb.egt_deg_c;
        snap.egt_deg_c = actual + (snap.egt_deg_c - actual) * (-0.1 * input.delta_time_s).exp();
    }

    fn update_oil(&mut self, index: usize, engine_no: u8, input: &EngineTickInput, delta_n2: f64) {
        let imb = self.imbalance.for_engine(engine_no);
        let out = self.oil[index].update(
            &imb,
            &OilTickInput {
                dt_s: input.delta_time_s,
                on_ground: input.on_ground,
                engine_off: self.engines[index].state.phase == EnginePhase::Off,
                ambient_temp_deg_c: input.ambient_temp_deg_c,
                egt_deg_c: self.engines[index].egt_deg_c,
                thrust_lbs: input.engines[index].thrust_lbs,
                sim_n2_percent: input.engines[index].sim_n2_percent,
                delta_n2_percent: delta_n2,
            },
        );
        let snap = &mut self.engines[index];
        snap.oil_temperature_deg_c = out.temperature_deg_c;
        snap.oil_quantity_qt = out.quantity_qt;
        snap.oil_total_qt = out.total_qt;
        snap.oil_pressure_psi = out.pressure_psi;
    }
}
