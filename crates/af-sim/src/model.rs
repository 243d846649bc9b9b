//! The aircraft model: bus snapshot in, bus snapshot out.

use af_bus::{SimVar, VariableBus};
use af_engine::{
    EngineControl, EngineSensors, EngineTickInput, FuelConfiguration, FuelSensors, IgniterMode,
    SessionInit, ThrustLimitType,
};
use af_guidance::{
    ApEngagement, Autothrust, AutothrustInput, AutothrustOutput, EngagementInput, LateralInput,
    LateralLawOutput, LateralLaws, LateralMode, VerticalInput, VerticalLawOutput, VerticalLaws,
    VerticalMode,
};
use af_recorder::{
    AdditionalBlock, ApLawsBlock, ApStateMachineBlock, AthrBlock, EngineBlock, RecorderFrame,
};
use std::path::PathBuf;

/// Session construction options.
#[derive(Clone, Debug)]
pub struct ModelOptions {
    /// Seed for the per-session engine imbalance and oil fill.
    pub seed: u64,
    pub fuel_config: FuelConfiguration,
    pub fuel_weight_per_gallon_lbs: f64,
    pub on_ground: bool,
    pub engines_running: bool,
    pub ambient_temp_deg_c: f64,
    /// Where to checkpoint fuel state, if anywhere.
    pub config_path: Option<PathBuf>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            fuel_config: FuelConfiguration::default(),
            fuel_weight_per_gallon_lbs: 6.7,
            on_ground: true,
            engines_running: false,
            ambient_temp_deg_c: 15.0,
            config_path: None,
        }
    }
}

/// One explicit model object owns every subsystem; the host constructs it at
/// session start and passes it to the per-tick entry point. No globals.
pub struct AircraftModel {
    engine_control: EngineControl,
    engagement: ApEngagement,
    lateral_laws: LateralLaws,
    vertical_laws: VerticalLaws,
    autothrust: Autothrust,
    last_lateral: LateralLawOutput,
    last_vertical: VerticalLawOutput,
    last_athr: AutothrustOutput,
}

impl AircraftModel {
    pub fn new(options: ModelOptions) -> Self {
        let engine_control = EngineControl::new(
            options.seed,
            &options.fuel_config,
            options.fuel_weight_per_gallon_lbs,
            SessionInit {
                on_ground: options.on_ground,
                engines_running: options.engines_running,
                ambient_temp_deg_c: options.ambient_temp_deg_c,
            },
            options.config_path,
        );
        Self {
            engine_control,
            engagement: ApEngagement::new(),
            lateral_laws: LateralLaws::new(),
            vertical_laws: VerticalLaws::new(),
            autothrust: Autothrust::new(),
            last_lateral: LateralLawOutput::default(),
            last_vertical: VerticalLawOutput::default(),
            last_athr: AutothrustOutput::default(),
        }
    }

    fn engine_sensors(bus: &dyn VariableBus, engine: u8) -> EngineSensors {
        EngineSensors {
            starter_on: bus.get_bool(SimVar::EngineStarter(engine)),
            igniter: IgniterMode::from_code(bus.get(SimVar::EngineIgniter(engine))),
            sim_n1_percent: bus.get(SimVar::EngineN1(engine)),
            sim_n2_percent: bus.get(SimVar::EngineN2(engine)),
            corrected_n1_percent: bus.get(SimVar::EngineCorrectedN1(engine)),
            thrust_lbs: bus.get(SimVar::EngineThrustLbs(engine)),
        }
    }

    /// One simulation tick. Always runs to completion; degenerate inputs
    /// saturate inside the individual laws.
    pub fn update(&mut self, bus: &mut dyn VariableBus, delta_time_s: f64, simulation_time_s: f64) {
        // ---- input snapshot --------------------------------------------
        let on_ground = bus.get_bool(SimVar::SimOnGround);
        let mach = bus.get(SimVar::Mach);
        let altitude_ft = bus.get(SimVar::PressureAltitudeFt);
        let ambient_temp = bus.get(SimVar::AmbientTemperatureDegC);

        let engine_input = EngineTickInput {
            delta_time_s,
            simulation_time_s,
            animation_delta_time_s: bus.get(SimVar::AnimationDeltaTime),
            mach,
            press_altitude_ft: altitude_ft,
            ambient_temp_deg_c: ambient_temp,
            ambient_pressure_mbar: bus.get(SimVar::AmbientPressureMbar),
            on_ground,
            packs: bus.get_bool(SimVar::PacksState(1)) || bus.get_bool(SimVar::PacksState(2)),
            engine_anti_ice: bus.get_bool(SimVar::EngineAntiIce(1))
                || bus.get_bool(SimVar::EngineAntiIce(2)),
            wing_anti_ice: bus.get_bool(SimVar::WingAntiIce),
            flex_temperature_deg_c: bus.get(SimVar::FlexTemperatureDegC),
            thrust_limit_type: ThrustLimitType::from_code(bus.get(SimVar::ThrustLimitType)),
            engines: [
                Self::engine_sensors(bus, 1),
                Self::engine_sensors(bus, 2),
            ],
            fuel: FuelSensors {
                refuel_started_by_user: bus.get_bool(SimVar::RefuelStartedByUser),
                refuel_rate: bus.get(SimVar::RefuelRate),
                fuel_weight_per_gallon_lbs: bus.get(SimVar::FuelWeightPerGallonLbs),
                tank_center_gal: bus.get(SimVar::TankCenterQuantityGal),
                tank_left_gal: bus.get(SimVar::TankLeftQuantityGal),
                tank_right_gal: bus.get(SimVar::TankRightQuantityGal),
                tank_left_aux_gal: bus.get(SimVar::TankLeftAuxQuantityGal),
                tank_right_aux_gal: bus.get(SimVar::TankRightAuxQuantityGal),
                tank_left_capacity_gal: bus.get(SimVar::TankLeftCapacityGal),
                tank_right_capacity_gal: bus.get(SimVar::TankRightCapacityGal),
            },
        };

        // ---- engine model ----------------------------------------------
        let engine_out = self.engine_control.update(&engine_input);

        // ---- autopilot -------------------------------------------------
        let lateral_mode = LateralMode::from_code(bus.get(SimVar::LateralModeCode))
            .unwrap_or(LateralMode::Off);
        let vertical_mode = VerticalMode::from_code(bus.get(SimVar::VerticalModeCode))
            .unwrap_or(VerticalMode::Off);

        let engagement = self.engagement.update(&EngagementInput {
            simulation_time_s,
            ap1_push: bus.get_bool(SimVar::ApMasterPush(1)),
            ap2_push: bus.get_bool(SimVar::ApMasterPush(2)),
            instinctive_disconnect: bus.get_bool(SimVar::ApInstinctiveDisconnect),
            sidestick_priority_taken: false,
            on_ground,
            radio_height_ft: bus.get(SimVar::RadioHeightFt),
            lateral_mode,
            vertical_mode,
            fd_active: true,
        });

        let lateral = self.lateral_laws.update(&LateralInput {
            dt_s: delta_time_s,
            mode: lateral_mode,
            heading_deg: bus.get(SimVar::HeadingMagneticDeg),
            track_deg: bus.get(SimVar::TrackMagneticDeg),
            selected_heading_deg: bus.get(SimVar::FcuSelectedHeadingDeg),
            cross_track_error_nm: 0.0,
            track_angle_error_deg: 0.0,
            loc_error_deg: bus.get(SimVar::NavLocErrorDeg),
            loc_valid: bus.get_bool(SimVar::NavLocValid),
            on_ground,
        });

        let vertical = self.vertical_laws.update(&VerticalInput {
            dt_s: delta_time_s,
            mode: vertical_mode,
            altitude_ft: bus.get(SimVar::IndicatedAltitudeFt),
            selected_altitude_ft: bus.get(SimVar::FcuSelectedAltitudeFt),
            vs_fpm: bus.get(SimVar::VerticalSpeedFpm),
            selected_vs_fpm: bus.get(SimVar::FcuSelectedVsFpm),
            selected_fpa_deg: bus.get(SimVar::FcuSelectedFpaDeg),
            ias_kn: bus.get(SimVar::AirspeedIndicatedKn),
            tas_kn: bus.get(SimVar::AirspeedTrueKn),
            selected_speed_kn: bus.get(SimVar::FcuSelectedSpeedKn),
            vls_kn: bus.get(SimVar::VlsKn),
            vmax_kn: bus.get(SimVar::VmaxKn),
            gs_error_deg: bus.get(SimVar::NavGsErrorDeg),
            gs_valid: bus.get_bool(SimVar::NavGsValid),
            radio_height_ft: bus.get(SimVar::RadioHeightFt),
            on_ground,
        });

        // ---- autothrust ------------------------------------------------
        let athr = self.autothrust.update(&AutothrustInput {
            dt_s: delta_time_s,
            simulation_time_s,
            athr_push: bus.get_bool(SimVar::AthrPush),
            athr_disconnect: bus.get_bool(SimVar::AthrDisconnect),
            tla_1_deg: bus.get(SimVar::ThrottleLeverAngle(1)),
            tla_2_deg: bus.get(SimVar::ThrottleLeverAngle(2)),
            strut_compression_1: if on_ground { 0.5 } else { 0.0 },
            strut_compression_2: if on_ground { 0.5 } else { 0.0 },
            flex_temperature_deg_c: bus.get(SimVar::FlexTemperatureDegC),
            tat_deg_c: bus.get(SimVar::TotalAirTemperatureDegC),
            flight_phase: bus.get(SimVar::FlightPhase),
            limits: af_guidance::autothrust::ThrustLimitsPercent {
                idle: engine_out.thrust_limits.idle,
                clb: engine_out.thrust_limits.clb,
                flex: engine_out.thrust_limits.flex,
                mct: engine_out.thrust_limits.mct,
                toga: engine_out.thrust_limits.toga,
                reverse: bus.get(SimVar::ThrustLimitRev),
            },
            ias_kn: bus.get(SimVar::AirspeedIndicatedKn),
            selected_speed_kn: bus.get(SimVar::FcuSelectedSpeedKn),
            ap_engaged: engagement.ap1_engaged || engagement.ap2_engaged,
            engine_1_operative: engine_out.engines[0].n2_percent > 50.0,
            engine_2_operative: engine_out.engines[1].n2_percent > 50.0,
        });

        // ---- output snapshot -------------------------------------------
        for (index, snapshot) in engine_out.engines.iter().enumerate() {
            let engine = (index + 1) as u8;
            bus.set(SimVar::EngineState(engine), snapshot.state.to_code());
            bus.set(SimVar::EngineTimer(engine), snapshot.timer_s);
            bus.set(SimVar::EngineSimN1(engine), snapshot.n1_percent);
            bus.set(SimVar::EngineSimN2(engine), snapshot.n2_percent);
            bus.set(SimVar::EngineEgtDegC(engine), snapshot.egt_deg_c);
            bus.set(SimVar::EngineFuelFlowKgh(engine), snapshot.fuel_flow_kgh);
            bus.set(
                SimVar::EngineOilTemperatureDegC(engine),
                snapshot.oil_temperature_deg_c,
            );
            bus.set(SimVar::EngineOilQuantityQt(engine), snapshot.oil_quantity_qt);
            bus.set(SimVar::EngineOilTotalQt(engine), snapshot.oil_total_qt);
            bus.set(SimVar::EngineOilPressurePsi(engine), snapshot.oil_pressure_psi);
            bus.set(SimVar::EngineFuelUsedKg(engine), snapshot.fuel_used_kg);
        }
        bus.set(SimVar::EngineIdleN1, engine_out.idle.n1_percent);
        bus.set(SimVar::EngineIdleN2, engine_out.idle.n2_percent);
        bus.set(SimVar::EngineIdleFF, engine_out.idle.fuel_flow_kgh);
        bus.set(SimVar::EngineIdleEGT, engine_out.idle.egt_deg_c);
        bus.set(SimVar::EngineImbalance, engine_out.imbalance_code);

        bus.set(SimVar::TankCenterQuantityGal, engine_out.fuel.tank_center_gal);
        bus.set(SimVar::TankLeftQuantityGal, engine_out.fuel.tank_left_gal);
        bus.set(SimVar::TankRightQuantityGal, engine_out.fuel.tank_right_gal);
        bus.set(
            SimVar::PumpStateLeft,
            engine_out.fuel.pump_state_left.code(),
        );
        bus.set(
            SimVar::PumpStateRight,
            engine_out.fuel.pump_state_right.code(),
        );

        bus.set(SimVar::ThrustLimitIdle, engine_out.thrust_limits.idle);
        bus.set(SimVar::ThrustLimitToga, engine_out.thrust_limits.toga);
        bus.set(SimVar::ThrustLimitFlex, engine_out.thrust_limits.flex);
        bus.set(SimVar::ThrustLimitClimb, engine_out.thrust_limits.clb);
        bus.set(SimVar::ThrustLimitMct, engine_out.thrust_limits.mct);
        bus.set(SimVar::ThrustLimitType, athr.thrust_limit_type_code);

        bus.set_bool(SimVar::ApEngaged(1), engagement.ap1_engaged);
        bus.set_bool(SimVar::ApEngaged(2), engagement.ap2_engaged);
        bus.set(SimVar::RollCommandDeg, lateral.phi_limited_deg);
        bus.set(SimVar::PitchCommandDeg, vertical.theta_command_deg);
        bus.set(SimVar::AthrStatusCode, athr.status.code());
        bus.set(SimVar::AthrModeCode, athr.mode.code());
        bus.set(SimVar::CommandedN1(1), athr.n1_commanded_1_percent);
        bus.set(SimVar::CommandedN1(2), athr.n1_commanded_2_percent);

        self.last_lateral = lateral;
        self.last_vertical = vertical;
        self.last_athr = athr;
    }

    /// Assemble the recorder frame for the tick just computed.
    pub fn recorder_frame(
        &self,
        bus: &dyn VariableBus,
        simulation_time_s: f64,
    ) -> RecorderFrame {
        let engine1 = self.engine_control.engine(1);
        let engine2 = self.engine_control.engine(2);
        RecorderFrame {
            ap_sm: ApStateMachineBlock {
                simulation_time_s,
                ap1_engaged: bus.get(SimVar::ApEngaged(1)),
                ap2_engaged: bus.get(SimVar::ApEngaged(2)),
                lateral_mode: bus.get(SimVar::LateralModeCode),
                vertical_mode: bus.get(SimVar::VerticalModeCode),
                selected_heading_deg: bus.get(SimVar::FcuSelectedHeadingDeg),
                selected_altitude_ft: bus.get(SimVar::FcuSelectedAltitudeFt),
                selected_vs_fpm: bus.get(SimVar::FcuSelectedVsFpm),
            },
            ap_laws: ApLawsBlock {
                phi_target_deg: self.last_lateral.phi_target_deg,
                phi_command_deg: self.last_lateral.phi_limited_deg,
                theta_command_deg: self.last_vertical.theta_command_deg,
                fpa_target_deg: self.last_vertical.fpa_target_deg,
                vs_target_fpm: self.last_vertical.vs_target_fpm,
            },
            athr: AthrBlock {
                status: self.last_athr.status.code(),
                mode: self.last_athr.mode.code(),
                n1_commanded_1_percent: self.last_athr.n1_commanded_1_percent,
                n1_commanded_2_percent: self.last_athr.n1_commanded_2_percent,
                thrust_limit_type: self.last_athr.thrust_limit_type_code,
                is_flex_active: if self.last_athr.is_flex_active { 1.0 } else { 0.0 },
            },
            engine: EngineBlock {
                engine_1_state: engine1.state.to_code(),
                engine_2_state: engine2.state.to_code(),
                engine_1_n1_percent: engine1.n1_percent,
                engine_2_n1_percent: engine2.n1_percent,
                engine_1_n2_percent: engine1.n2_percent,
                engine_2_n2_percent: engine2.n2_percent,
                engine_1_egt_deg_c: engine1.egt_deg_c,
                engine_2_egt_deg_c: engine2.egt_deg_c,
                engine_1_ff_kgh: engine1.fuel_flow_kgh,
                engine_2_ff_kgh: engine2.fuel_flow_kgh,
                engine_1_oil_temp_deg_c: engine1.oil_temperature_deg_c,
                engine_2_oil_temp_deg_c: engine2.oil_temperature_deg_c,
                fuel_left_gal: bus.get(SimVar::TankLeftQuantityGal),
                fuel_right_gal: bus.get(SimVar::TankRightQuantityGal),
                fuel_center_gal: bus.get(SimVar::TankCenterQuantityGal),
            },
            additional: AdditionalBlock {
                mach: bus.get(SimVar::Mach),
                ias_kn: bus.get(SimVar::AirspeedIndicatedKn),
                altitude_ft: bus.get(SimVar::IndicatedAltitudeFt),
                vs_fpm: bus.get(SimVar::VerticalSpeedFpm),
                heading_deg: bus.get(SimVar::HeadingMagneticDeg),
                on_ground: bus.get(SimVar::SimOnGround),
                thrust_limit_toga: bus.get(SimVar::ThrustLimitToga),
                thrust_limit_clb: bus.get(SimVar::ThrustLimitClimb),
                thrust_limit_flex: bus.get(SimVar::ThrustLimitFlex),
                thrust_limit_mct: bus.get(SimVar::ThrustLimitMct),
            },
        }
    }
}
