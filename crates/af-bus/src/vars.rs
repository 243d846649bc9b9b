//! Variable keys for the host bus.
//!
//! One enum variant per simulation variable the model consumes or produces.
//! Grouped the way the host groups them: sensor/environment inputs, per-engine
//! readings, fuel tanks, thrust limits, autoflight panel state, and model
//! outputs published back to the host.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimVar {
    // Environment / airframe sensors
    AmbientTemperatureDegC,
    AmbientPressureMbar,
    PressureAltitudeFt,
    IndicatedAltitudeFt,
    RadioHeightFt,
    Mach,
    AirspeedIndicatedKn,
    AirspeedTrueKn,
    GroundSpeedKn,
    VerticalSpeedFpm,
    HeadingMagneticDeg,
    TrackMagneticDeg,
    PitchDeg,
    RollDeg,
    TotalAirTemperatureDegC,
    SimOnGround,
    AnimationDeltaTime,

    // Per-engine host readings (index 1/2)
    EngineStarter(u8),
    EngineIgniter(u8),
    EngineN1(u8),
    EngineN2(u8),
    EngineCorrectedN1(u8),
    EngineCorrectedN2(u8),
    EngineThrustLbs(u8),
    EngineCombustion(u8),

    // Per-engine model outputs
    EngineState(u8),
    EngineTimer(u8),
    EngineSimN1(u8),
    EngineSimN2(u8),
    EngineEgtDegC(u8),
    EngineFuelFlowKgh(u8),
    EnginePreFuelFlowKgh(u8),
    EngineOilQuantityQt(u8),
    EngineOilTotalQt(u8),
    EngineOilTemperatureDegC(u8),
    EngineOilPressurePsi(u8),
    EngineFuelUsedKg(u8),
    EngineIdleN1,
    EngineIdleN2,
    EngineIdleFF,
    EngineIdleEGT,
    EngineImbalance,

    // Fuel system
    FuelWeightPerGallonLbs,
    TankCenterQuantityGal,
    TankLeftQuantityGal,
    TankRightQuantityGal,
    TankLeftAuxQuantityGal,
    TankRightAuxQuantityGal,
    TankLeftCapacityGal,
    TankRightCapacityGal,
    FuelCenterPreLbs,
    FuelLeftPreLbs,
    FuelRightPreLbs,
    FuelAuxLeftPreLbs,
    FuelAuxRightPreLbs,
    PumpStateLeft,
    PumpStateRight,
    RefuelRate,
    RefuelStartedByUser,

    // Bleed state
    PacksState(u8),
    EngineAntiIce(u8),
    WingAntiIce,

    // Thrust limits (model outputs; the reverse limit is host-published)
    ThrustLimitType,
    ThrustLimitRev,
    ThrustLimitIdle,
    ThrustLimitToga,
    ThrustLimitFlex,
    ThrustLimitClimb,
    ThrustLimitMct,
    FlexTemperatureDegC,

    // Autoflight panel and FCU state
    ApMasterPush(u8),
    ApInstinctiveDisconnect,
    AthrPush,
    AthrDisconnect,
    FcuSelectedHeadingDeg,
    FcuSelectedAltitudeFt,
    FcuSelectedVsFpm,
    FcuSelectedFpaDeg,
    FcuSelectedSpeedKn,
    FlightPhase,
    ThrottleLeverAngle(u8),

    // Autoflight model outputs
    ApEngaged(u8),
    LateralModeCode,
    VerticalModeCode,
    AthrStatusCode,
    AthrModeCode,
    CommandedN1(u8),
    RollCommandDeg,
    PitchCommandDeg,

    // Navigation receivers
    NavLocErrorDeg,
    NavGsErrorDeg,
    NavDmeNm,
    NavLocValid,
    NavGsValid,

    // Protections / references
    VlsKn,
    VmaxKn,
}
