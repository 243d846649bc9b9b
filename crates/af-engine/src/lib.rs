//! Engine thermodynamic model (FADEC), fuel system and thrust limits.
//!
//! The model is a per-tick discrete simulation of two engines: a state
//! machine (off / on / starting / restarting / shutting, each with a paused
//! variant) drives spool-up and spool-down procedures, and the steady-state
//! branch computes N1/N2/EGT/fuel-flow/oil from host sensor data through
//! calibration fits. A fuel-tank transfer and consumption model and the
//! TOGA/FLEX/CLB/MCT/IDLE thrust-limit stack complete the engine side.
//!
//! Everything here is owned by one [`control::EngineControl`] instance
//! constructed at session start; there are no globals and no internal
//! threads. The host calls `update(..)` once per frame.

pub mod config;
pub mod control;
pub mod corrections;
pub mod error;
pub mod fuel;
pub mod imbalance;
pub mod machine;
pub mod oil;
pub mod polynomials;
pub mod state;
pub mod tables;
pub mod thrust_limits;

pub use config::FuelConfiguration;
pub use control::{
    EngineControl, EngineSensors, EngineTickInput, EngineTickOutput, FuelSensors, SessionInit,
};
pub use error::{EngineError, EngineResult};
pub use fuel::{FuelSystem, PumpState};
pub use imbalance::{ImbalanceCode, ImbalanceSet};
pub use machine::IgniterMode;
pub use state::{EnginePhase, EngineSnapshot, EngineState};
pub use tables::IdleParameters;
pub use thrust_limits::{ThrustLimitSet, ThrustLimitType, ThrustLimits};
