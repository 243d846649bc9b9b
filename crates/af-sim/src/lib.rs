//! Per-tick orchestration of the whole model, and the offline scenario
//! runner.
//!
//! The host calls [`AircraftModel::update`] once per frame with the tick's
//! delta time and simulation time; the model reads its input snapshot from
//! the variable bus, advances the engine, fuel, thrust-limit, autopilot and
//! autothrust models in a fixed order, and writes the output snapshot back.
//! There is no internal concurrency and no blocking I/O inside the tick
//! (fuel checkpoints are best-effort writes on a ≥1 s cadence).

pub mod error;
pub mod model;
pub mod scenario;

pub use error::{SimError, SimResult};
pub use model::{AircraftModel, ModelOptions};
pub use scenario::{run_scenario, Scenario, ScenarioEvent, ScenarioOptions, ScenarioRecord};
