//! Auto-flight guidance: autopilot mode and engagement state machines, the
//! per-axis guidance laws and the autothrust.
//!
//! Law selection is a closed enum dispatch per axis: the set of laws is
//! fixed, every arm is independently testable, and the active mode is just
//! data (its numeric wire code goes straight onto the bus). Each law
//! instance owns its filter and limiter state; the per-tick outputs are
//! transient records rebuilt every call.

pub mod autothrust;
pub mod engagement;
pub mod error;
pub mod lateral;
pub mod modes;
pub mod vertical;

pub use autothrust::{Autothrust, AutothrustInput, AutothrustOutput};
pub use engagement::{ApEngagement, EngagementInput, EngagementOutput};
pub use error::{GuidanceError, GuidanceResult};
pub use lateral::{LateralInput, LateralLawOutput, LateralLaws};
pub use modes::{AthrMode, AthrStatus, LateralMode, VerticalMode};
pub use vertical::{VerticalInput, VerticalLawOutput, VerticalLaws};
