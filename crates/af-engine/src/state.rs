//! Engine state representation and wire encoding.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Base engine phase. The wire codes (0–4) are the host's persisted values
/// and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    Off,
    On,
    Starting,
    Restarting,
    Shutting,
}

impl EnginePhase {
    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
            Self::Starting => 2,
            Self::Restarting => 3,
            Self::Shutting => 4,
        }
    }

    fn from_base_code(code: u8) -> EngineResult<Self> {
        Ok(match code {
            0 => Self::Off,
            1 => Self::On,
            2 => Self::Starting,
            3 => Self::Restarting,
            4 => Self::Shutting,
            _ => {
                return Err(EngineError::BadStateCode {
                    code: f64::from(code),
                })
            }
        })
    }
}

/// Engine phase plus the paused marker.
///
/// On the wire a paused state is the base code plus 10; the paused variant is
/// entered when the host reports a zero animation-delta and left once time
/// advances again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub phase: EnginePhase,
    pub paused: bool,
}

impl EngineState {
    pub fn new(phase: EnginePhase) -> Self {
        Self {
            phase,
            paused: false,
        }
    }

    pub fn paused(phase: EnginePhase) -> Self {
        Self {
            phase,
            paused: true,
        }
    }

    pub fn to_code(self) -> f64 {
        f64::from(self.phase.code()) + if self.paused { 10.0 } else { 0.0 }
    }

    pub fn from_code(code: f64) -> EngineResult<Self> {
        if !code.is_finite() || code < 0.0 || code.fract() != 0.0 {
            return Err(EngineError::BadStateCode { code });
        }
        let raw = code as u8;
        let (base, paused) = if raw >= 10 { (raw - 10, true) } else { (raw, false) };
        Ok(Self {
            phase: EnginePhase::from_base_code(base)?,
            paused,
        })
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(EnginePhase::Off)
    }
}

/// Per-engine semantic record, updated in place each tick.
///
/// `timer_s` is meaningful only within the current state: it accumulates
/// delta time while starting/shutting and is reset to zero exactly on a
/// genuine (non-paused) state transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub timer_s: f64,
    pub n1_percent: f64,
    pub n2_percent: f64,
    pub egt_deg_c: f64,
    pub fuel_flow_kgh: f64,
    pub oil_temperature_deg_c: f64,
    pub oil_quantity_qt: f64,
    pub oil_total_qt: f64,
    pub oil_pressure_psi: f64,
    pub fuel_used_kg: f64,
}

impl EngineSnapshot {
    /// Cold engine at ambient conditions.
    pub fn cold(ambient_temp_deg_c: f64) -> Self {
        Self {
            state: EngineState::default(),
            timer_s: 0.0,
            n1_percent: 0.0,
            n2_percent: 0.0,
            egt_deg_c: ambient_temp_deg_c,
            fuel_flow_kgh: 0.0,
            oil_temperature_deg_c: ambient_temp_deg_c,
            oil_quantity_qt: 0.0,
            oil_total_qt: 0.0,
            oil_pressure_psi: 0.0,
            fuel_used_kg: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_roundtrip() {
        for phase in [
            EnginePhase::Off,
            EnginePhase::On,
            EnginePhase::Starting,
            EnginePhase::Restarting,
            EnginePhase::Shutting,
        ] {
            for paused in [false, true] {
                let s = EngineState { phase, paused };
                assert_eq!(EngineState::from_code(s.to_code()).unwrap(), s);
            }
        }
    }

    #[test]
    fn paused_codes_are_base_plus_ten() {
        assert_eq!(EngineState::paused(EnginePhase::Starting).to_code(), 12.0);
        assert_eq!(EngineState::new(EnginePhase::Shutting).to_code(), 4.0);
    }

    #[test]
    fn bad_codes_rejected() {
        assert!(EngineState::from_code(5.0).is_err());
        assert!(EngineState::from_code(15.0).is_err());
        assert!(EngineState::from_code(-1.0).is_err());
        assert!(EngineState::from_code(2.5).is_err());
        assert!(EngineState::from_code(f64::NAN).is_err());
    }
}
