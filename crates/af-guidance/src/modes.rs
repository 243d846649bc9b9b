//! Mode enumerations and their bus wire codes.

use serde::{Deserialize, Serialize};

/// Active lateral guidance mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LateralMode {
    #[default]
    Off,
    Runway,
    RunwayTrack,
    HeadingHold,
    TrackHold,
    Nav,
    LocCapture,
    LocTrack,
    Land,
    Flare,
    RollOut,
    GaTrack,
}

impl LateralMode {
    pub fn code(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Runway => 1.0,
            Self::RunwayTrack => 2.0,
            Self::HeadingHold => 10.0,
            Self::TrackHold => 11.0,
            Self::Nav => 20.0,
            Self::LocCapture => 30.0,
            Self::LocTrack => 31.0,
            Self::Land => 32.0,
            Self::Flare => 33.0,
            Self::RollOut => 34.0,
            Self::GaTrack => 40.0,
        }
    }

    pub fn from_code(code: f64) -> Option<Self> {
        Some(match code as i64 {
            0 => Self::Off,
            1 => Self::Runway,
            2 => Self::RunwayTrack,
            10 => Self::HeadingHold,
            11 => Self::TrackHold,
            20 => Self::Nav,
            30 => Self::LocCapture,
            31 => Self::LocTrack,
            32 => Self::Land,
            33 => Self::Flare,
            34 => Self::RollOut,
            40 => Self::GaTrack,
            _ => return None,
        })
    }
}

/// Active vertical guidance mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalMode {
    #[default]
    Off,
    Srs,
    Climb,
    Descent,
    OpenClimb,
    OpenDescent,
    AltCapture,
    AltHold,
    VerticalSpeed,
    FlightPathAngle,
    GsCapture,
    GsTrack,
    Flare,
    RollOut,
    SrsGa,
}

impl VerticalMode {
    pub fn code(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::AltHold => 10.0,
            Self::AltCapture => 11.0,
            Self::OpenClimb => 12.0,
            Self::OpenDescent => 13.0,
            Self::VerticalSpeed => 14.0,
            Self::FlightPathAngle => 15.0,
            Self::Climb => 21.0,
            Self::Descent => 23.0,
            Self::GsCapture => 30.0,
            Self::GsTrack => 31.0,
            Self::Flare => 33.0,
            Self::RollOut => 34.0,
            Self::Srs => 40.0,
            Self::SrsGa => 41.0,
        }
    }

    pub fn from_code(code: f64) -> Option<Self> {
        Some(match code as i64 {
            0 => Self::Off,
            10 => Self::AltHold,
            11 => Self::AltCapture,
            12 => Self::OpenClimb,
            13 => Self::OpenDescent,
            14 => Self::VerticalSpeed,
            15 => Self::FlightPathAngle,
            21 => Self::Climb,
            23 => Self::Descent,
            30 => Self::GsCapture,
            31 => Self::GsTrack,
            33 => Self::Flare,
            34 => Self::RollOut,
            40 => Self::Srs,
            41 => Self::SrsGa,
            _ => return None,
        })
    }
}

/// Autothrust engagement status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AthrStatus {
    #[default]
    Disengaged,
    Armed,
    Active,
}

impl AthrStatus {
    pub fn code(self) -> f64 {
        match self {
            Self::Disengaged => 0.0,
            Self::Armed => 1.0,
            Self::Active => 2.0,
        }
    }
}

/// Autothrust control mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AthrMode {
    #[default]
    None,
    ManualToga,
    ManualFlex,
    ManualMct,
    Speed,
    Mach,
    ThrustClimb,
    ThrustIdle,
}

impl AthrMode {
    pub fn code(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::ManualToga => 1.0,
            Self::ManualFlex => 2.0,
            Self::ManualMct => 3.0,
            Self::Speed => 10.0,
            Self::Mach => 11.0,
            Self::ThrustClimb => 12.0,
            Self::ThrustIdle => 13.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lateral_codes_roundtrip() {
        for mode in [
            LateralMode::Off,
            LateralMode::Runway,
            LateralMode::RunwayTrack,
            LateralMode::HeadingHold,
            LateralMode::TrackHold,
            LateralMode::Nav,
            LateralMode::LocCapture,
            LateralMode::LocTrack,
            LateralMode::Land,
            LateralMode::Flare,
            LateralMode::RollOut,
            LateralMode::GaTrack,
        ] {
            assert_eq!(LateralMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(LateralMode::from_code(99.0), None);
    }

    #[test]
    fn vertical_codes_roundtrip() {
        for mode in [
            VerticalMode::Off,
            VerticalMode::Srs,
            VerticalMode::Climb,
            VerticalMode::Descent,
            VerticalMode::OpenClimb,
            VerticalMode::OpenDescent,
            VerticalMode::AltCapture,
            VerticalMode::AltHold,
            VerticalMode::VerticalSpeed,
            VerticalMode::FlightPathAngle,
            VerticalMode::GsCapture,
            VerticalMode::GsTrack,
            VerticalMode::Flare,
            VerticalMode::RollOut,
            VerticalMode::SrsGa,
        ] {
            assert_eq!(VerticalMode::from_code(mode.code()), Some(mode));
        }
    }
}
