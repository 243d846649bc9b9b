//! Frame layout and explicit little-endian codec.

use crate::error::{RecorderError, RecorderResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Bump on EVERY change to the frame layout.
pub const INTERFACE_VERSION: u64 = 24;

/// Autopilot state-machine outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ApStateMachineBlock {
    pub simulation_time_s: f64,
    pub ap1_engaged: f64,
    pub ap2_engaged: f64,
    pub lateral_mode: f64,
    pub vertical_mode: f64,
    pub selected_heading_deg: f64,
    pub selected_altitude_ft: f64,
    pub selected_vs_fpm: f64,
}

/// Autopilot law outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ApLawsBlock {
    pub phi_target_deg: f64,
    pub phi_command_deg: f64,
    pub theta_command_deg: f64,
    pub fpa_target_deg: f64,
    pub vs_target_fpm: f64,
}

/// Autothrust outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AthrBlock {
    pub status: f64,
    pub mode: f64,
    pub n1_commanded_1_percent: f64,
    pub n1_commanded_2_percent: f64,
    pub thrust_limit_type: f64,
    pub is_flex_active: f64,
}

/// Engine model outputs (both engines).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineBlock {
    pub engine_1_state: f64,
    pub engine_2_state: f64,
    pub engine_1_n1_percent: f64,
    pub engine_2_n1_percent: f64,
    pub engine_1_n2_percent: f64,
    pub engine_2_n2_percent: f64,
    pub engine_1_egt_deg_c: f64,
    pub engine_2_egt_deg_c: f64,
    pub engine_1_ff_kgh: f64,
    pub engine_2_ff_kgh: f64,
    pub engine_1_oil_temp_deg_c: f64,
    pub engine_2_oil_temp_deg_c: f64,
    pub fuel_left_gal: f64,
    pub fuel_right_gal: f64,
    pub fuel_center_gal: f64,
}

/// Everything else worth keeping for replay analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdditionalBlock {
    pub mach: f64,
    pub ias_kn: f64,
    pub altitude_ft: f64,
    pub vs_fpm: f64,
    pub heading_deg: f64,
    pub on_ground: f64,
    pub thrust_limit_toga: f64,
    pub thrust_limit_clb: f64,
    pub thrust_limit_flex: f64,
    pub thrust_limit_mct: f64,
}

/// One recorded tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecorderFrame {
    pub ap_sm: ApStateMachineBlock,
    pub ap_laws: ApLawsBlock,
    pub athr: AthrBlock,
    pub engine: EngineBlock,
    pub additional: AdditionalBlock,
}

impl RecorderFrame {
    /// Number of f64 fields in one frame.
    pub const FIELD_COUNT: usize = 8 + 5 + 6 + 15 + 10;

    /// Serialized frame size in bytes.
    pub const SIZE_BYTES: usize = Self::FIELD_COUNT * 8;

    /// All fields in wire order, paired with their column names.
    pub fn fields(&self) -> [(&'static str, f64); Self::FIELD_COUNT] {
        [
            ("ap_sm.simulation_time_s", self.ap_sm.simulation_time_s),
            ("ap_sm.ap1_engaged", self.ap_sm.ap1_engaged),
            ("ap_sm.ap2_engaged", self.ap_sm.ap2_engaged),
            ("ap_sm.lateral_mode", self.ap_sm.lateral_mode),
            ("ap_sm.vertical_mode", self.ap_sm.vertical_mode),
            ("ap_sm.selected_heading_deg", self.ap_sm.selected_heading_deg),
            ("ap_sm.selected_altitude_ft", self.ap_sm.selected_altitude_ft),
            ("ap_sm.selected_vs_fpm", self.ap_sm.selected_vs_fpm),
            ("ap_laws.phi_target_deg", self.ap_laws.phi_target_deg),
            ("ap_laws.phi_command_deg", self.ap_laws.phi_command_deg),
            ("ap_laws.theta_command_deg", self.ap_laws.theta_command_deg),
            ("ap_laws.fpa_target_deg", self.ap_laws.fpa_target_deg),
            ("ap_laws.vs_target_fpm", self.ap_laws.vs_target_fpm),
            ("athr.status", self.athr.status),
            ("athr.mode", self.athr.mode),
            ("athr.n1_commanded_1_percent", self.athr.n1_commanded_1_percent),
            ("athr.n1_commanded_2_percent", self.athr.n1_commanded_2_percent),
            ("athr.thrust_limit_type", self.athr.thrust_limit_type),
            ("athr.is_flex_active", self.athr.is_flex_active),
            ("engine.engine_1_state", self.engine.engine_1_state),
            ("engine.engine_2_state", self.engine.engine_2_state),
            ("engine.engine_1_n1_percent", self.engine.engine_1_n1_percent),
            ("engine.engine_2_n1_percent", self.engine.engine_2_n1_percent),
            ("engine.engine_1_n2_percent", self.engine.engine_1_n2_percent),
            ("engine.engine_2_n2_percent", self.engine.engine_2_n2_percent),
            ("engine.engine_1_egt_deg_c", self.engine.engine_1_egt_deg_c),
            ("engine.engine_2_egt_deg_c", self.engine.engine_2_egt_deg_c),
            ("engine.engine_1_ff_kgh", self.engine.engine_1_ff_kgh),
            ("engine.engine_2_ff_kgh", self.engine.engine_2_ff_kgh),
            ("engine.engine_1_oil_temp_deg_c", self.engine.engine_1_oil_temp_deg_c),
            ("engine.engine_2_oil_temp_deg_c", self.engine.engine_2_oil_temp_deg_c),
            ("engine.fuel_left_gal", self.engine.fuel_left_gal),
            ("engine.fuel_right_gal", self.engine.fuel_right_gal),
            ("engine.fuel_center_gal", self.engine.fuel_center_gal),
            ("additional.mach", self.additional.mach),
            ("additional.ias_kn", self.additional.ias_kn),
            ("additional.altitude_ft", self.additional.altitude_ft),
            ("additional.vs_fpm", self.additional.vs_fpm),
            ("additional.heading_deg", self.additional.heading_deg),
            ("additional.on_ground", self.additional.on_ground),
            ("additional.thrust_limit_toga", self.additional.thrust_limit_toga),
            ("additional.thrust_limit_clb", self.additional.thrust_limit_clb),
            ("additional.thrust_limit_flex", self.additional.thrust_limit_flex),
            ("additional.thrust_limit_mct", self.additional.thrust_limit_mct),
        ]
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> RecorderResult<()> {
        for (_, value) in self.fields() {
            out.write_f64::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Read one frame. `Ok(None)` means clean end of stream (EOF exactly on
    /// a frame boundary); EOF mid-frame is a truncation error.
    pub fn read_from<R: Read>(input: &mut R) -> RecorderResult<Option<Self>> {
        let mut values = [0.0_f64; Self::FIELD_COUNT];
        for (index, slot) in values.iter_mut().enumerate() {
            match input.read_f64::<LittleEndian>() {
                Ok(v) => *slot = v,
                Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    if index == 0 {
                        return Ok(None);
                    }
                    return Err(RecorderError::TruncatedFrame {
                        what: "end of stream inside a frame",
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        let mut frame = Self::default();
        let mut iter = values.iter().copied();
        let mut next = || iter.next().unwrap_or(0.0);

        frame.ap_sm.simulation_time_s = next();
        frame.ap_sm.ap1_engaged = next();
        frame.ap_sm.ap2_engaged = next();
        frame.ap_sm.lateral_mode = next();
        frame.ap_sm.vertical_mode = next();
        frame.ap_sm.selected_heading_deg = next();
        frame.ap_sm.selected_altitude_ft = next();
        frame.ap_sm.selected_vs_fpm = next();
        frame.ap_laws.phi_target_deg = next();
        frame.ap_laws.phi_command_deg = next();
        frame.ap_laws.theta_command_deg = next();
        frame.ap_laws.fpa_target_deg = next();
        frame.ap_laws.vs_target_fpm = next();
        frame.athr.status = next();
        frame.athr.mode = next();
        frame.athr.n1_commanded_1_percent = next();
        frame.athr.n1_commanded_2_percent = next();
        frame.athr.thrust_limit_type = next();
        frame.athr.is_flex_active = next();
        frame.engine.engine_1_state = next();
        frame.engine.engine_2_state = next();
        frame.engine.engine_1_n1_percent = next();
        frame.engine.engine_2_n1_percent = next();
        frame.engine.engine_1_n2_percent = next();
        frame.engine.engine_2_n2_percent = next();
        frame.engine.engine_1_egt_deg_c = next();
        frame.engine.engine_2_egt_deg_c = next();
        frame.engine.engine_1_ff_kgh = next();
        frame.engine.engine_2_ff_kgh = next();
        frame.engine.engine_1_oil_temp_deg_c = next();
        frame.engine.engine_2_oil_temp_deg_c = next();
        frame.engine.fuel_left_gal = next();
        frame.engine.fuel_right_gal = next();
        frame.engine.fuel_center_gal = next();
        frame.additional.mach = next();
        frame.additional.ias_kn = next();
        frame.additional.altitude_ft = next();
        frame.additional.vs_fpm = next();
        frame.additional.heading_deg = next();
        frame.additional.on_ground = next();
        frame.additional.thrust_limit_toga = next();
        frame.additional.thrust_limit_clb = next();
        frame.additional.thrust_limit_flex = next();
        frame.additional.thrust_limit_mct = next();

        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecorderFrame {
        let mut frame = RecorderFrame::default();
        frame.ap_sm.simulation_time_s = 123.5;
        frame.ap_laws.phi_target_deg = -12.25;
        frame.athr.mode = 10.0;
        frame.engine.engine_1_n2_percent = 66.6;
        frame.additional.mach = 0.78;
        frame
    }

    #[test]
    fn size_matches_field_count() {
        let mut buffer = Vec::new();
        sample().write_to(&mut buffer).unwrap();
        assert_eq!(buffer.len(), RecorderFrame::SIZE_BYTES);
    }

    #[test]
    fn roundtrip() {
        let frame = sample();
        let mut buffer = Vec::new();
        frame.write_to(&mut buffer).unwrap();
        let read = RecorderFrame::read_from(&mut buffer.as_slice())
            .unwrap()
            .unwrap();
        assert_eq!(read, frame);
    }

    #[test]
    fn clean_eof_returns_none() {
        let mut empty: &[u8] = &[];
        assert!(RecorderFrame::read_from(&mut empty).unwrap().is_none());
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let mut buffer = Vec::new();
        sample().write_to(&mut buffer).unwrap();
        buffer.truncate(40);
        let err = RecorderFrame::read_from(&mut buffer.as_slice()).unwrap_err();
        assert!(matches!(err, RecorderError::TruncatedFrame { .. }));
    }

    #[test]
    fn field_names_are_unique() {
        let fields = sample().fields();
        for (i, (name_a, _)) in fields.iter().enumerate() {
            for (name_b, _) in fields.iter().skip(i + 1) {
                assert_ne!(name_a, name_b);
            }
        }
    }
}
