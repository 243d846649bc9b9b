//! Autopilot engagement/disengagement arbitration.
//!
//! Two autopilots share one aircraft: normally at most one is engaged, with
//! both allowed only during an autoland (glideslope track and below). This
//! machine arbitrates the push-buttons against the inhibit and disconnect
//! conditions and latches the disconnect warning until acknowledged.

use crate::modes::{LateralMode, VerticalMode};
use af_signals::TimeSinceCondition;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// No engagement below this radio height on approach.
const ENGAGE_INHIBIT_RADIO_HEIGHT_FT: f64 = 100.0;
/// No engagement within this window after liftoff.
const ENGAGE_INHIBIT_AFTER_LIFTOFF_S: f64 = 5.0;

#[derive(Clone, Copy, Debug)]
pub struct EngagementInput {
    pub simulation_time_s: f64,
    pub ap1_push: bool,
    pub ap2_push: bool,
    pub instinctive_disconnect: bool,
    pub sidestick_priority_taken: bool,
    pub on_ground: bool,
    pub radio_height_ft: f64,
    pub lateral_mode: LateralMode,
    pub vertical_mode: VerticalMode,
    /// Both flight directors lost means nothing to follow.
    pub fd_active: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngagementOutput {
    pub ap1_engaged: bool,
    pub ap2_engaged: bool,
    pub disconnect_warning: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApEngagement {
    ap1: bool,
    ap2: bool,
    warning: bool,
    prev_ap1_push: bool,
    prev_ap2_push: bool,
    airborne_since: TimeSinceCondition,
}

impl ApEngagement {
    pub fn new() -> Self {
        Self::default()
    }

    fn autoland_active(lateral: LateralMode, vertical: VerticalMode) -> bool {
        matches!(
            lateral,
            LateralMode::LocTrack | LateralMode::Land | LateralMode::Flare | LateralMode::RollOut
        ) && matches!(
            vertical,
            VerticalMode::GsTrack | VerticalMode::Flare | VerticalMode::RollOut
        )
    }

    pub fn update(&mut self, input: &EngagementInput) -> EngagementOutput {
        let airborne_s = self
            .airborne_since
            .step(input.simulation_time_s, !input.on_ground);

        let engage_inhibited = input.on_ground
            || airborne_s < ENGAGE_INHIBIT_AFTER_LIFTOFF_S
            || (input.radio_height_ft < ENGAGE_INHIBIT_RADIO_HEIGHT_FT
                && !Self::autoland_active(input.lateral_mode, input.vertical_mode));

        let ap1_edge = input.ap1_push && !self.prev_ap1_push;
        let ap2_edge = input.ap2_push && !self.prev_ap2_push;
        self.prev_ap1_push = input.ap1_push;
        self.prev_ap2_push = input.ap2_push;

        // Push on an engaged AP disengages it (no warning: deliberate).
        if ap1_edge && self.ap1 {
            self.ap1 = false;
        } else if ap1_edge && !engage_inhibited && input.fd_active {
            self.ap1 = true;
            if !Self::autoland_active(input.lateral_mode, input.vertical_mode) {
                self.ap2 = false;
            }
            self.warning = false;
            debug!("AP1 engaged");
        }

        if ap2_edge && self.ap2 {
            self.ap2 = false;
        } else if ap2_edge && !engage_inhibited && input.fd_active {
            self.ap2 = true;
            if !Self::autoland_active(input.lateral_mode, input.vertical_mode) {
                self.ap1 = false;
            }
            self.warning = false;
            debug!("AP2 engaged");
        }

        // Involuntary or instinctive disconnects
        let any_engaged = self.ap1 || self.ap2;
        if any_engaged && (input.instinctive_disconnect || input.sidestick_priority_taken) {
            self.ap1 = false;
            self.ap2 = false;
            // Instinctive disconnect is acknowledged by the same button, so
            // the warning is transient; sidestick takeover latches it.
            self.warning = input.sidestick_priority_taken;
            debug!("autopilot disconnected by pilot action");
        } else if any_engaged && !input.fd_active {
            self.ap1 = false;
            self.ap2 = false;
            self.warning = true;
            debug!("autopilot disconnected: guidance lost");
        }

        EngagementOutput {
            ap1_engaged: self.ap1,
            ap2_engaged: self.ap2,
            disconnect_warning: self.warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne_input(time_s: f64) -> EngagementInput {
        EngagementInput {
            simulation_time_s: time_s,
            ap1_push: false,
            ap2_push: false,
            instinctive_disconnect: false,
            sidestick_priority_taken: false,
            on_ground: false,
            radio_height_ft: 5000.0,
            lateral_mode: LateralMode::HeadingHold,
            vertical_mode: VerticalMode::AltHold,
            fd_active: true,
        }
    }

    /// Runs enough airborne ticks to clear the liftoff inhibit window.
    fn settled(ap: &mut ApEngagement) -> f64 {
        let mut t = 0.0;
        for _ in 0..20 {
            t += 1.0;
            ap.update(&airborne_input(t));
        }
        t
    }

    #[test]
    fn ap1_engages_on_push() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.ap1_push = true;
        let out = ap.update(&input);
        assert!(out.ap1_engaged);
        assert!(!out.ap2_engaged);
    }

    #[test]
    fn engagement_inhibited_on_ground() {
        let mut ap = ApEngagement::new();
        let mut input = airborne_input(1.0);
        input.on_ground = true;
        input.ap1_push = true;
        let out = ap.update(&input);
        assert!(!out.ap1_engaged);
    }

    #[test]
    fn engagement_inhibited_right_after_liftoff() {
        let mut ap = ApEngagement::new();
        // One ground tick, then airborne immediately pushing AP1
        let mut input = airborne_input(0.0);
        input.on_ground = true;
        ap.update(&input);
        let mut input = airborne_input(2.0);
        input.ap1_push = true;
        let out = ap.update(&input);
        assert!(!out.ap1_engaged, "inhibited within 5 s of liftoff");
    }

    #[test]
    fn second_ap_takes_over_outside_autoland() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.ap1_push = true;
        ap.update(&input);
        let mut input = airborne_input(t + 2.0);
        input.ap2_push = true;
        let out = ap.update(&input);
        assert!(!out.ap1_engaged);
        assert!(out.ap2_engaged);
    }

    #[test]
    fn both_aps_allowed_during_autoland() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.lateral_mode = LateralMode::Land;
        input.vertical_mode = VerticalMode::GsTrack;
        input.ap1_push = true;
        ap.update(&input);
        input.simulation_time_s = t + 2.0;
        input.ap1_push = false;
        input.ap2_push = true;
        let out = ap.update(&input);
        assert!(out.ap1_engaged);
        assert!(out.ap2_engaged);
    }

    #[test]
    fn instinctive_disconnect_drops_both() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.ap1_push = true;
        ap.update(&input);

        let mut input = airborne_input(t + 2.0);
        input.instinctive_disconnect = true;
        let out = ap.update(&input);
        assert!(!out.ap1_engaged);
        assert!(!out.ap2_engaged);
        assert!(!out.disconnect_warning);
    }

    #[test]
    fn sidestick_takeover_latches_warning() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.ap1_push = true;
        ap.update(&input);

        let mut input = airborne_input(t + 2.0);
        input.sidestick_priority_taken = true;
        let out = ap.update(&input);
        assert!(out.disconnect_warning);

        // Warning stays until a new engagement
        let out = ap.update(&airborne_input(t + 3.0));
        assert!(out.disconnect_warning);
        let mut input = airborne_input(t + 4.0);
        input.ap1_push = true;
        let out = ap.update(&input);
        assert!(out.ap1_engaged);
        assert!(!out.disconnect_warning);
    }

    #[test]
    fn push_on_engaged_ap_disengages_cleanly() {
        let mut ap = ApEngagement::new();
        let t = settled(&mut ap);
        let mut input = airborne_input(t + 1.0);
        input.ap1_push = true;
        ap.update(&input);
        input.simulation_time_s = t + 2.0;
        input.ap1_push = false;
        ap.update(&input);
        input.simulation_time_s = t + 3.0;
        input.ap1_push = true;
        let out = ap.update(&input);
        assert!(!out.ap1_engaged);
        assert!(!out.disconnect_warning);
    }
}
