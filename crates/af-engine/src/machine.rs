//! Engine state machine.
//!
//! Evaluated once per engine per tick, engine 1 before engine 2. A zero
//! animation-delta from the host means the simulation is paused: the state
//! keeps its phase, gains the paused marker and nothing else advances.

use crate::state::{EnginePhase, EngineState};
use serde::{Deserialize, Serialize};

/// Engine-mode selector position (host wire codes 0/1/2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgniterMode {
    Crank,
    Ignition,
    Start,
}

impl IgniterMode {
    pub fn from_code(code: f64) -> Self {
        match code as i64 {
            1 => Self::Ignition,
            2 => Self::Start,
            _ => Self::Crank,
        }
    }

    pub fn code(self) -> f64 {
        match self {
            Self::Crank => 0.0,
            Self::Ignition => 1.0,
            Self::Start => 2.0,
        }
    }
}

/// Inputs the transition function looks at.
#[derive(Clone, Copy, Debug)]
pub struct TransitionInput {
    pub igniter: IgniterMode,
    pub starter_on: bool,
    pub sim_n2_percent: f64,
    pub idle_n2_percent: f64,
    pub egt_deg_c: f64,
    pub ambient_temp_deg_c: f64,
    /// Difference between this tick's and the previous tick's animation
    /// delta time; exactly zero is the host's "paused" signal.
    pub delta_time_diff: f64,
}

/// Result of one evaluation: the next state and whether the per-engine timer
/// must be reset (true exactly on the transitions that begin a timed
/// procedure stage).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub next: EngineState,
    pub reset_timer: bool,
}

/// One step of the state machine.
pub fn evaluate(current: EngineState, input: &TransitionInput) -> Transition {
    use EnginePhase::*;

    if input.delta_time_diff == 0.0 {
        // Paused: hold the phase, mark it, advance nothing.
        return Transition {
            next: EngineState::paused(current.phase),
            reset_timer: false,
        };
    }

    let starter = input.starter_on;
    let mut reset_timer = false;

    let next_phase = match current.phase {
        Off => {
            if input.igniter == IgniterMode::Ignition && starter && input.sim_n2_percent > 20.0 {
                On
            } else if input.igniter == IgniterMode::Start && starter {
                Starting
            } else {
                Off
            }
        }
        On => {
            if starter {
                On
            } else {
                Shutting
            }
        }
        Starting | Restarting => {
            if starter && input.sim_n2_percent >= input.idle_n2_percent - 0.1 {
                reset_timer = true;
                On
            } else if !starter {
                reset_timer = true;
                Shutting
            } else {
                current.phase
            }
        }
        Shutting => {
            if input.igniter == IgniterMode::Start && starter {
                reset_timer = true;
                Restarting
            } else if !starter
                && input.sim_n2_percent < 0.05
                && input.egt_deg_c <= input.ambient_temp_deg_c
            {
                reset_timer = true;
                Off
            } else if starter && input.sim_n2_percent > 50.0 {
                reset_timer = true;
                Restarting
            } else {
                Shutting
            }
        }
    };

    Transition {
        next: EngineState::new(next_phase),
        reset_timer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TransitionInput {
        TransitionInput {
            igniter: IgniterMode::Ignition,
            starter_on: false,
            sim_n2_percent: 0.0,
            idle_n2_percent: 66.0,
            egt_deg_c: 15.0,
            ambient_temp_deg_c: 15.0,
            delta_time_diff: 0.016,
        }
    }

    #[test]
    fn paused_marks_state_without_advancing() {
        let mut i = input();
        i.delta_time_diff = 0.0;
        i.igniter = IgniterMode::Start;
        i.starter_on = true;
        let t = evaluate(EngineState::new(EnginePhase::Off), &i);
        assert_eq!(t.next, EngineState::paused(EnginePhase::Off));
        assert!(!t.reset_timer);
        // And stays paused rather than stacking offsets
        let t = evaluate(t.next, &i);
        assert_eq!(t.next, EngineState::paused(EnginePhase::Off));
    }

    #[test]
    fn paused_state_resumes_into_base_phase() {
        let i = input();
        let t = evaluate(EngineState::paused(EnginePhase::On), &i);
        // starter off: the resumed ON engine starts shutting down
        assert_eq!(t.next.phase, EnginePhase::Shutting);
        assert!(!t.next.paused);
    }

    #[test]
    fn off_to_starting_needs_start_igniter_and_starter() {
        let mut i = input();
        i.igniter = IgniterMode::Start;
        i.starter_on = true;
        let t = evaluate(EngineState::new(EnginePhase::Off), &i);
        assert_eq!(t.next.phase, EnginePhase::Starting);

        i.starter_on = false;
        let t = evaluate(EngineState::new(EnginePhase::Off), &i);
        assert_eq!(t.next.phase, EnginePhase::Off);
    }

    #[test]
    fn off_to_on_with_running_core() {
        let mut i = input();
        i.igniter = IgniterMode::Ignition;
        i.starter_on = true;
        i.sim_n2_percent = 25.0;
        let t = evaluate(EngineState::new(EnginePhase::Off), &i);
        assert_eq!(t.next.phase, EnginePhase::On);
    }

    #[test]
    fn starting_completes_at_idle_minus_margin() {
        let mut i = input();
        i.igniter = IgniterMode::Start;
        i.starter_on = true;
        i.sim_n2_percent = 65.95; // >= 66 - 0.1
        let t = evaluate(EngineState::new(EnginePhase::Starting), &i);
        assert_eq!(t.next.phase, EnginePhase::On);
        assert!(t.reset_timer);
    }

    #[test]
    fn starting_aborts_to_shutting_when_starter_drops() {
        let mut i = input();
        i.starter_on = false;
        let t = evaluate(EngineState::new(EnginePhase::Starting), &i);
        assert_eq!(t.next.phase, EnginePhase::Shutting);
        assert!(t.reset_timer);
    }

    #[test]
    fn restarting_mirrors_starting_exits() {
        let mut i = input();
        i.starter_on = true;
        i.sim_n2_percent = 66.0;
        let t = evaluate(EngineState::new(EnginePhase::Restarting), &i);
        assert_eq!(t.next.phase, EnginePhase::On);
        assert!(t.reset_timer);
    }

    #[test]
    fn shutting_to_off_needs_cold_still_core() {
        let mut i = input();
        i.starter_on = false;
        i.sim_n2_percent = 0.01;
        i.egt_deg_c = 15.0;
        let t = evaluate(EngineState::new(EnginePhase::Shutting), &i);
        assert_eq!(t.next.phase, EnginePhase::Off);
        assert!(t.reset_timer);

        // Still warm: keeps shutting
        i.egt_deg_c = 80.0;
        let t = evaluate(EngineState::new(EnginePhase::Shutting), &i);
        assert_eq!(t.next.phase, EnginePhase::Shutting);
    }

    #[test]
    fn shutting_restarts_on_start_igniter() {
        let mut i = input();
        i.igniter = IgniterMode::Start;
        i.starter_on = true;
        let t = evaluate(EngineState::new(EnginePhase::Shutting), &i);
        assert_eq!(t.next.phase, EnginePhase::Restarting);
        assert!(t.reset_timer);
    }

    #[test]
    fn shutting_restarts_with_spinning_core() {
        let mut i = input();
        i.igniter = IgniterMode::Ignition;
        i.starter_on = true;
        i.sim_n2_percent = 55.0;
        let t = evaluate(EngineState::new(EnginePhase::Shutting), &i);
        assert_eq!(t.next.phase, EnginePhase::Restarting);
    }

    #[test]
    fn determinism() {
        let mut i = input();
        i.igniter = IgniterMode::Start;
        i.starter_on = true;
        i.sim_n2_percent = 30.0;
        let a = evaluate(EngineState::new(EnginePhase::Starting), &i);
        let b = evaluate(EngineState::new(EnginePhase::Starting), &i);
        assert_eq!(a, b);
    }
}
