//! Bus trait and the in-memory implementation.

use crate::vars::SimVar;
use std::collections::HashMap;

/// Scalar variable bus between the model and the host.
///
/// All values are `f64` on the wire, like the host's own variable system;
/// booleans are 0.0/1.0 and enums use their documented numeric codes.
pub trait VariableBus {
    /// Last-published value, or 0.0 for a variable never written.
    fn get(&self, var: SimVar) -> f64;

    /// Fire-and-forget write, last-write-wins.
    fn set(&mut self, var: SimVar, value: f64);

    fn get_bool(&self, var: SimVar) -> bool {
        self.get(var) > 0.5
    }

    fn set_bool(&mut self, var: SimVar, value: bool) {
        self.set(var, if value { 1.0 } else { 0.0 });
    }
}

/// HashMap-backed bus for tests and offline scenario runs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBus {
    values: HashMap<SimVar, f64>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableBus for InMemoryBus {
    fn get(&self, var: SimVar) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }

    fn set(&mut self, var: SimVar, value: f64) {
        self.values.insert(var, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_variable_reads_zero() {
        let bus = InMemoryBus::new();
        assert_eq!(bus.get(SimVar::Mach), 0.0);
    }

    #[test]
    fn last_write_wins() {
        let mut bus = InMemoryBus::new();
        bus.set(SimVar::EngineN2(1), 50.0);
        bus.set(SimVar::EngineN2(1), 60.0);
        assert_eq!(bus.get(SimVar::EngineN2(1)), 60.0);
    }

    #[test]
    fn bool_helpers() {
        let mut bus = InMemoryBus::new();
        bus.set_bool(SimVar::SimOnGround, true);
        assert!(bus.get_bool(SimVar::SimOnGround));
        assert_eq!(bus.get(SimVar::SimOnGround), 1.0);
    }
}
