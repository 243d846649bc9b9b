//! Per-session engine imbalance.
//!
//! Once per session a packed decimal code is generated describing which
//! engine runs slightly off-nominal and by how much:
//!
//! ```text
//! EE FF GG HH II JJ KK LL
//! ```
//!
//! - `EE` engine index (1 or 2)
//! - `FF` EGT delta, °C (1–20)
//! - `GG` fuel-flow delta, kg/h (1–36)
//! - `HH` N2 delta, hundredths of a percent (1–30)
//! - `II` oil quantity delta, tenths of a quart (1–20)
//! - `JJ` oil pressure delta, tenths of a PSI (1–30)
//! - `KK` idle oil pressure offset, PSI before the −6 bias (1–12)
//! - `LL` maximum oil temperature, °C (86–95)
//!
//! The packed form is what goes on the variable bus (it fits existing saves
//! and tooling); it is decoded once into [`ImbalanceSet`] at session start
//! rather than re-decoded on every access.

use crate::error::{EngineError, EngineResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Packed base-100 imbalance code, eight two-digit fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImbalanceCode(pub u64);

impl ImbalanceCode {
    /// Generate a fresh session code. Deterministic for a given seed.
    pub fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let engine: u64 = if rng.gen_range(1..=100) < 50 { 1 } else { 2 };
        let egt = rng.gen_range(1..=20);
        let ff = rng.gen_range(1..=36);
        let n2 = rng.gen_range(1..=30);
        let oil_qty = rng.gen_range(1..=20);
        let oil_pressure = rng.gen_range(1..=30);
        let oil_pressure_idle = rng.gen_range(1..=12);
        let oil_temp_max = rng.gen_range(86..=95);

        let mut packed = engine;
        for field in [egt, ff, n2, oil_qty, oil_pressure, oil_pressure_idle, oil_temp_max] {
            packed = packed * 100 + field;
        }
        Self(packed)
    }

    /// Extract field `parameter` (1-based, 1 = engine index .. 8 = oil temp
    /// max) by walking the base-100 digits.
    pub fn extract(self, parameter: u8) -> EngineResult<u64> {
        if !(1..=8).contains(&parameter) {
            return Err(EngineError::InvalidArg {
                what: "imbalance parameter must be 1..=8",
            });
        }
        let shift = 8 - u32::from(parameter);
        Ok((self.0 / 100u64.pow(shift)) % 100)
    }

    /// Bus representation (the host stores it as a double).
    pub fn to_bus(self) -> f64 {
        self.0 as f64
    }

    pub fn from_bus(value: f64) -> EngineResult<Self> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(EngineError::InvalidArg {
                what: "imbalance bus value must be a non-negative integer",
            });
        }
        Ok(Self(value as u64))
    }

    pub fn decode(self) -> EngineResult<ImbalanceSet> {
        Ok(ImbalanceSet {
            engine: self.extract(1)? as u8,
            egt_deg_c: self.extract(2)? as f64,
            fuel_flow_kgh: self.extract(3)? as f64,
            n2_percent: self.extract(4)? as f64 / 100.0,
            oil_quantity_qt: self.extract(5)? as f64 / 10.0,
            oil_pressure_psi: self.extract(6)? as f64 / 10.0,
            oil_pressure_idle_psi: self.extract(7)? as f64 - 6.0,
            oil_temperature_max_deg_c: self.extract(8)? as f64,
        })
    }
}

/// Decoded imbalance parameters in engineering units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceSet {
    pub engine: u8,
    pub egt_deg_c: f64,
    pub fuel_flow_kgh: f64,
    pub n2_percent: f64,
    pub oil_quantity_qt: f64,
    pub oil_pressure_psi: f64,
    pub oil_pressure_idle_psi: f64,
    pub oil_temperature_max_deg_c: f64,
}

impl ImbalanceSet {
    /// Delta applied to a given engine: the imbalance affects only the engine
    /// the code names; the other engine runs nominal.
    pub fn for_engine(&self, engine: u8) -> Self {
        if engine == self.engine {
            *self
        } else {
            Self {
                engine: self.engine,
                egt_deg_c: 0.0,
                fuel_flow_kgh: 0.0,
                n2_percent: 0.0,
                oil_quantity_qt: 0.0,
                oil_pressure_psi: 0.0,
                // The idle offset is a per-session random, not an imbalance:
                // both engines share it.
                oil_pressure_idle_psi: self.oil_pressure_idle_psi,
                oil_temperature_max_deg_c: self.oil_temperature_max_deg_c,
            }
        }
    }
}
