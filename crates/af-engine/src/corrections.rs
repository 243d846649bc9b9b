//! Standard-day correction ratios.
//!
//! Spool speeds, fuel flow and EGT are calibrated against a standard
//! atmosphere (288.15 K, 1013.25 mbar); the theta/delta ratios translate
//! between corrected and observed quantities at the current flight
//! condition.

/// Temperature ratio θ = T / T_std.
pub fn theta(ambient_temp_deg_c: f64) -> f64 {
    (273.15 + ambient_temp_deg_c) / 288.15
}

/// Pressure ratio δ derived from θ via the troposphere lapse relation.
pub fn delta(ambient_temp_deg_c: f64) -> f64 {
    theta(ambient_temp_deg_c).powf(5.256)
}

/// Total-temperature ratio θ₂: θ corrected for compressibility at Mach.
pub fn theta2(mach: f64, ambient_temp_deg_c: f64) -> f64 {
    theta(ambient_temp_deg_c) * (1.0 + 0.2 * mach * mach)
}

/// Total-pressure ratio δ₂.
pub fn delta2(mach: f64, ambient_temp_deg_c: f64) -> f64 {
    delta(ambient_temp_deg_c) * (1.0 + 0.2 * mach * mach).powf(3.5)
}

const STANDARD_PRESSURE_MBAR: f64 = 1013.25;

/// Pressure ratio δ from a measured static pressure.
pub fn delta_from_pressure(ambient_pressure_mbar: f64) -> f64 {
    ambient_pressure_mbar / STANDARD_PRESSURE_MBAR
}

/// Total-pressure ratio δ₂ from a measured static pressure.
pub fn delta2_from_pressure(mach: f64, ambient_pressure_mbar: f64) -> f64 {
    delta_from_pressure(ambient_pressure_mbar) * (1.0 + 0.2 * mach * mach).powf(3.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_day_is_unity() {
        assert!((theta(15.0) - 1.0).abs() < 1e-12);
        assert!((delta(15.0) - 1.0).abs() < 1e-12);
        assert!((theta2(0.0, 15.0) - 1.0).abs() < 1e-12);
        assert!((delta2(0.0, 15.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mach_raises_total_ratios() {
        assert!(theta2(0.8, 15.0) > theta(15.0));
        assert!(delta2(0.8, 15.0) > delta(15.0));
    }

    #[test]
    fn cold_day_lowers_theta() {
        assert!(theta(-30.0) < 1.0);
    }
}
