//! Calibration fits for spool-up, spool-down and steady-state parameters.
//!
//! These are regression fits against reference engine data. Their exact
//! coefficients are calibration, not design; what is load-bearing is the
//! qualitative contract each function documents (monotonicity, bounds,
//! decay shape), which the state machine and the tests rely on.

/// Start-procedure N2: bounded approach from the previous value toward the
/// idle target, paced by the spool fraction already achieved (slow crank,
/// faster light-off region, asymptotic tail). The host's own starter spool
/// acts as a floor so an externally driven start can only be faster.
///
/// Monotone non-decreasing while below the target; never exceeds the target.
pub fn start_n2(sim_n2: f64, pre_n2: f64, target_n2: f64) -> f64 {
    if target_n2 <= 0.0 {
        return 0.0;
    }
    let progress = (pre_n2 / target_n2).clamp(0.0, 1.0);
    let gain = 0.008 + 0.045 * (1.0 - (progress - 0.45).abs());
    let approached = pre_n2 + (target_n2 - pre_n2) * gain + 0.003;
    approached.max(sim_n2.min(target_n2)).min(target_n2)
}

/// Start-procedure N1, derived from N2 progress: the fan stays still through
/// the crank phase and spools once the core passes about a quarter of idle.
pub fn start_n1(new_n2: f64, idle_n2: f64, idle_n1: f64) -> f64 {
    if idle_n2 <= 0.0 {
        return 0.0;
    }
    let progress = ((new_n2 / idle_n2 - 0.25) / 0.75).clamp(0.0, 1.0);
    idle_n1 * progress.powf(1.5)
}

/// Start-procedure fuel flow: zero until light-off (~35 % of idle core
/// speed), then rising to the idle flow.
pub fn start_ff(new_n2: f64, idle_n2: f64, idle_ff: f64) -> f64 {
    if idle_n2 <= 0.0 {
        return 0.0;
    }
    let progress = ((new_n2 / idle_n2 - 0.35) / 0.65).clamp(0.0, 1.0);
    idle_ff * progress.powf(1.3)
}

/// Start-procedure EGT: ambient until light-off, then a rise to the idle EGT
/// with the characteristic overshoot bump around 60 % core speed.
pub fn start_egt(new_n2: f64, idle_n2: f64, ambient_temp_deg_c: f64, idle_egt_deg_c: f64) -> f64 {
    if idle_n2 <= 0.0 {
        return ambient_temp_deg_c;
    }
    let progress = (new_n2 / idle_n2).clamp(0.0, 1.0);
    let rise = ((progress - 0.35) / 0.65).clamp(0.0, 1.0).powi(2);
    let span = idle_egt_deg_c - ambient_temp_deg_c;
    let overshoot = 0.25 * span * (-((progress - 0.62) / 0.15).powi(2)).exp();
    ambient_temp_deg_c + span * rise + overshoot
}

/// Oil temperature during the start, tracking core speed toward the warm
/// idle value.
pub fn start_oil_temp(new_n2: f64, idle_n2: f64, ambient_temp_deg_c: f64) -> f64 {
    const WARM_IDLE_OIL_DEG_C: f64 = 75.0;
    if idle_n2 <= 0.0 {
        return ambient_temp_deg_c;
    }
    let progress = (new_n2 / idle_n2).clamp(0.0, 1.0);
    ambient_temp_deg_c + (WARM_IDLE_OIL_DEG_C - ambient_temp_deg_c) * progress * progress
}

// Spool-down decay rates, 1/s. N1 bleeds off a little faster than the core.
const SHUTDOWN_N1_RATE: f64 = 0.12;
const SHUTDOWN_N2_RATE: f64 = 0.11;
const SHUTDOWN_N2_LINEAR: f64 = 0.0042;
const SHUTDOWN_EGT_RATE: f64 = 0.018;

/// Shutdown N1: exponential decay toward zero.
pub fn shutdown_n1(pre_n1: f64, dt: f64) -> f64 {
    (pre_n1 * (-SHUTDOWN_N1_RATE * dt).exp()).max(0.0)
}

/// Shutdown N2: exponential decay with a linear bleed term so the core
/// actually reaches the sub-0.05 % threshold that releases the state machine
/// to OFF (a pure exponential would hover above it).
pub fn shutdown_n2(pre_n2: f64, dt: f64) -> f64 {
    (pre_n2 * (-SHUTDOWN_N2_RATE * dt).exp() - SHUTDOWN_N2_LINEAR * dt).max(0.0)
}

/// Shutdown EGT: exponential cooling toward ambient, snapping to ambient
/// inside a 0.05 °C band so the OFF guard (`egt <= ambient`) is reachable.
pub fn shutdown_egt(pre_egt: f64, ambient_temp_deg_c: f64, dt: f64) -> f64 {
    let next = ambient_temp_deg_c + (pre_egt - ambient_temp_deg_c) * (-SHUTDOWN_EGT_RATE * dt).exp();
    if (next - ambient_temp_deg_c).abs() < 0.05 {
        ambient_temp_deg_c
    } else {
        next
    }
}

/// Corrected EGT (°C, standard-day) from corrected N1, corrected fuel flow
/// (lb/h), Mach and pressure altitude.
pub fn corrected_egt(cn1: f64, cff_lbs_h: f64, mach: f64, press_altitude_ft: f64) -> f64 {
    280.0 + 4.0 * cn1 + 0.018 * cn1 * cn1 + 0.010 * cff_lbs_h - 2.0e-5 * cff_lbs_h * cn1
        - 30.0 * mach
        - 5.5e-4 * press_altitude_ft
}

/// Corrected fuel flow (lb/h, standard-day) from corrected N1, Mach and
/// pressure altitude. Negative at sub-idle spool speeds; callers treat
/// anything below 1 lb/h as flameout.
pub fn corrected_fuel_flow(cn1: f64, mach: f64, press_altitude_ft: f64) -> f64 {
    -600.0 + 40.0 * cn1 + 1.35 * cn1 * cn1 + 2.0 * mach * cn1 - 1.2e-3 * press_altitude_ft
}

/// Oil temperature update: first-order approach to the (clamped) steady
/// temperature, accelerated by accumulated thermal energy from core
/// acceleration.
pub fn oil_temperature(
    thermal_energy: f64,
    pre_oil_temp_deg_c: f64,
    steady_temp_deg_c: f64,
    dt: f64,
) -> f64 {
    let approach = pre_oil_temp_deg_c
        + (steady_temp_deg_c - pre_oil_temp_deg_c) * (1.0 - (-0.0045 * dt).exp());
    let energy_term = (thermal_energy * 1.0e-4).clamp(-0.5, 0.5);
    approach + energy_term * dt
}

/// Fraction of the oil tank gulped into the engine at a thrust setting.
pub fn oil_gulp_pct(thrust_lbs: f64) -> f64 {
    (2.0e-6 * thrust_lbs + 1.0e-12 * thrust_lbs * thrust_lbs).clamp(0.0, 0.1)
}

/// Oil pressure (PSI) from core speed.
pub fn oil_pressure(n2: f64) -> f64 {
    (14.0 + 1.0 * n2 - 4.0e-3 * n2 * n2).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE_N2: f64 = 66.0;
    const IDLE_N1: f64 = 22.0;

    #[test]
    fn start_n2_is_monotone_and_reaches_idle() {
        let mut n2 = 0.0;
        let mut reached = false;
        for _ in 0..5000 {
            let next = start_n2(0.0, n2, IDLE_N2);
            assert!(next >= n2);
            n2 = next;
            if n2 >= IDLE_N2 - 0.1 {
                reached = true;
                break;
            }
        }
        assert!(reached, "start N2 never reached idle, stuck at {n2}");
    }

    #[test]
    fn start_n2_never_exceeds_target() {
        let mut n2 = 0.0;
        for _ in 0..5000 {
            n2 = start_n2(0.0, n2, IDLE_N2);
            assert!(n2 <= IDLE_N2);
        }
    }

    #[test]
    fn start_n2_follows_faster_host_spool() {
        let n2 = start_n2(30.0, 5.0, IDLE_N2);
        assert!(n2 >= 30.0);
    }

    #[test]
    fn start_n1_lags_core() {
        assert_eq!(start_n1(0.2 * IDLE_N2, IDLE_N2, IDLE_N1), 0.0);
        assert!(start_n1(0.6 * IDLE_N2, IDLE_N2, IDLE_N1) > 0.0);
        assert!((start_n1(IDLE_N2, IDLE_N2, IDLE_N1) - IDLE_N1).abs() < 1e-9);
    }

    #[test]
    fn start_ff_zero_before_light_off() {
        assert_eq!(start_ff(0.3 * IDLE_N2, IDLE_N2, 400.0), 0.0);
        assert!((start_ff(IDLE_N2, IDLE_N2, 400.0) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn start_egt_ends_near_idle_egt() {
        let egt = start_egt(IDLE_N2, IDLE_N2, 15.0, 390.0);
        assert!((egt - 390.0).abs() < 5.0);
    }

    #[test]
    fn shutdown_n2_reaches_off_threshold() {
        let mut n2 = IDLE_N2;
        let mut t = 0.0;
        while n2 >= 0.05 {
            n2 = shutdown_n2(n2, 0.1);
            t += 0.1;
            assert!(t < 600.0, "spool-down too slow");
        }
    }

    #[test]
    fn shutdown_egt_reaches_ambient() {
        let mut egt = 390.0;
        let mut t = 0.0;
        while egt > 15.0 {
            egt = shutdown_egt(egt, 15.0, 0.5);
            t += 0.5;
            assert!(t < 3600.0, "cooling too slow");
        }
        assert_eq!(egt, 15.0);
    }

    #[test]
    fn corrected_fuel_flow_sub_idle_is_flameout() {
        assert!(corrected_fuel_flow(5.0, 0.0, 0.0) < 1.0);
        assert!(corrected_fuel_flow(80.0, 0.0, 0.0) > 1000.0);
    }

    #[test]
    fn oil_pressure_rises_with_core_speed() {
        assert!(oil_pressure(80.0) > oil_pressure(60.0));
        assert_eq!(oil_pressure(0.0), 14.0);
    }

    #[test]
    fn oil_gulp_bounded() {
        assert_eq!(oil_gulp_pct(0.0), 0.0);
        assert!(oil_gulp_pct(1.0e9) <= 0.1);
    }
}
