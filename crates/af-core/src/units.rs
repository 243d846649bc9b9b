// af-core/src/units.rs
//
// The engine domain mixes pounds, kilograms, US gallons and feet because the
// host bus publishes in mixed units. Conversions are routed through uom so
// the factors stay authoritative; law math itself stays in scalar f64.

use uom::si::f64::{Length as UomLength, Mass as UomMass};
use uom::si::length::{foot, meter};
use uom::si::mass::{kilogram, pound};

pub type Mass = UomMass;
pub type Length = UomLength;

#[inline]
pub fn lbs(v: f64) -> Mass {
    Mass::new::<pound>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn ft(v: f64) -> Length {
    Length::new::<foot>(v)
}

#[inline]
pub fn lbs_to_kg(v: f64) -> f64 {
    lbs(v).get::<kilogram>()
}

#[inline]
pub fn kg_to_lbs(v: f64) -> f64 {
    kg(v).get::<pound>()
}

#[inline]
pub fn ft_to_m(v: f64) -> f64 {
    ft(v).get::<meter>()
}

/// Gallons to pounds. The host reports fuel weight per gallon as runtime
/// data (it varies with the loaded fuel type), so this is not a fixed factor.
#[inline]
pub fn gallons_to_lbs(gallons: f64, fuel_weight_per_gallon_lbs: f64) -> f64 {
    gallons * fuel_weight_per_gallon_lbs
}

#[inline]
pub fn lbs_to_gallons(pounds: f64, fuel_weight_per_gallon_lbs: f64) -> f64 {
    if fuel_weight_per_gallon_lbs <= 0.0 {
        return 0.0;
    }
    pounds / fuel_weight_per_gallon_lbs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pound_kilogram_roundtrip() {
        let v = 1234.5;
        assert!((kg_to_lbs(lbs_to_kg(v)) - v).abs() < 1e-9);
    }

    #[test]
    fn pound_factor_matches_reference() {
        // 1 lb = 0.45359237 kg exactly
        assert!((lbs_to_kg(1.0) - 0.45359237).abs() < 1e-12);
    }

    #[test]
    fn gallons_guard_zero_weight() {
        assert_eq!(lbs_to_gallons(100.0, 0.0), 0.0);
    }
}
