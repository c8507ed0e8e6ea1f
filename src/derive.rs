//! Best-effort synthesis of commonly needed quantities.
//!
//! Rules run in a fixed order so later rules can use what earlier ones
//! produced. A rule only fires when its target is absent and the inputs of
//! one of its alternatives are present. Within a rule the first applicable
//! alternative is the only one tried; if it fails the target stays absent and
//! the calculation that needed it reports the missing argument instead.

use log::debug;
use wxcalc_core::normalize::Quantities;
use wxcalc_core::Quantity;
use wxcalc_thermo::atmosphere::{geopotential_height_to_height, height_to_pressure_std};
use wxcalc_thermo::moisture::{
    dewpoint_from_relative_humidity, mixing_ratio, mixing_ratio_from_relative_humidity,
    mixing_ratio_from_specific_humidity, relative_humidity_from_mixing_ratio,
    saturation_vapor_pressure,
};
use wxcalc_thermo::parcel::parcel_profile;
use wxcalc_thermo::CalcResult;

/// A derivation rule: `None` when no alternative applies.
type Rule = fn(&Quantities) -> Option<CalcResult<Quantity>>;

const RULES: [(&str, Rule); 4] = [
    ("dewpoint", derive_dewpoint),
    ("mixing_ratio", derive_mixing_ratio),
    ("pressure", derive_pressure),
    ("parcel_profile", derive_parcel_profile),
];

/// Adds whichever derived quantities can be computed from `quantities`.
///
/// Existing entries are never replaced.
pub fn fill_missing(quantities: &mut Quantities) {
    for (target, rule) in RULES {
        if quantities.contains_key(target) {
            continue;
        }
        match rule(quantities) {
            Some(Ok(derived)) => {
                quantities.insert(target.to_string(), derived);
            }
            Some(Err(e)) => debug!("could not derive {target}: {e}"),
            None => {}
        }
    }
}

fn derive_dewpoint(q: &Quantities) -> Option<CalcResult<Quantity>> {
    let t = q.get("temperature")?;
    if let Some(rh) = q.get("relative_humidity") {
        return Some(dewpoint_from_relative_humidity(t, rh));
    }
    let (q_s, p) = (q.get("specific_humidity")?, q.get("pressure")?);
    Some(
        mixing_ratio_from_specific_humidity(q_s)
            .and_then(|w| relative_humidity_from_mixing_ratio(p, t, &w))
            .and_then(|rh| dewpoint_from_relative_humidity(t, &rh)),
    )
}

fn derive_mixing_ratio(q: &Quantities) -> Option<CalcResult<Quantity>> {
    if let Some(q_s) = q.get("specific_humidity") {
        return Some(mixing_ratio_from_specific_humidity(q_s));
    }
    let p = q.get("pressure")?;
    if let (Some(t), Some(rh)) = (q.get("temperature"), q.get("relative_humidity")) {
        return Some(mixing_ratio_from_relative_humidity(p, t, rh));
    }
    let td = q.get("dewpoint")?;
    Some(saturation_vapor_pressure(td).and_then(|e| mixing_ratio(&e, p)))
}

fn derive_pressure(q: &Quantities) -> Option<CalcResult<Quantity>> {
    if let Some(height) = q.get("height") {
        return Some(height_to_pressure_std(height));
    }
    let z = q.get("geopotential_height")?;
    Some(geopotential_height_to_height(z).and_then(|h| height_to_pressure_std(&h)))
}

fn derive_parcel_profile(q: &Quantities) -> Option<CalcResult<Quantity>> {
    let (p, t, td) = (q.get("pressure")?, q.get("temperature")?, q.get("dewpoint")?);
    Some(parcel_profile(p, t, td))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wxcalc_core::units::Unit;

    fn quantities(entries: &[(&str, Quantity)]) -> Quantities {
        entries
            .iter()
            .map(|(name, q)| (name.to_string(), q.clone()))
            .collect()
    }

    #[test]
    fn test_dewpoint_from_relative_humidity() {
        let mut q = quantities(&[
            ("temperature", Quantity::scalar(25.0, Unit::DegreeCelsius)),
            ("relative_humidity", Quantity::scalar(70.0, Unit::Percent)),
        ]);
        fill_missing(&mut q);
        let td = q["dewpoint"].values_in(Unit::DegreeCelsius).unwrap();
        assert_relative_eq!(td[0], 19.155, epsilon = 0.01);
        // No pressure, so neither mixing ratio nor a parcel profile
        assert!(!q.contains_key("mixing_ratio"));
        assert!(!q.contains_key("parcel_profile"));
    }

    #[test]
    fn test_dewpoint_from_specific_humidity_chain() {
        let mut q = quantities(&[
            ("temperature", Quantity::scalar(25.0, Unit::DegreeCelsius)),
            ("specific_humidity", Quantity::scalar(10.0, Unit::GramPerKilogram)),
            ("pressure", Quantity::scalar(1000.0, Unit::Hectopascal)),
        ]);
        fill_missing(&mut q);
        let td = q["dewpoint"].values_in(Unit::DegreeCelsius).unwrap()[0];
        assert!(td > 13.0 && td < 15.0, "td = {td}");
        assert!(q.contains_key("mixing_ratio"));
        assert!(q.contains_key("parcel_profile"));
    }

    #[test]
    fn test_mixing_ratio_from_pressure_temperature_humidity() {
        let mut q = quantities(&[
            ("pressure", Quantity::scalar(1000.0, Unit::Hectopascal)),
            ("temperature", Quantity::scalar(25.0, Unit::DegreeCelsius)),
            ("relative_humidity", Quantity::scalar(70.0, Unit::Percent)),
        ]);
        fill_missing(&mut q);
        let w = q["mixing_ratio"].values_in(Unit::GramPerKilogram).unwrap()[0];
        // e = 0.7 * 31.67 hPa at 25 °C
        assert_relative_eq!(w, 14.10, epsilon = 0.02);
        assert!(q.contains_key("dewpoint"));
    }

    #[test]
    fn test_existing_values_are_kept() {
        let dewpoint = Quantity::scalar(5.0, Unit::DegreeCelsius);
        let mut q = quantities(&[
            ("temperature", Quantity::scalar(25.0, Unit::DegreeCelsius)),
            ("relative_humidity", Quantity::scalar(70.0, Unit::Percent)),
            ("dewpoint", dewpoint.clone()),
        ]);
        fill_missing(&mut q);
        assert_eq!(q["dewpoint"], dewpoint);
    }

    #[test]
    fn test_pressure_from_height() {
        let mut q = quantities(&[(
            "height",
            Quantity::from_vec(vec![0.0, 1000.0], Unit::Meter),
        )]);
        fill_missing(&mut q);
        let p = q["pressure"].values_in(Unit::Hectopascal).unwrap();
        assert_relative_eq!(p[0], 1013.25, epsilon = 1e-6);
        assert_relative_eq!(p[1], 898.7, epsilon = 0.1);
    }

    #[test]
    fn test_pressure_from_geopotential_height() {
        let mut q = quantities(&[(
            "geopotential_height",
            Quantity::scalar(0.0, Unit::Meter),
        )]);
        fill_missing(&mut q);
        assert_relative_eq!(q["pressure"].magnitude()[0], 1013.25, epsilon = 1e-6);
    }

    #[test]
    fn test_failed_rule_leaves_target_absent() {
        // Increasing pressure cannot be lifted through
        let mut q = quantities(&[
            ("pressure", Quantity::from_vec(vec![800.0, 900.0], Unit::Hectopascal)),
            ("temperature", Quantity::from_vec(vec![20.0, 22.0], Unit::DegreeCelsius)),
            ("dewpoint", Quantity::from_vec(vec![10.0, 11.0], Unit::DegreeCelsius)),
        ]);
        fill_missing(&mut q);
        assert!(!q.contains_key("parcel_profile"));
        assert!(q.contains_key("mixing_ratio"));
    }
}
