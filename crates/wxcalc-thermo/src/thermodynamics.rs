//! Dry thermodynamics: potential temperature, virtual temperature, density.

use crate::constants::{EPSILON, KAPPA, P0, RD};
use crate::elementwise::zip_map;
use crate::errors::{CalcError, CalcResult};
use crate::function::{scalar_in, values_in};
use crate::moisture::{saturation_mixing_ratio_value, saturation_vapor_pressure_hpa};
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Potential temperature, $\theta = T (P_0 / p)^\kappa$.
pub fn potential_temperature(pressure: &Quantity, temperature: &Quantity) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    Ok(Quantity::new(
        zip_map([&p, &t], |[p, t]| t * (P0 / p).powf(KAPPA))?,
        Unit::Kelvin,
    ))
}

/// Temperature at `pressure` of air with potential temperature `potential_temperature`.
pub fn temperature_from_potential_temperature(
    pressure: &Quantity,
    potential_temperature: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let theta = values_in(potential_temperature, "potential_temperature", Unit::Kelvin)?;
    Ok(Quantity::new(
        zip_map([&p, &theta], |[p, theta]| theta * (p / P0).powf(KAPPA))?,
        Unit::Kelvin,
    ))
}

/// Virtual temperature of moist air.
///
/// $$ T_v = T \frac{w + \epsilon}{\epsilon (1 + w)} $$
pub fn virtual_temperature(temperature: &Quantity, mixing_ratio: &Quantity) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let w = values_in(mixing_ratio, "mixing_ratio", Unit::KilogramPerKilogram)?;
    Ok(Quantity::new(
        zip_map([&t, &w], |[t, w]| t * (w + EPSILON) / (EPSILON * (1.0 + w)))?,
        Unit::Kelvin,
    ))
}

/// Density of moist air from the ideal gas law with virtual temperature.
pub fn density(
    pressure: &Quantity,
    temperature: &Quantity,
    mixing_ratio: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Pascal)?;
    let tv = virtual_temperature(temperature, mixing_ratio)?.into_magnitude();
    Ok(Quantity::new(
        zip_map([&p, &tv], |[p, tv]| p / (RD * tv))?,
        Unit::KilogramPerCubicMeter,
    ))
}

/// Temperature of a dry-adiabatically lifted parcel at each pressure.
///
/// The parcel starts at `temperature` at `reference_pressure`, which defaults
/// to the first pressure.
pub fn dry_lapse(
    pressure: &Quantity,
    temperature: &Quantity,
    reference_pressure: Option<&Quantity>,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let p_ref = match reference_pressure {
        Some(reference) => scalar_in(reference, "reference_pressure", Unit::Hectopascal)?,
        None => *p
            .first()
            .ok_or(CalcError::InsufficientProfile { required: 1, found: 0 })?,
    };
    Ok(Quantity::new(
        zip_map([&p, &t], |[p, t]| t * (p / p_ref).powf(KAPPA))?,
        Unit::Kelvin,
    ))
}

/// Equivalent potential temperature after Bolton (1980).
pub fn equivalent_potential_temperature(
    pressure: &Quantity,
    temperature: &Quantity,
    dewpoint: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    Ok(Quantity::new(
        zip_map([&p, &t, &td], |[p, t, td]| {
            let e = saturation_vapor_pressure_hpa(td);
            let r = saturation_mixing_ratio_value(p, td);
            let t_l = 56.0 + 1.0 / (1.0 / (td - 56.0) + (t / td).ln() / 800.0);
            let theta_l = t * (P0 / (p - e)).powf(KAPPA) * (t / t_l).powf(0.28 * r);
            theta_l * (r * (1.0 + 0.448 * r) * (3036.0 / t_l - 1.78)).exp()
        })?,
        Unit::Kelvin,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hpa(values: Vec<f64>) -> Quantity {
        Quantity::from_vec(values, Unit::Hectopascal)
    }

    #[test]
    fn test_potential_temperature() {
        let theta = potential_temperature(
            &hpa(vec![900.0, 500.0]),
            &Quantity::from_vec(vec![20.0, -20.0], Unit::DegreeCelsius),
        )
        .unwrap();
        assert_relative_eq!(theta.magnitude()[0], 302.11, epsilon = 0.01);
        assert_relative_eq!(theta.magnitude()[1], 253.15 * 2f64.powf(KAPPA), max_relative = 1e-12);
    }

    #[test]
    fn test_potential_temperature_inverse() {
        let p = hpa(vec![850.0]);
        let theta = Quantity::scalar(300.0, Unit::Kelvin);
        let t = temperature_from_potential_temperature(&p, &theta).unwrap();
        let back = potential_temperature(&p, &t).unwrap();
        assert_relative_eq!(back.magnitude()[0], 300.0, max_relative = 1e-12);
    }

    #[test]
    fn test_virtual_temperature_warmer_when_moist() {
        let t = Quantity::scalar(300.0, Unit::Kelvin);
        let dry = virtual_temperature(&t, &Quantity::scalar(0.0, Unit::KilogramPerKilogram)).unwrap();
        let moist = virtual_temperature(&t, &Quantity::scalar(15.0, Unit::GramPerKilogram)).unwrap();
        assert_relative_eq!(dry.magnitude()[0], 300.0, max_relative = 1e-12);
        assert_relative_eq!(moist.magnitude()[0], 302.695, epsilon = 0.01);
    }

    #[test]
    fn test_density() {
        let rho = density(
            &hpa(vec![1013.25]),
            &Quantity::scalar(15.0, Unit::DegreeCelsius),
            &Quantity::scalar(0.0, Unit::KilogramPerKilogram),
        )
        .unwrap();
        assert_eq!(rho.unit(), Unit::KilogramPerCubicMeter);
        assert_relative_eq!(rho.magnitude()[0], 1.225, epsilon = 1e-3);
    }

    #[test]
    fn test_dry_lapse_defaults_to_first_level() {
        let t = dry_lapse(
            &hpa(vec![1000.0, 800.0, 500.0]),
            &Quantity::scalar(293.15, Unit::Kelvin),
            None,
        )
        .unwrap();
        assert_relative_eq!(t.magnitude()[0], 293.15, max_relative = 1e-12);
        assert_relative_eq!(t.magnitude()[2], 293.15 * 0.5f64.powf(KAPPA), max_relative = 1e-12);
    }

    #[test]
    fn test_dry_lapse_with_reference() {
        let t = dry_lapse(
            &hpa(vec![500.0]),
            &Quantity::scalar(300.0, Unit::Kelvin),
            Some(&hpa(vec![1000.0])),
        )
        .unwrap();
        assert_relative_eq!(t.magnitude()[0], 300.0 * 0.5f64.powf(KAPPA), max_relative = 1e-12);
    }

    #[test]
    fn test_equivalent_potential_temperature() {
        let theta_e = equivalent_potential_temperature(
            &hpa(vec![850.0]),
            &Quantity::scalar(20.0, Unit::DegreeCelsius),
            &Quantity::scalar(18.0, Unit::DegreeCelsius),
        )
        .unwrap();
        assert_relative_eq!(theta_e.magnitude()[0], 353.94, epsilon = 0.05);
    }
}
