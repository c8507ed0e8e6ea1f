//! Moisture variables: vapour pressure, dewpoint, humidity and mixing ratio.
//!
//! Saturation vapour pressure over liquid water uses Bolton (1980):
//!
//! $$ e_s(T) = 6.112 \exp\left(\frac{17.67 (T - 273.15)}{T - 29.65}\right) \text{ hPa} $$
//!
//! and dewpoint is its inverse. Relative humidity is handled as a fraction
//! internally; inputs in percent are converted on the way in.

use crate::constants::{EPSILON, SAT_PRESSURE_0C, ZERO_CELSIUS};
use crate::elementwise::zip_map;
use crate::errors::CalcResult;
use crate::function::values_in;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Saturation vapour pressure (hPa) at temperature `t` (K).
pub(crate) fn saturation_vapor_pressure_hpa(t: f64) -> f64 {
    SAT_PRESSURE_0C * (17.67 * (t - ZERO_CELSIUS) / (t - 29.65)).exp()
}

/// Dewpoint (K) for vapour pressure `e` (hPa).
pub(crate) fn dewpoint_kelvin(e: f64) -> f64 {
    let val = (e / SAT_PRESSURE_0C).ln();
    ZERO_CELSIUS + 243.5 * val / (17.67 - val)
}

/// Mixing ratio (kg/kg) from partial and total pressure in the same unit.
pub(crate) fn mixing_ratio_value(partial: f64, total: f64) -> f64 {
    EPSILON * partial / (total - partial)
}

/// Saturation mixing ratio (kg/kg) at pressure `p` (hPa) and temperature `t` (K).
pub(crate) fn saturation_mixing_ratio_value(p: f64, t: f64) -> f64 {
    mixing_ratio_value(saturation_vapor_pressure_hpa(t), p)
}

/// Vapour pressure, in the unit of `p`, for mixing ratio `w` (kg/kg).
pub(crate) fn vapor_pressure_value(p: f64, w: f64) -> f64 {
    p * w / (EPSILON + w)
}

/// Saturation vapour pressure over liquid water.
pub fn saturation_vapor_pressure(temperature: &Quantity) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    Ok(Quantity::new(
        t.mapv(saturation_vapor_pressure_hpa),
        Unit::Hectopascal,
    ))
}

/// Water vapour partial pressure from total pressure and mixing ratio.
pub fn vapor_pressure(pressure: &Quantity, mixing_ratio: &Quantity) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let w = values_in(mixing_ratio, "mixing_ratio", Unit::KilogramPerKilogram)?;
    Ok(Quantity::new(
        zip_map([&p, &w], |[p, w]| vapor_pressure_value(p, w))?,
        Unit::Hectopascal,
    ))
}

/// Dewpoint from water vapour partial pressure.
pub fn dewpoint_from_vapor_pressure(vapor_pressure: &Quantity) -> CalcResult<Quantity> {
    let e = values_in(vapor_pressure, "vapor_pressure", Unit::Hectopascal)?;
    Ok(Quantity::new(e.mapv(dewpoint_kelvin), Unit::Kelvin))
}

/// Dewpoint from temperature and relative humidity.
pub fn dewpoint_from_relative_humidity(
    temperature: &Quantity,
    relative_humidity: &Quantity,
) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let rh = values_in(relative_humidity, "relative_humidity", Unit::Dimensionless)?;
    Ok(Quantity::new(
        zip_map([&t, &rh], |[t, rh]| {
            dewpoint_kelvin(rh * saturation_vapor_pressure_hpa(t))
        })?,
        Unit::Kelvin,
    ))
}

/// Dewpoint from pressure and specific humidity.
pub fn dewpoint_from_specific_humidity(
    pressure: &Quantity,
    specific_humidity: &Quantity,
) -> CalcResult<Quantity> {
    let w = mixing_ratio_from_specific_humidity(specific_humidity)?;
    dewpoint_from_vapor_pressure(&vapor_pressure(pressure, &w)?)
}

/// Relative humidity (percent) from temperature and dewpoint.
pub fn relative_humidity_from_dewpoint(
    temperature: &Quantity,
    dewpoint: &Quantity,
) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    Ok(Quantity::new(
        zip_map([&t, &td], |[t, td]| {
            100.0 * saturation_vapor_pressure_hpa(td) / saturation_vapor_pressure_hpa(t)
        })?,
        Unit::Percent,
    ))
}

/// Relative humidity (percent) from pressure, temperature and mixing ratio.
///
/// $$ RH = \frac{w}{\epsilon + w} \frac{p}{e_s(T)} $$
pub fn relative_humidity_from_mixing_ratio(
    pressure: &Quantity,
    temperature: &Quantity,
    mixing_ratio: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let w = values_in(mixing_ratio, "mixing_ratio", Unit::KilogramPerKilogram)?;
    Ok(Quantity::new(
        zip_map([&p, &t, &w], |[p, t, w]| {
            100.0 * vapor_pressure_value(p, w) / saturation_vapor_pressure_hpa(t)
        })?,
        Unit::Percent,
    ))
}

/// Relative humidity (percent) from pressure, temperature and specific humidity.
pub fn relative_humidity_from_specific_humidity(
    pressure: &Quantity,
    temperature: &Quantity,
    specific_humidity: &Quantity,
) -> CalcResult<Quantity> {
    let w = mixing_ratio_from_specific_humidity(specific_humidity)?;
    relative_humidity_from_mixing_ratio(pressure, temperature, &w)
}

/// Mixing ratio from the partial pressure of a gas and the total pressure.
pub fn mixing_ratio(partial_pressure: &Quantity, total_pressure: &Quantity) -> CalcResult<Quantity> {
    let e = values_in(partial_pressure, "partial_pressure", Unit::Hectopascal)?;
    let p = values_in(total_pressure, "total_pressure", Unit::Hectopascal)?;
    Ok(Quantity::new(
        zip_map([&e, &p], |[e, p]| mixing_ratio_value(e, p))?,
        Unit::KilogramPerKilogram,
    ))
}

/// Mixing ratio of saturated air at the given pressure and temperature.
pub fn saturation_mixing_ratio(pressure: &Quantity, temperature: &Quantity) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    Ok(Quantity::new(
        zip_map([&p, &t], |[p, t]| saturation_mixing_ratio_value(p, t))?,
        Unit::KilogramPerKilogram,
    ))
}

/// Mixing ratio from pressure, temperature and relative humidity.
///
/// Inverse of [`relative_humidity_from_mixing_ratio`].
pub fn mixing_ratio_from_relative_humidity(
    pressure: &Quantity,
    temperature: &Quantity,
    relative_humidity: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let rh = values_in(relative_humidity, "relative_humidity", Unit::Dimensionless)?;
    Ok(Quantity::new(
        zip_map([&p, &t, &rh], |[p, t, rh]| {
            mixing_ratio_value(rh * saturation_vapor_pressure_hpa(t), p)
        })?,
        Unit::KilogramPerKilogram,
    ))
}

pub fn mixing_ratio_from_specific_humidity(specific_humidity: &Quantity) -> CalcResult<Quantity> {
    let q = values_in(specific_humidity, "specific_humidity", Unit::KilogramPerKilogram)?;
    Ok(Quantity::new(
        q.mapv(|q| q / (1.0 - q)),
        Unit::KilogramPerKilogram,
    ))
}

pub fn specific_humidity_from_mixing_ratio(mixing_ratio: &Quantity) -> CalcResult<Quantity> {
    let w = values_in(mixing_ratio, "mixing_ratio", Unit::KilogramPerKilogram)?;
    Ok(Quantity::new(
        w.mapv(|w| w / (1.0 + w)),
        Unit::KilogramPerKilogram,
    ))
}

/// Specific humidity of air whose dewpoint is `dewpoint`.
pub fn specific_humidity_from_dewpoint(pressure: &Quantity, dewpoint: &Quantity) -> CalcResult<Quantity> {
    specific_humidity_from_mixing_ratio(&saturation_mixing_ratio(pressure, dewpoint)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn celsius(v: f64) -> Quantity {
        Quantity::scalar(v, Unit::DegreeCelsius)
    }

    fn first_in(q: &Quantity, unit: Unit) -> f64 {
        q.values_in(unit).unwrap()[0]
    }

    #[test]
    fn test_saturation_vapor_pressure_at_freezing() {
        let es = saturation_vapor_pressure(&celsius(0.0)).unwrap();
        assert_relative_eq!(first_in(&es, Unit::Hectopascal), 6.112, max_relative = 1e-12);
    }

    #[test]
    fn test_dewpoint_from_relative_humidity() {
        let td = dewpoint_from_relative_humidity(
            &celsius(25.0),
            &Quantity::scalar(70.0, Unit::Percent),
        )
        .unwrap();
        assert_relative_eq!(first_in(&td, Unit::DegreeCelsius), 19.155, epsilon = 0.01);
    }

    #[test]
    fn test_saturated_dewpoint_equals_temperature() {
        let td = dewpoint_from_relative_humidity(
            &Quantity::from_vec(vec![-10.0, 15.0, 30.0], Unit::DegreeCelsius),
            &Quantity::scalar(1.0, Unit::Dimensionless),
        )
        .unwrap();
        let td = td.values_in(Unit::DegreeCelsius).unwrap();
        assert_relative_eq!(td[0], -10.0, epsilon = 1e-9);
        assert_relative_eq!(td[1], 15.0, epsilon = 1e-9);
        assert_relative_eq!(td[2], 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_relative_humidity_round_trip_through_mixing_ratio() {
        let p = Quantity::scalar(900.0, Unit::Hectopascal);
        let t = celsius(18.0);
        let rh = Quantity::scalar(65.0, Unit::Percent);
        let w = mixing_ratio_from_relative_humidity(&p, &t, &rh).unwrap();
        let back = relative_humidity_from_mixing_ratio(&p, &t, &w).unwrap();
        assert_eq!(back.unit(), Unit::Percent);
        assert_relative_eq!(first_in(&back, Unit::Percent), 65.0, max_relative = 1e-10);
    }

    #[test]
    fn test_specific_humidity_and_mixing_ratio() {
        let q = Quantity::scalar(10.0, Unit::GramPerKilogram);
        let w = mixing_ratio_from_specific_humidity(&q).unwrap();
        assert_relative_eq!(first_in(&w, Unit::KilogramPerKilogram), 0.01 / 0.99, max_relative = 1e-12);
        let q_back = specific_humidity_from_mixing_ratio(&w).unwrap();
        assert_relative_eq!(first_in(&q_back, Unit::KilogramPerKilogram), 0.01, max_relative = 1e-12);
    }

    #[test]
    fn test_dewpoint_from_specific_humidity_matches_saturation() {
        let p = Quantity::scalar(1000.0, Unit::Hectopascal);
        let q = specific_humidity_from_dewpoint(&p, &celsius(12.0)).unwrap();
        let td = dewpoint_from_specific_humidity(&p, &q).unwrap();
        assert_relative_eq!(first_in(&td, Unit::DegreeCelsius), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mixing_ratio_accepts_pascals() {
        let w = mixing_ratio(
            &Quantity::scalar(2500.0, Unit::Pascal),
            &Quantity::scalar(1000.0, Unit::Hectopascal),
        )
        .unwrap();
        assert_relative_eq!(
            first_in(&w, Unit::KilogramPerKilogram),
            EPSILON * 25.0 / 975.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        assert!(saturation_vapor_pressure(&Quantity::scalar(1.0, Unit::Meter)).is_err());
    }
}
