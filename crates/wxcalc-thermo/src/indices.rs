//! Apparent-temperature indices: heat index and wind chill.
//!
//! Both indices are undefined outside their empirical ranges and return NaN
//! there. Results are absolute temperatures (K).

use crate::elementwise::zip_map;
use crate::errors::CalcResult;
use crate::function::values_in;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Below this temperature (degF) the heat index is undefined.
const HEAT_INDEX_MIN_F: f64 = 80.0;

/// Above this temperature (degC) wind chill is undefined.
const WINDCHILL_MAX_C: f64 = 10.0;

/// At or below this speed (km/h, 3 mph) wind chill is undefined.
const WINDCHILL_MIN_KMH: f64 = 4.828032;

fn fahrenheit_to_kelvin(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0 + 273.15
}

/// NWS heat index (degF) from temperature (degF) and relative humidity (percent).
fn heat_index_f(t: f64, rh: f64) -> f64 {
    if t.is_nan() || rh.is_nan() || t < HEAT_INDEX_MIN_F {
        return f64::NAN;
    }
    let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
    if (simple + t) / 2.0 < 80.0 {
        return simple;
    }
    let mut hi = -42.379 + 2.04901523 * t + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 6.83783e-3 * t * t
        - 5.481717e-2 * rh * rh
        + 1.22874e-3 * t * t * rh
        + 8.5282e-4 * t * rh * rh
        - 1.99e-6 * t * t * rh * rh;
    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= (13.0 - rh) / 4.0 * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        hi += (rh - 85.0) / 10.0 * ((87.0 - t) / 5.0);
    }
    hi
}

/// Wind chill (degC) from temperature (degC) and wind speed (km/h).
fn windchill_c(t: f64, speed: f64) -> f64 {
    if t > WINDCHILL_MAX_C || speed <= WINDCHILL_MIN_KMH {
        return f64::NAN;
    }
    let v = speed.powf(0.16);
    13.12 + 0.6215 * t - 11.37 * v + 0.3965 * t * v
}

/// Heat index after Rothfusz, with the NWS low-humidity and high-humidity
/// adjustments. Undefined below 80 degF.
pub fn heat_index(temperature: &Quantity, relative_humidity: &Quantity) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::DegreeFahrenheit)?;
    let rh = values_in(relative_humidity, "relative_humidity", Unit::Percent)?;
    Ok(Quantity::new(
        zip_map([&t, &rh], |[t, rh]| fahrenheit_to_kelvin(heat_index_f(t, rh)))?,
        Unit::Kelvin,
    ))
}

/// Wind chill index (Environment Canada / NWS 2001).
///
/// Undefined above 10 degC or for winds of 3 mph and below.
pub fn windchill(temperature: &Quantity, speed: &Quantity) -> CalcResult<Quantity> {
    let t = values_in(temperature, "temperature", Unit::DegreeCelsius)?;
    let v = values_in(speed, "speed", Unit::KilometerPerHour)?;
    Ok(Quantity::new(
        zip_map([&t, &v], |[t, v]| windchill_c(t, v) + 273.15)?,
        Unit::Kelvin,
    ))
}

/// Heat index where defined, else wind chill where defined, else the air
/// temperature.
pub fn apparent_temperature(
    temperature: &Quantity,
    relative_humidity: &Quantity,
    speed: &Quantity,
) -> CalcResult<Quantity> {
    let t_f = values_in(temperature, "temperature", Unit::DegreeFahrenheit)?;
    let rh = values_in(relative_humidity, "relative_humidity", Unit::Percent)?;
    let v = values_in(speed, "speed", Unit::KilometerPerHour)?;
    Ok(Quantity::new(
        zip_map([&t_f, &rh, &v], |[t_f, rh, v]| {
            let t_k = fahrenheit_to_kelvin(t_f);
            let hi = heat_index_f(t_f, rh);
            if !hi.is_nan() {
                return fahrenheit_to_kelvin(hi);
            }
            let wc = windchill_c(t_k - 273.15, v);
            if !wc.is_nan() {
                return wc + 273.15;
            }
            t_k
        })?,
        Unit::Kelvin,
    ))
}
