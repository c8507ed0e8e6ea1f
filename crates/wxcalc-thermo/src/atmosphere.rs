//! Standard atmosphere and geopotential conversions.
//!
//! Pressure and height are related through the U.S. Standard Atmosphere
//! troposphere (constant lapse rate):
//!
//! $$ p = p_0 \left(1 - \frac{\gamma h}{T_0}\right)^{g / (R_d \gamma)} $$
//!
//! Geopotential is converted to geometric height on a spherical Earth.

use crate::constants::{
    EARTH_RADIUS, G, RD, STD_LAPSE_RATE, STD_SURFACE_PRESSURE, STD_SURFACE_TEMPERATURE,
};
use crate::errors::CalcResult;
use crate::function::values_in;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Pressure of the standard atmosphere at height `height`.
pub fn height_to_pressure_std(height: &Quantity) -> CalcResult<Quantity> {
    let h = values_in(height, "height", Unit::Meter)?;
    let exponent = G / (RD * STD_LAPSE_RATE);
    Ok(Quantity::new(
        h.mapv(|h| {
            STD_SURFACE_PRESSURE * (1.0 - STD_LAPSE_RATE * h / STD_SURFACE_TEMPERATURE).powf(exponent)
        }),
        Unit::Hectopascal,
    ))
}

/// Height of the standard atmosphere at pressure `pressure`.
pub fn pressure_to_height_std(pressure: &Quantity) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let exponent = RD * STD_LAPSE_RATE / G;
    Ok(Quantity::new(
        p.mapv(|p| {
            STD_SURFACE_TEMPERATURE / STD_LAPSE_RATE
                * (1.0 - (p / STD_SURFACE_PRESSURE).powf(exponent))
        }),
        Unit::Meter,
    ))
}

/// Geometric height for a geopotential.
///
/// $$ z = \frac{\Phi R_e}{g R_e - \Phi} $$
pub fn geopotential_to_height(geopotential: &Quantity) -> CalcResult<Quantity> {
    let phi = values_in(geopotential, "geopotential", Unit::MeterSquaredPerSecondSquared)?;
    Ok(Quantity::new(
        phi.mapv(|phi| phi * EARTH_RADIUS / (G * EARTH_RADIUS - phi)),
        Unit::Meter,
    ))
}

/// Geopotential for a geometric height.
pub fn height_to_geopotential(height: &Quantity) -> CalcResult<Quantity> {
    let h = values_in(height, "height", Unit::Meter)?;
    Ok(Quantity::new(
        h.mapv(|h| G * EARTH_RADIUS * h / (EARTH_RADIUS + h)),
        Unit::MeterSquaredPerSecondSquared,
    ))
}

/// Geometric height for a geopotential height (geopotential divided by `g`).
pub fn geopotential_height_to_height(geopotential_height: &Quantity) -> CalcResult<Quantity> {
    let z = values_in(geopotential_height, "geopotential_height", Unit::Meter)?;
    Ok(Quantity::new(
        z.mapv(|z| EARTH_RADIUS * z / (EARTH_RADIUS - z)),
        Unit::Meter,
    ))
}
