//! Wind speed, direction and components.
//!
//! Directions follow the meteorological convention: the direction the wind
//! blows *from*, in degrees clockwise from north. A calm wind has direction 0
//! and a northerly wind 360.

use crate::elementwise::zip_map;
use crate::errors::CalcResult;
use crate::function::values_in;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Horizontal wind speed from its components.
pub fn wind_speed(u: &Quantity, v: &Quantity) -> CalcResult<Quantity> {
    let u = values_in(u, "u", Unit::MeterPerSecond)?;
    let v = values_in(v, "v", Unit::MeterPerSecond)?;
    Ok(Quantity::new(
        zip_map([&u, &v], |[u, v]| u.hypot(v))?,
        Unit::MeterPerSecond,
    ))
}

/// Direction the wind blows from.
pub fn wind_direction(u: &Quantity, v: &Quantity) -> CalcResult<Quantity> {
    let u = values_in(u, "u", Unit::MeterPerSecond)?;
    let v = values_in(v, "v", Unit::MeterPerSecond)?;
    Ok(Quantity::new(
        zip_map([&u, &v], |[u, v]| {
            if u == 0.0 && v == 0.0 {
                return 0.0;
            }
            let direction = 90.0 - (-v).atan2(-u).to_degrees();
            if direction <= 0.0 {
                direction + 360.0
            } else {
                direction
            }
        })?,
        Unit::Degree,
    ))
}

/// Eastward (`u`) and northward (`v`) components from speed and direction.
pub fn wind_components(
    speed: &Quantity,
    wind_direction: &Quantity,
) -> CalcResult<(Quantity, Quantity)> {
    let speed = values_in(speed, "speed", Unit::MeterPerSecond)?;
    let direction = values_in(wind_direction, "wind_direction", Unit::Radian)?;
    let u = zip_map([&speed, &direction], |[s, d]| -s * d.sin())?;
    let v = zip_map([&speed, &direction], |[s, d]| -s * d.cos())?;
    Ok((
        Quantity::new(u, Unit::MeterPerSecond),
        Quantity::new(v, Unit::MeterPerSecond),
    ))
}
