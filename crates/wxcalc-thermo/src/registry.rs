//! Static registry of every supported calculation.
//!
//! Each entry pairs declared parameters with a wrapper that pulls the
//! arguments out of an [`Args`] bag and calls the typed function.

use crate::atmosphere::*;
use crate::errors::CalcResult;
use crate::function::{Args, CalcFunction, CalcOutput, Param};
use crate::indices::*;
use crate::kinematics::{advection, divergence, vorticity, Grid};
use crate::moisture::*;
use crate::parcel::*;
use crate::thermodynamics::*;
use crate::wind::*;
use wxcalc_core::units::Unit;

macro_rules! single {
    ($wrapper:ident => $func:path, [$($arg:literal),*]) => {
        fn $wrapper(args: &Args) -> CalcResult<CalcOutput> {
            Ok(CalcOutput::Single($func($(args.require($arg)?),*)?))
        }
    };
}

macro_rules! pair {
    ($wrapper:ident => $func:path, [$($arg:literal),*]) => {
        fn $wrapper(args: &Args) -> CalcResult<CalcOutput> {
            let (first, second) = $func($(args.require($arg)?),*)?;
            Ok(CalcOutput::Pair(first, second))
        }
    };
}

single!(eval_saturation_vapor_pressure => saturation_vapor_pressure, ["temperature"]);
single!(eval_vapor_pressure => vapor_pressure, ["pressure", "mixing_ratio"]);
single!(eval_dewpoint_from_relative_humidity => dewpoint_from_relative_humidity, ["temperature", "relative_humidity"]);
single!(eval_dewpoint_from_vapor_pressure => dewpoint_from_vapor_pressure, ["vapor_pressure"]);
single!(eval_dewpoint_from_specific_humidity => dewpoint_from_specific_humidity, ["pressure", "specific_humidity"]);
single!(eval_relative_humidity_from_dewpoint => relative_humidity_from_dewpoint, ["temperature", "dewpoint"]);
single!(eval_relative_humidity_from_mixing_ratio => relative_humidity_from_mixing_ratio, ["pressure", "temperature", "mixing_ratio"]);
single!(eval_relative_humidity_from_specific_humidity => relative_humidity_from_specific_humidity, ["pressure", "temperature", "specific_humidity"]);
single!(eval_mixing_ratio => mixing_ratio, ["partial_pressure", "total_pressure"]);
single!(eval_saturation_mixing_ratio => saturation_mixing_ratio, ["pressure", "temperature"]);
single!(eval_mixing_ratio_from_relative_humidity => mixing_ratio_from_relative_humidity, ["pressure", "temperature", "relative_humidity"]);
single!(eval_mixing_ratio_from_specific_humidity => mixing_ratio_from_specific_humidity, ["specific_humidity"]);
single!(eval_specific_humidity_from_mixing_ratio => specific_humidity_from_mixing_ratio, ["mixing_ratio"]);
single!(eval_specific_humidity_from_dewpoint => specific_humidity_from_dewpoint, ["pressure", "dewpoint"]);
single!(eval_virtual_temperature => virtual_temperature, ["temperature", "mixing_ratio"]);
single!(eval_density => density, ["pressure", "temperature", "mixing_ratio"]);
single!(eval_potential_temperature => potential_temperature, ["pressure", "temperature"]);
single!(eval_temperature_from_potential_temperature => temperature_from_potential_temperature, ["pressure", "potential_temperature"]);
single!(eval_equivalent_potential_temperature => equivalent_potential_temperature, ["pressure", "temperature", "dewpoint"]);
single!(eval_height_to_pressure_std => height_to_pressure_std, ["height"]);
single!(eval_pressure_to_height_std => pressure_to_height_std, ["pressure"]);
single!(eval_geopotential_to_height => geopotential_to_height, ["geopotential"]);
single!(eval_height_to_geopotential => height_to_geopotential, ["height"]);
single!(eval_geopotential_height_to_height => geopotential_height_to_height, ["geopotential_height"]);
pair!(eval_lcl => lcl, ["pressure", "temperature", "dewpoint"]);
single!(eval_parcel_profile => parcel_profile, ["pressure", "temperature", "dewpoint"]);
single!(eval_wet_bulb_temperature => wet_bulb_temperature, ["pressure", "temperature", "dewpoint"]);
pair!(eval_cape_cin => cape_cin, ["pressure", "temperature", "dewpoint", "parcel_profile"]);
single!(eval_heat_index => heat_index, ["temperature", "relative_humidity"]);
single!(eval_windchill => windchill, ["temperature", "speed"]);
single!(eval_apparent_temperature => apparent_temperature, ["temperature", "relative_humidity", "speed"]);
single!(eval_wind_speed => wind_speed, ["u", "v"]);
single!(eval_wind_direction => wind_direction, ["u", "v"]);
pair!(eval_wind_components => wind_components, ["speed", "wind_direction"]);

fn eval_dry_lapse(args: &Args) -> CalcResult<CalcOutput> {
    Ok(CalcOutput::Single(dry_lapse(
        args.require("pressure")?,
        args.require("temperature")?,
        args.get("reference_pressure"),
    )?))
}

fn eval_moist_lapse(args: &Args) -> CalcResult<CalcOutput> {
    Ok(CalcOutput::Single(moist_lapse(
        args.require("pressure")?,
        args.require("temperature")?,
        args.get("reference_pressure"),
    )?))
}

fn grid(args: &Args) -> CalcResult<Grid> {
    Ok(Grid {
        nx: args.scalar("nx", Unit::Dimensionless)? as usize,
        dx: args.scalar("dx", Unit::Meter)?,
        dy: args.scalar("dy", Unit::Meter)?,
    })
}

fn eval_vorticity(args: &Args) -> CalcResult<CalcOutput> {
    Ok(CalcOutput::Single(vorticity(
        args.require("u")?,
        args.require("v")?,
        &grid(args)?,
    )?))
}

fn eval_divergence(args: &Args) -> CalcResult<CalcOutput> {
    Ok(CalcOutput::Single(divergence(
        args.require("u")?,
        args.require("v")?,
        &grid(args)?,
    )?))
}

fn eval_advection(args: &Args) -> CalcResult<CalcOutput> {
    Ok(CalcOutput::Single(advection(
        args.require("temperature")?,
        args.require("u")?,
        args.require("v")?,
        &grid(args)?,
    )?))
}

const TEMPERATURE: Param = Param::required("temperature", Unit::DegreeCelsius);
const DEWPOINT: Param = Param::required("dewpoint", Unit::DegreeCelsius);
const PRESSURE: Param = Param::required("pressure", Unit::Hectopascal);
const RELATIVE_HUMIDITY: Param = Param::required("relative_humidity", Unit::Percent);
const MIXING_RATIO: Param = Param::required("mixing_ratio", Unit::KilogramPerKilogram);
const SPECIFIC_HUMIDITY: Param = Param::required("specific_humidity", Unit::KilogramPerKilogram);
const HEIGHT: Param = Param::required("height", Unit::Meter);
const SPEED: Param = Param::required("speed", Unit::MeterPerSecond);
const U: Param = Param::required("u", Unit::MeterPerSecond);
const V: Param = Param::required("v", Unit::MeterPerSecond);
const REFERENCE_PRESSURE: Param = Param::optional("reference_pressure", Unit::Hectopascal);
const DX: Param = Param::required("dx", Unit::Meter);
const DY: Param = Param::required("dy", Unit::Meter);
const NX: Param = Param::required("nx", Unit::Dimensionless);

const SINGLE: &[&str] = &["result"];

macro_rules! entry {
    ($name:literal, $summary:literal, [$($param:expr),*], $eval:ident) => {
        entry!($name, $summary, [$($param),*], SINGLE, $eval)
    };
    ($name:literal, $summary:literal, [$($param:expr),*], $outputs:expr, $eval:ident) => {
        CalcFunction {
            name: $name,
            summary: $summary,
            params: &[$($param),*],
            outputs: $outputs,
            eval: $eval,
        }
    };
}

/// Every calculation available by name.
pub static CALC_REGISTRY: &[CalcFunction] = &[
    // Moisture
    entry!("saturation_vapor_pressure",
        "Saturation vapour pressure over liquid water (Bolton 1980).",
        [TEMPERATURE], eval_saturation_vapor_pressure),
    entry!("vapor_pressure",
        "Partial pressure of water vapour from total pressure and mixing ratio.",
        [PRESSURE, MIXING_RATIO], eval_vapor_pressure),
    entry!("dewpoint",
        "Dewpoint from temperature and relative humidity.",
        [TEMPERATURE, RELATIVE_HUMIDITY], eval_dewpoint_from_relative_humidity),
    entry!("dewpoint_from_relative_humidity",
        "Dewpoint from temperature and relative humidity.",
        [TEMPERATURE, RELATIVE_HUMIDITY], eval_dewpoint_from_relative_humidity),
    entry!("dewpoint_from_vapor_pressure",
        "Dewpoint at which the given vapour pressure saturates.",
        [Param::required("vapor_pressure", Unit::Hectopascal)], eval_dewpoint_from_vapor_pressure),
    entry!("dewpoint_from_specific_humidity",
        "Dewpoint from pressure and specific humidity.",
        [PRESSURE, SPECIFIC_HUMIDITY], eval_dewpoint_from_specific_humidity),
    entry!("relative_humidity_from_dewpoint",
        "Relative humidity from temperature and dewpoint.",
        [TEMPERATURE, DEWPOINT], eval_relative_humidity_from_dewpoint),
    entry!("relative_humidity_from_mixing_ratio",
        "Relative humidity from pressure, temperature and mixing ratio.",
        [PRESSURE, TEMPERATURE, MIXING_RATIO], eval_relative_humidity_from_mixing_ratio),
    entry!("relative_humidity_from_specific_humidity",
        "Relative humidity from pressure, temperature and specific humidity.",
        [PRESSURE, TEMPERATURE, SPECIFIC_HUMIDITY], eval_relative_humidity_from_specific_humidity),
    entry!("mixing_ratio",
        "Mixing ratio of a gas from its partial pressure and the total pressure.",
        [Param::required("partial_pressure", Unit::Hectopascal),
         Param::required("total_pressure", Unit::Hectopascal)], eval_mixing_ratio),
    entry!("saturation_mixing_ratio",
        "Saturation mixing ratio of water vapour.",
        [PRESSURE, TEMPERATURE], eval_saturation_mixing_ratio),
    entry!("mixing_ratio_from_relative_humidity",
        "Mixing ratio from pressure, temperature and relative humidity.",
        [PRESSURE, TEMPERATURE, RELATIVE_HUMIDITY], eval_mixing_ratio_from_relative_humidity),
    entry!("mixing_ratio_from_specific_humidity",
        "Mixing ratio from specific humidity.",
        [SPECIFIC_HUMIDITY], eval_mixing_ratio_from_specific_humidity),
    entry!("specific_humidity_from_mixing_ratio",
        "Specific humidity from mixing ratio.",
        [MIXING_RATIO], eval_specific_humidity_from_mixing_ratio),
    entry!("specific_humidity_from_dewpoint",
        "Specific humidity from pressure and dewpoint.",
        [PRESSURE, DEWPOINT], eval_specific_humidity_from_dewpoint),
    // Thermodynamics
    entry!("virtual_temperature",
        "Virtual temperature of moist air.",
        [TEMPERATURE, MIXING_RATIO], eval_virtual_temperature),
    entry!("density",
        "Density of moist air from the ideal gas law.",
        [PRESSURE, TEMPERATURE, MIXING_RATIO], eval_density),
    entry!("potential_temperature",
        "Potential temperature referenced to 1000 hPa.",
        [PRESSURE, TEMPERATURE], eval_potential_temperature),
    entry!("temperature_from_potential_temperature",
        "Temperature at a pressure from potential temperature.",
        [PRESSURE, Param::required("potential_temperature", Unit::Kelvin)],
        eval_temperature_from_potential_temperature),
    entry!("equivalent_potential_temperature",
        "Equivalent potential temperature (Bolton 1980).",
        [PRESSURE, TEMPERATURE, DEWPOINT], eval_equivalent_potential_temperature),
    entry!("dry_lapse",
        "Temperature of a parcel lifted dry-adiabatically.",
        [PRESSURE, TEMPERATURE, REFERENCE_PRESSURE], eval_dry_lapse),
    // Standard atmosphere
    entry!("height_to_pressure_std",
        "Pressure at a height in the U.S. standard atmosphere.",
        [HEIGHT], eval_height_to_pressure_std),
    entry!("pressure_to_height_std",
        "Height of a pressure level in the U.S. standard atmosphere.",
        [PRESSURE], eval_pressure_to_height_std),
    entry!("geopotential_to_height",
        "Geometric height from geopotential.",
        [Param::required("geopotential", Unit::MeterSquaredPerSecondSquared)],
        eval_geopotential_to_height),
    entry!("height_to_geopotential",
        "Geopotential at a geometric height.",
        [HEIGHT], eval_height_to_geopotential),
    entry!("geopotential_height_to_height",
        "Geometric height from geopotential height.",
        [Param::required("geopotential_height", Unit::Meter)],
        eval_geopotential_height_to_height),
    // Parcel
    entry!("moist_lapse",
        "Temperature of a saturated parcel lifted moist-adiabatically.",
        [PRESSURE, TEMPERATURE, REFERENCE_PRESSURE], eval_moist_lapse),
    entry!("lcl",
        "Lifting condensation level pressure and temperature.",
        [PRESSURE, TEMPERATURE, DEWPOINT],
        &["lcl_pressure", "lcl_temperature"], eval_lcl),
    entry!("parcel_profile",
        "Temperature of a surface parcel lifted through a sounding.",
        [PRESSURE, TEMPERATURE, DEWPOINT], eval_parcel_profile),
    entry!("wet_bulb_temperature",
        "Wet-bulb temperature by lifting to the LCL and descending moist-adiabatically.",
        [PRESSURE, TEMPERATURE, DEWPOINT], eval_wet_bulb_temperature),
    entry!("cape_cin",
        "Convective available potential energy and convective inhibition.",
        [PRESSURE, TEMPERATURE, DEWPOINT,
         Param::required("parcel_profile", Unit::Kelvin)],
        &["cape", "cin"], eval_cape_cin),
    // Indices
    entry!("heat_index",
        "NWS heat index; undefined below 80 degF.",
        [TEMPERATURE, RELATIVE_HUMIDITY], eval_heat_index),
    entry!("windchill",
        "Wind chill index; undefined above 10 degC or in light wind.",
        [TEMPERATURE, SPEED], eval_windchill),
    entry!("apparent_temperature",
        "Heat index or wind chill where defined, otherwise air temperature.",
        [TEMPERATURE, RELATIVE_HUMIDITY, SPEED], eval_apparent_temperature),
    // Wind
    entry!("wind_speed",
        "Horizontal wind speed from u and v components.",
        [U, V], eval_wind_speed),
    entry!("wind_direction",
        "Meteorological direction the wind blows from.",
        [U, V], eval_wind_direction),
    entry!("wind_components",
        "u and v components from wind speed and direction.",
        [SPEED, Param::required("wind_direction", Unit::Degree)],
        &["u", "v"], eval_wind_components),
    // Kinematics
    entry!("vorticity",
        "Vertical vorticity of a gridded wind field.",
        [U, V, DX, DY, NX], eval_vorticity),
    entry!("divergence",
        "Horizontal divergence of a gridded wind field.",
        [U, V, DX, DY, NX], eval_divergence),
    entry!("advection",
        "Horizontal temperature advection on a grid.",
        [TEMPERATURE, U, V, DX, DY, NX], eval_advection),
];

/// Finds a calculation by exact name.
pub fn lookup(name: &str) -> Option<&'static CalcFunction> {
    CALC_REGISTRY.iter().find(|f| f.name == name)
}

/// Names of every registered calculation, in registry order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CALC_REGISTRY.iter().map(|f| f.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;
    use std::collections::HashSet;
    use wxcalc_core::Quantity;

    #[test]
    fn test_names_are_unique() {
        let unique: HashSet<_> = names().collect();
        assert_eq!(unique.len(), CALC_REGISTRY.len());
        assert_eq!(CALC_REGISTRY.len(), 40);
    }

    #[test]
    fn test_pair_outputs() {
        for name in ["cape_cin", "lcl", "wind_components"] {
            assert!(lookup(name).unwrap().is_pair(), "{name}");
        }
        assert!(!lookup("dewpoint").unwrap().is_pair());
    }

    #[test]
    fn test_unknown_name() {
        assert!(lookup("not_a_real_function").is_none());
    }

    #[test]
    fn test_call_checks_required_arguments() {
        let dewpoint = lookup("dewpoint").unwrap();
        let args = Args::new().with("temperature", Quantity::scalar(25.0, Unit::DegreeCelsius));
        assert_eq!(
            dewpoint.call(&args),
            Err(CalcError::MissingArgument("relative_humidity".to_string()))
        );
    }

    #[test]
    fn test_signature_marks_optional() {
        assert_eq!(
            lookup("dry_lapse").unwrap().signature(),
            "pressure, temperature, reference_pressure=None"
        );
    }

    #[test]
    fn test_grid_call() {
        let args = Args::new()
            .with("u", Quantity::from_vec(vec![0.0, 1.0, 0.0, 1.0], Unit::MeterPerSecond))
            .with("v", Quantity::from_vec(vec![0.0; 4], Unit::MeterPerSecond))
            .with("dx", Quantity::scalar(1.0, Unit::Kilometer))
            .with("dy", Quantity::scalar(1000.0, Unit::Meter))
            .with("nx", Quantity::scalar(2.0, Unit::Dimensionless));
        let out = lookup("divergence").unwrap().call(&args).unwrap();
        for value in out.principal().iter() {
            assert!((value - 1e-3).abs() < 1e-12);
        }
    }
}
