//! Physical constants, in SI units unless stated otherwise.
//!
//! Values follow the conventions of common meteorological toolkits so that
//! results are directly comparable.

/// Molar gas constant (J/(mol K))
pub const R: f64 = 8.314462618;

/// Molecular weight of dry air (kg/mol)
pub const DRY_AIR_MOLECULAR_WEIGHT: f64 = 0.02896546;

/// Molecular weight of water (kg/mol)
pub const WATER_MOLECULAR_WEIGHT: f64 = 0.018015268;

/// Gas constant of dry air (J/(kg K))
pub const RD: f64 = R / DRY_AIR_MOLECULAR_WEIGHT;

/// Gas constant of water vapour (J/(kg K))
pub const RV: f64 = R / WATER_MOLECULAR_WEIGHT;

/// Ratio of the molecular weights of water and dry air
pub const EPSILON: f64 = WATER_MOLECULAR_WEIGHT / DRY_AIR_MOLECULAR_WEIGHT;

/// Specific heat of dry air at constant pressure (J/(kg K))
pub const CP_D: f64 = 3.5 * RD;

/// Poisson constant, `Rd / Cp_d`
pub const KAPPA: f64 = RD / CP_D;

/// Latent heat of vaporization (J/kg)
pub const LV: f64 = 2.50084e6;

/// Standard gravity (m/s^2)
pub const G: f64 = 9.80665;

/// Mean Earth radius (m)
pub const EARTH_RADIUS: f64 = 6_371_008.7714;

/// Kelvin value of 0 degC
pub const ZERO_CELSIUS: f64 = 273.15;

/// Saturation vapour pressure at 0 degC (hPa), Bolton (1980)
pub const SAT_PRESSURE_0C: f64 = 6.112;

/// U.S. Standard Atmosphere surface temperature (K)
pub const STD_SURFACE_TEMPERATURE: f64 = 288.0;

/// U.S. Standard Atmosphere surface pressure (hPa)
pub const STD_SURFACE_PRESSURE: f64 = 1013.25;

/// U.S. Standard Atmosphere tropospheric lapse rate (K/m)
pub const STD_LAPSE_RATE: f64 = 6.5e-3;

/// Reference pressure for potential temperature (hPa)
pub const P0: f64 = 1000.0;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_constants() {
        assert_relative_eq!(RD, 287.047_490_977, max_relative = 1e-9);
        assert_relative_eq!(RV, 461.523_115_726, max_relative = 1e-9);
        assert_relative_eq!(EPSILON, 0.621_956_910, max_relative = 1e-8);
        assert_relative_eq!(KAPPA, 2.0 / 7.0, max_relative = 1e-12);
    }
}
