//! Lifted-parcel calculations.
//!
//! # What This Module Does
//!
//! 1. Finds the lifting condensation level (LCL) by fixed-point iteration on
//!    the pressure at which a dry-adiabatically lifted parcel saturates.
//!
//! 2. Integrates the moist (pseudo-)adiabat with a fourth-order Runge-Kutta
//!    scheme in $\ln p$:
//!    $$\frac{dT}{d\ln p} = \frac{R_d T + L_v r_s}{C_{pd} + \frac{L_v^2 r_s \epsilon}{R_d T^2}}$$
//!
//! 3. Combines both into a parcel profile, wet-bulb temperature, and
//!    convective available potential energy (CAPE) and inhibition (CIN).
//!
//! Pressures are handled in hPa and temperatures in K throughout.

use crate::constants::{CP_D, EPSILON, KAPPA, LV, RD};
use crate::elementwise::{broadcast_len, try_zip_map};
use crate::errors::{CalcError, CalcResult};
use crate::function::{scalar_in, values_in};
use crate::moisture::{
    dewpoint_kelvin, mixing_ratio_value, saturation_mixing_ratio_value,
    saturation_vapor_pressure_hpa, vapor_pressure_value,
};
use log::debug;
use ndarray::Array1;
use ode_solvers::{Rk4, System, Vector1};
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Maximum fixed-point iterations when solving for the LCL
const LCL_MAX_ITERATIONS: usize = 50;

/// LCL convergence tolerance (hPa)
const LCL_TOLERANCE: f64 = 1e-6;

/// Largest RK4 step in ln(p)
const MAX_LN_P_STEP: f64 = 0.01;

type State = Vector1<f64>;

/// Right-hand side of the moist adiabat, with ln(p in hPa) as the independent variable.
struct MoistAdiabat;

impl System<f64, State> for MoistAdiabat {
    fn system(&self, ln_p: f64, y: &State, dy: &mut State) {
        let t = y[0];
        let rs = saturation_mixing_ratio_value(ln_p.exp(), t);
        dy[0] = (RD * t + LV * rs) / (CP_D + LV * LV * rs * EPSILON / (RD * t * t));
    }
}

/// Follows the moist adiabat from `(p_start, t_start)` to `p_end`.
fn moist_step(p_start: f64, t_start: f64, p_end: f64) -> CalcResult<f64> {
    if p_start == p_end || t_start.is_nan() {
        return Ok(t_start);
    }
    let (x0, x1) = (p_start.ln(), p_end.ln());
    let steps = ((x1 - x0).abs() / MAX_LN_P_STEP).ceil().max(1.0);
    // Slightly enlarged so the fixed-step solver does not add a sliver step at the end.
    let step = (x1 - x0) / steps * (1.0 + 1e-12);

    let mut solver = Rk4::new(MoistAdiabat, x0, State::new(t_start), x1, step);
    solver
        .integrate()
        .map_err(|e| CalcError::Integration(format!("{e:?}")))?;
    let (_, states) = solver.results().get();
    states
        .last()
        .map(|y| y[0])
        .ok_or_else(|| CalcError::Integration("solver produced no output".to_string()))
}

/// Temperatures along the moist adiabat through `(p_ref, t_ref)` at each pressure.
fn moist_profile(pressures: &[f64], p_ref: f64, t_ref: f64) -> CalcResult<Vec<f64>> {
    let mut out = Vec::with_capacity(pressures.len());
    let (mut p_prev, mut t_prev) = (p_ref, t_ref);
    for &p in pressures {
        if p.is_nan() {
            out.push(f64::NAN);
            continue;
        }
        t_prev = moist_step(p_prev, t_prev, p)?;
        p_prev = p;
        out.push(t_prev);
    }
    Ok(out)
}

/// LCL pressure and temperature for a parcel at `(p, t, td)`.
pub(crate) fn lcl_point(p: f64, t: f64, td: f64) -> CalcResult<(f64, f64)> {
    if p.is_nan() || t.is_nan() || td.is_nan() {
        return Ok((f64::NAN, f64::NAN));
    }
    if p <= 0.0 {
        return Err(CalcError::invalid("pressure", "must be positive"));
    }
    if td >= t {
        return Ok((p, t));
    }
    let w = mixing_ratio_value(saturation_vapor_pressure_hpa(td), p);
    let mut p_lcl = p;
    for _ in 0..LCL_MAX_ITERATIONS {
        let td_lcl = dewpoint_kelvin(vapor_pressure_value(p_lcl, w));
        let p_next = p * (td_lcl / t).powf(1.0 / KAPPA);
        if (p_next - p_lcl).abs() < LCL_TOLERANCE {
            return Ok((p_next, dewpoint_kelvin(vapor_pressure_value(p_next, w))));
        }
        p_lcl = p_next;
    }
    Err(CalcError::DidNotConverge("lcl", LCL_MAX_ITERATIONS))
}

/// Lifting condensation level.
///
/// Returns the LCL pressure (hPa) and temperature (K), element-wise.
pub fn lcl(
    pressure: &Quantity,
    temperature: &Quantity,
    dewpoint: &Quantity,
) -> CalcResult<(Quantity, Quantity)> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    let len = broadcast_len(&[&p, &t, &td])?;

    let mut p_lcl = Array1::zeros(len);
    let mut t_lcl = Array1::zeros(len);
    for i in 0..len {
        let at = |a: &Array1<f64>| if a.len() == 1 { a[0] } else { a[i] };
        let (pl, tl) = lcl_point(at(&p), at(&t), at(&td))?;
        p_lcl[i] = pl;
        t_lcl[i] = tl;
    }
    Ok((
        Quantity::new(p_lcl, Unit::Hectopascal),
        Quantity::new(t_lcl, Unit::Kelvin),
    ))
}

/// Temperature of a saturated parcel lifted moist-adiabatically.
///
/// `temperature` is the single starting temperature at `reference_pressure`,
/// which defaults to the first pressure.
pub fn moist_lapse(
    pressure: &Quantity,
    temperature: &Quantity,
    reference_pressure: Option<&Quantity>,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t0 = scalar_in(temperature, "temperature", Unit::Kelvin)?;
    let p_ref = match reference_pressure {
        Some(reference) => scalar_in(reference, "reference_pressure", Unit::Hectopascal)?,
        None => *p
            .first()
            .ok_or(CalcError::InsufficientProfile { required: 1, found: 0 })?,
    };
    let levels = p.to_vec();
    Ok(Quantity::from_vec(
        moist_profile(&levels, p_ref, t0)?,
        Unit::Kelvin,
    ))
}

fn check_decreasing(p: &Array1<f64>) -> CalcResult<()> {
    if p.iter().any(|v| v.is_nan()) {
        return Err(CalcError::invalid("pressure", "contains missing values"));
    }
    if p.windows(2).into_iter().any(|w| w[1] > w[0]) {
        return Err(CalcError::NonMonotonic);
    }
    Ok(())
}

/// Temperature of a parcel lifted from the first level of a sounding.
///
/// The parcel follows the dry adiabat up to its LCL and the moist adiabat
/// above it. Only the first values of `temperature` and `dewpoint` are used.
pub fn parcel_profile(
    pressure: &Quantity,
    temperature: &Quantity,
    dewpoint: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    check_decreasing(&p)?;

    let (Some(&p0), Some(&t0), Some(&td0)) = (p.first(), t.first(), td.first()) else {
        return Err(CalcError::InsufficientProfile {
            required: 1,
            found: 0,
        });
    };
    if t0.is_nan() || td0.is_nan() {
        return Err(CalcError::invalid(
            "temperature",
            "surface temperature and dewpoint must be present",
        ));
    }

    let (p_lcl, t_lcl) = lcl_point(p0, t0, td0)?;
    let split = p.iter().take_while(|&&level| level >= p_lcl).count();

    let mut profile: Vec<f64> = p
        .iter()
        .take(split)
        .map(|&level| t0 * (level / p0).powf(KAPPA))
        .collect();
    let upper: Vec<f64> = p.iter().skip(split).copied().collect();
    profile.extend(moist_profile(&upper, p_lcl, t_lcl)?);

    Ok(Quantity::from_vec(profile, Unit::Kelvin))
}

/// Wet-bulb temperature, element-wise.
///
/// Each parcel is lifted to its LCL and brought back down the moist adiabat.
pub fn wet_bulb_temperature(
    pressure: &Quantity,
    temperature: &Quantity,
    dewpoint: &Quantity,
) -> CalcResult<Quantity> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    let wet_bulb = try_zip_map([&p, &t, &td], |[p, t, td]| {
        let (p_lcl, t_lcl) = lcl_point(p, t, td)?;
        if p_lcl.is_nan() {
            return Ok(f64::NAN);
        }
        moist_step(p_lcl, t_lcl, p)
    })?;
    Ok(Quantity::new(wet_bulb, Unit::Kelvin))
}

/// Parcel-minus-environment profile in ln(p) with zero crossings inserted.
fn with_zero_crossings(ln_p: &[f64], diff: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut x = vec![ln_p[0]];
    let mut y = vec![diff[0]];
    for i in 1..ln_p.len() {
        let (y0, y1) = (diff[i - 1], diff[i]);
        if y0 * y1 < 0.0 {
            let frac = y0 / (y0 - y1);
            x.push(ln_p[i - 1] + frac * (ln_p[i] - ln_p[i - 1]));
            y.push(0.0);
        }
        x.push(ln_p[i]);
        y.push(y1);
    }
    (x, y)
}

/// Trapezoidal area under `y` between `x_lo` and `x_hi`, for decreasing `x`.
fn area_between(x: &[f64], y: &[f64], x_hi: f64, x_lo: f64) -> f64 {
    let interpolate = |i: usize, at: f64| {
        let (xa, xb) = (x[i], x[i + 1]);
        if xa == xb {
            y[i]
        } else {
            y[i] + (at - xa) / (xb - xa) * (y[i + 1] - y[i])
        }
    };
    (0..x.len().saturating_sub(1))
        .map(|i| {
            let top = x[i + 1].max(x_lo);
            let bottom = x[i].min(x_hi);
            if bottom <= top {
                0.0
            } else {
                0.5 * (interpolate(i, bottom) + interpolate(i, top)) * (bottom - top)
            }
        })
        .sum()
}

/// Convective available potential energy and convective inhibition.
///
/// CAPE is integrated between the level of free convection (LFC) and the
/// equilibrium level (EL); CIN between the surface and the LFC. Without an
/// LFC both are zero.
///
/// $$ \text{CAPE} = R_d \int_{EL}^{LFC} (T_{parcel} - T_{env})\, d\ln p $$
pub fn cape_cin(
    pressure: &Quantity,
    temperature: &Quantity,
    dewpoint: &Quantity,
    parcel_profile: &Quantity,
) -> CalcResult<(Quantity, Quantity)> {
    let p = values_in(pressure, "pressure", Unit::Hectopascal)?;
    let t = values_in(temperature, "temperature", Unit::Kelvin)?;
    let td = values_in(dewpoint, "dewpoint", Unit::Kelvin)?;
    let parcel = values_in(parcel_profile, "parcel_profile", Unit::Kelvin)?;

    if p.len() < 2 {
        return Err(CalcError::InsufficientProfile {
            required: 2,
            found: p.len(),
        });
    }
    for other in [&t, &parcel] {
        if other.len() != p.len() {
            return Err(CalcError::LengthMismatch(p.len(), other.len()));
        }
    }
    check_decreasing(&p)?;
    if t.iter().chain(parcel.iter()).any(|v| v.is_nan()) {
        return Err(CalcError::invalid(
            "temperature",
            "profile contains missing values",
        ));
    }

    let td0 = td.first().copied().unwrap_or(f64::NAN);
    let (p_lcl, _) = lcl_point(p[0], t[0], td0)?;
    let ln_p: Vec<f64> = p.iter().map(|v| v.ln()).collect();
    let diff: Vec<f64> = parcel.iter().zip(t.iter()).map(|(a, b)| a - b).collect();
    let (x, y) = with_zero_crossings(&ln_p, &diff);
    let x_lcl = if p_lcl.is_nan() { x[0] } else { p_lcl.ln() };

    let zero = |v: f64| Quantity::scalar(v, Unit::JoulePerKilogram);

    // First positively buoyant point at or above the LCL
    let Some(j) = (0..x.len()).find(|&i| x[i] <= x_lcl && y[i] > 0.0) else {
        debug!("cape_cin: no level of free convection");
        return Ok((zero(0.0), zero(0.0)));
    };
    let x_lfc = match j {
        0 => x[0],
        _ if y[j - 1] <= 0.0 => x[j - 1],
        _ => x_lcl,
    };

    // Top of the last positively buoyant layer
    let x_el = (j + 1..x.len())
        .rev()
        .find(|&i| y[i - 1] > 0.0 && y[i] <= 0.0)
        .map_or(x[x.len() - 1], |i| x[i]);

    let cape = (RD * area_between(&x, &y, x_lfc, x_el)).max(0.0);
    let cin = (RD * area_between(&x, &y, x[0], x_lfc)).min(0.0);
    Ok((zero(cape), zero(cin)))
}
