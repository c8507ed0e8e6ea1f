//! Kinematic fields on a regular grid: vorticity, divergence and advection.
//!
//! Fields arrive as flat arrays in row-major order, `nx` points per row, with
//! `x` increasing along a row and `y` increasing from one row to the next.
//! Derivatives use centred differences inside the grid and one-sided
//! differences on its edges.

use crate::errors::{CalcError, CalcResult};
use crate::function::values_in;
use ndarray::{Array1, Array2, Axis};
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// Regular grid layout and spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Points per row
    pub nx: usize,
    /// Spacing along a row (m)
    pub dx: f64,
    /// Spacing between rows (m)
    pub dy: f64,
}

impl Grid {
    /// Validates the grid against a field length.
    fn shape(&self, len: usize) -> CalcResult<(usize, usize)> {
        if self.nx < 2 || len % self.nx != 0 || len / self.nx < 2 {
            return Err(CalcError::invalid(
                "nx",
                format!(
                    "{} values do not form a grid of at least 2x2 with {} points per row",
                    len, self.nx
                ),
            ));
        }
        if !(self.dx.is_finite() && self.dy.is_finite()) || self.dx == 0.0 || self.dy == 0.0 {
            return Err(CalcError::invalid("dx", "grid spacing must be finite and non-zero"));
        }
        Ok((len / self.nx, self.nx))
    }

    fn reshape(&self, name: &str, field: &Quantity, unit: Unit) -> CalcResult<Array2<f64>> {
        let values = values_in(field, name, unit)?;
        let shape = self.shape(values.len())?;
        values
            .into_shape_with_order(shape)
            .map_err(|e| CalcError::invalid(name, e.to_string()))
    }
}

/// First derivative along `axis` with spacing `delta`.
fn gradient(field: &Array2<f64>, delta: f64, axis: Axis) -> Array2<f64> {
    let mut out = Array2::zeros(field.raw_dim());
    for (lane, mut out_lane) in field.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        let n = lane.len();
        for i in 0..n {
            out_lane[i] = if i == 0 {
                (lane[1] - lane[0]) / delta
            } else if i == n - 1 {
                (lane[n - 1] - lane[n - 2]) / delta
            } else {
                (lane[i + 1] - lane[i - 1]) / (2.0 * delta)
            };
        }
    }
    out
}

fn d_dx(field: &Array2<f64>, grid: &Grid) -> Array2<f64> {
    gradient(field, grid.dx, Axis(1))
}

fn d_dy(field: &Array2<f64>, grid: &Grid) -> Array2<f64> {
    gradient(field, grid.dy, Axis(0))
}

fn flatten(field: Array2<f64>) -> Array1<f64> {
    field.into_iter().collect()
}

fn check_same_len(u: &Array2<f64>, v: &Array2<f64>) -> CalcResult<()> {
    if u.len() != v.len() {
        return Err(CalcError::LengthMismatch(u.len(), v.len()));
    }
    Ok(())
}

/// Vertical vorticity, $\zeta = \partial v/\partial x - \partial u/\partial y$.
pub fn vorticity(u: &Quantity, v: &Quantity, grid: &Grid) -> CalcResult<Quantity> {
    let u = grid.reshape("u", u, Unit::MeterPerSecond)?;
    let v = grid.reshape("v", v, Unit::MeterPerSecond)?;
    check_same_len(&u, &v)?;
    Ok(Quantity::new(
        flatten(d_dx(&v, grid) - d_dy(&u, grid)),
        Unit::PerSecond,
    ))
}

/// Horizontal divergence, $\partial u/\partial x + \partial v/\partial y$.
pub fn divergence(u: &Quantity, v: &Quantity, grid: &Grid) -> CalcResult<Quantity> {
    let u = grid.reshape("u", u, Unit::MeterPerSecond)?;
    let v = grid.reshape("v", v, Unit::MeterPerSecond)?;
    check_same_len(&u, &v)?;
    Ok(Quantity::new(
        flatten(d_dx(&u, grid) + d_dy(&v, grid)),
        Unit::PerSecond,
    ))
}

/// Horizontal temperature advection, $-(u \partial T/\partial x + v \partial T/\partial y)$.
pub fn advection(
    temperature: &Quantity,
    u: &Quantity,
    v: &Quantity,
    grid: &Grid,
) -> CalcResult<Quantity> {
    let t = grid.reshape("temperature", temperature, Unit::Kelvin)?;
    let u = grid.reshape("u", u, Unit::MeterPerSecond)?;
    let v = grid.reshape("v", v, Unit::MeterPerSecond)?;
    check_same_len(&t, &u)?;
    check_same_len(&t, &v)?;
    let tendency = -(&u * &d_dx(&t, grid) + &v * &d_dy(&t, grid));
    Ok(Quantity::new(flatten(tendency), Unit::KelvinPerSecond))
}
