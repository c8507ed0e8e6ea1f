//! Broadcasting element-wise evaluation over plain arrays.
//!
//! Arguments must either share a length or have a single element, which is
//! repeated.

use crate::errors::{CalcError, CalcResult};
use ndarray::Array1;

/// Common length of the inputs under length-1 broadcasting.
pub(crate) fn broadcast_len(inputs: &[&Array1<f64>]) -> CalcResult<usize> {
    let mut len = 1;
    for input in inputs {
        match (len, input.len()) {
            (_, 1) => {}
            (1, n) => len = n,
            (current, n) if current == n => {}
            (current, n) => return Err(CalcError::LengthMismatch(current, n)),
        }
    }
    Ok(len)
}

/// Evaluates `f` element-wise over `N` broadcast inputs.
pub(crate) fn zip_map<const N: usize>(
    inputs: [&Array1<f64>; N],
    f: impl Fn([f64; N]) -> f64,
) -> CalcResult<Array1<f64>> {
    let len = broadcast_len(&inputs)?;
    Ok(Array1::from_shape_fn(len, |i| {
        f(std::array::from_fn(|k| element(inputs[k], i)))
    }))
}

/// Fallible variant of [`zip_map`]. Stops at the first error.
pub(crate) fn try_zip_map<const N: usize>(
    inputs: [&Array1<f64>; N],
    f: impl Fn([f64; N]) -> CalcResult<f64>,
) -> CalcResult<Array1<f64>> {
    let len = broadcast_len(&inputs)?;
    (0..len)
        .map(|i| f(std::array::from_fn(|k| element(inputs[k], i))))
        .collect::<CalcResult<Vec<f64>>>()
        .map(Array1::from_vec)
}

fn element(values: &Array1<f64>, i: usize) -> f64 {
    if values.len() == 1 {
        values[0]
    } else {
        values[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_broadcast_scalar() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![10.0];
        let out = zip_map([&a, &b], |[x, y]| x + y).unwrap();
        assert_eq!(out, array![11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 2.0];
        assert_eq!(
            zip_map([&a, &b], |[x, y]| x * y),
            Err(CalcError::LengthMismatch(3, 2))
        );
    }

    #[test]
    fn test_try_zip_map_propagates() {
        let a = array![1.0, -1.0];
        let result = try_zip_map([&a], |[x]| {
            if x < 0.0 {
                Err(CalcError::NonMonotonic)
            } else {
                Ok(x)
            }
        });
        assert_eq!(result, Err(CalcError::NonMonotonic));
    }
}
