//! Quadratic solver
//!
//! Solves $x^2 + b' x + c' = 0$ with
//!
//! $$r = -\frac{b'}{2} \pm \sqrt{\left(\frac{b'}{2}\right)^2 - c'}$$
//!
//! The square root is taken over the complex domain, so negative discriminants and
//! complex coefficients (as produced by the quartic solver) need no special case.

use crate::complex::{real, Complex64};
use crate::errors::RSEBResult;
use crate::polynomial::check_degree;
use crate::FloatValue;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Roots of the monic quadratic $x^2 + b x + c$.
pub fn quadratic_monic(b: Complex64, c: Complex64) -> [Complex64; 2] {
    let half_b = -0.5 * b;
    let sqrt_delta = (half_b * half_b - c).sqrt();
    [half_b - sqrt_delta, half_b + sqrt_delta]
}

/// Elementwise roots of the monic quadratics $x^2 + b_i x + c_i$.
///
/// Returns the two root arrays, each with the same length as the inputs.
pub fn quadratic_monic_batch(
    b: ArrayView1<Complex64>,
    c: ArrayView1<Complex64>,
) -> (Array1<Complex64>, Array1<Complex64>) {
    let half_b = b.mapv(|b| -0.5 * b);
    let sqrt_delta = Zip::from(&half_b)
        .and(&c)
        .map_collect(|&half_b, &c| (half_b * half_b - c).sqrt());

    let lower = Zip::from(&half_b)
        .and(&sqrt_delta)
        .map_collect(|&h, &s| h - s);
    let upper = Zip::from(&half_b)
        .and(&sqrt_delta)
        .map_collect(|&h, &s| h + s);
    (lower, upper)
}

/// Solve $a x^2 + b x + c = 0$.
///
/// # Errors
///
/// Returns [`crate::errors::RSEBError::WrongDegree`] unless exactly three coefficients are given.
pub fn solve_quadratic(coefficients: &[FloatValue]) -> RSEBResult<[Complex64; 2]> {
    check_degree(3, coefficients.len())?;
    let a = coefficients[0];
    Ok(quadratic_monic(
        real(coefficients[1] / a),
        real(coefficients[2] / a),
    ))
}

/// Solve a batch of quadratics given as an `[N, 3]` coefficient matrix.
///
/// Returns an `[N, 2]` matrix of roots.
pub fn solve_quadratic_batch(coefficients: ArrayView2<FloatValue>) -> RSEBResult<Array2<Complex64>> {
    check_degree(3, coefficients.ncols())?;
    let a = coefficients.column(0);
    let b = Zip::from(coefficients.column(1))
        .and(&a)
        .map_collect(|&b, &a| real(b / a));
    let c = Zip::from(coefficients.column(2))
        .and(&a)
        .map_collect(|&c, &a| real(c / a));

    let (lower, upper) = quadratic_monic_batch(b.view(), c.view());

    let mut roots = Array2::zeros((coefficients.nrows(), 2));
    roots.column_mut(0).assign(&lower);
    roots.column_mut(1).assign(&upper);
    Ok(roots)
}
