//! Closed-form root solvers
//!
//! The quartic solver delegates to the reduced cubic solver for its resolvent cubic,
//! which in turn shares the sign-preserving cube root of [`crate::complex`]. The
//! quartic's two factor quadratics are solved by the quadratic solver.
//!
//! [`cubic_roots`] and [`quartic_roots`] accept an `[N, k]` coefficient matrix and pick
//! the single-equation path for small batches and the batched path otherwise. Both paths
//! produce identical results.

pub mod cubic;
pub mod quadratic;
pub mod quartic;

pub use cubic::{solve_cubic, solve_cubic_batch, solve_cubic_one, CubicTerms, RootClass};
pub use quadratic::{solve_quadratic, solve_quadratic_batch};
pub use quartic::{solve_quartic, solve_quartic_batch, QuarticTerms};

use crate::complex::Complex64;
use crate::errors::RSEBResult;
use crate::polynomial::check_degree;
use crate::FloatValue;
use log::trace;
use ndarray::{aview1, Array2, ArrayView2};

/// Batches smaller than this are solved one equation at a time.
pub const BATCH_THRESHOLD: usize = 100;

/// Solve each row with `single` and stack the results.
fn solve_rows<const K: usize>(
    coefficients: ArrayView2<FloatValue>,
    single: fn(&[FloatValue]) -> RSEBResult<[Complex64; K]>,
) -> RSEBResult<Array2<Complex64>> {
    let mut roots = Array2::zeros((coefficients.nrows(), K));
    for (i, row) in coefficients.outer_iter().enumerate() {
        // Rows of a non-contiguous view are copied before solving
        let values = match row.as_slice() {
            Some(values) => single(values)?,
            None => single(&row.to_vec())?,
        };
        roots.row_mut(i).assign(&aview1(&values));
    }
    Ok(roots)
}

/// Roots of every cubic in an `[N, 4]` coefficient matrix, as an `[N, 3]` matrix.
///
/// # Errors
///
/// Returns [`crate::errors::RSEBError::WrongDegree`] if the matrix does not have four columns.
pub fn cubic_roots(coefficients: ArrayView2<FloatValue>) -> RSEBResult<Array2<Complex64>> {
    check_degree(4, coefficients.ncols())?;
    if coefficients.nrows() < BATCH_THRESHOLD {
        trace!("Solving {} cubics one at a time", coefficients.nrows());
        solve_rows(coefficients, solve_cubic)
    } else {
        trace!("Solving {} cubics as a batch", coefficients.nrows());
        solve_cubic_batch(coefficients)
    }
}

/// Roots of every quartic in an `[N, 5]` coefficient matrix, as an `[N, 4]` matrix.
///
/// # Errors
///
/// Returns [`crate::errors::RSEBError::WrongDegree`] if the matrix does not have five columns.
pub fn quartic_roots(coefficients: ArrayView2<FloatValue>) -> RSEBResult<Array2<Complex64>> {
    check_degree(5, coefficients.ncols())?;
    if coefficients.nrows() < BATCH_THRESHOLD {
        trace!("Solving {} quartics one at a time", coefficients.nrows());
        solve_rows(coefficients, solve_quartic)
    } else {
        trace!("Solving {} quartics as a batch", coefficients.nrows());
        solve_quartic_batch(coefficients)
    }
}
