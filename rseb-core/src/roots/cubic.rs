//! Cubic solver
//!
//! Solves $x^3 + a x^2 + b x + c = 0$ via the depressed cubic. With
//!
//! $$f = \frac{b}{3} - \left(\frac{a}{3}\right)^2, \quad
//!   g = \frac{a}{3}\left(2\left(\frac{a}{3}\right)^2 - b\right) + c, \quad
//!   h = \frac{g^2}{4} + f^3$$
//!
//! the roots fall into one of three [`RootClass`]es, each with its own closed form:
//!
//! - $f = g = h = 0$: a triple real root $-\sqrt[3]{c}$
//! - $h \le 0$ and $f < 0$: three distinct real roots from the trigonometric solution
//! - otherwise: one real root and a complex-conjugate pair from Cardano's formula

use crate::complex::{cbrt_signed, cbrt_signed_complex, real, Complex64, ONE_THIRD, SQRT_3};
use crate::errors::RSEBResult;
use crate::polynomial::check_degree;
use crate::FloatValue;
use log::trace;
use ndarray::{aview1, Array1, Array2, ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Which closed-form branch applies to a cubic (or a quartic's resolvent cubic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootClass {
    /// All three roots are real and equal
    AllRealEqual,
    /// All three roots are real and distinct
    AllRealDistinct,
    /// One real root and a complex-conjugate pair
    OneRealTwoComplex,
}

impl RootClass {
    pub const ALL: [RootClass; 3] = [
        RootClass::AllRealEqual,
        RootClass::AllRealDistinct,
        RootClass::OneRealTwoComplex,
    ];

    /// Classify from the depressed-cubic quantities.
    ///
    /// `h` can underflow to zero while `f` is a tiny positive number; such terms are
    /// treated as [`RootClass::OneRealTwoComplex`], whose formula stays finite there.
    /// NaN inputs fall through to [`RootClass::OneRealTwoComplex`] and yield NaN roots.
    pub fn from_terms(f: FloatValue, g: FloatValue, h: FloatValue) -> Self {
        if f == 0.0 && g == 0.0 && h == 0.0 {
            RootClass::AllRealEqual
        } else if h <= 0.0 && f < 0.0 {
            RootClass::AllRealDistinct
        } else {
            RootClass::OneRealTwoComplex
        }
    }
}

/// Intermediate quantities of the depressed monic cubic $x^3 + a x^2 + b x + c$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicTerms {
    /// $a / 3$, the shift back from the depressed variable
    pub a13: FloatValue,
    pub f: FloatValue,
    pub g: FloatValue,
    pub h: FloatValue,
    /// Constant term of the monic cubic
    pub c: FloatValue,
}

impl CubicTerms {
    pub fn from_monic(a: FloatValue, b: FloatValue, c: FloatValue) -> Self {
        let a13 = a / 3.0;
        let a2 = a13 * a13;
        let f = b / 3.0 - a2;
        let g = a13 * (2.0 * a2 - b) + c;
        let h = 0.25 * g * g + f * f * f;
        Self { a13, f, g, h, c }
    }

    /// Normalise `[a0, b0, c0, d0]` by the leading coefficient.
    pub fn from_coefficients(a0: FloatValue, b0: FloatValue, c0: FloatValue, d0: FloatValue) -> Self {
        Self::from_monic(b0 / a0, c0 / a0, d0 / a0)
    }

    pub fn classify(&self) -> RootClass {
        RootClass::from_terms(self.f, self.g, self.h)
    }

    /// All three roots, using the branch selected by [`CubicTerms::classify`].
    pub fn roots(&self) -> [Complex64; 3] {
        self.roots_for(self.classify())
    }

    /// All three roots using the formula of `class`.
    ///
    /// Callers must pass the class of these terms.
    pub(crate) fn roots_for(&self, class: RootClass) -> [Complex64; 3] {
        match class {
            RootClass::AllRealEqual => {
                let r = real(self.equal_root());
                [r, r, r]
            }
            RootClass::AllRealDistinct => {
                let (j, k) = self.trigonometric_terms();
                let m = (ONE_THIRD * k).cos();
                let n = SQRT_3 * (ONE_THIRD * k).sin();
                [
                    real(2.0 * j * m - self.a13),
                    real(-j * (m + n) - self.a13),
                    real(-j * (m - n) - self.a13),
                ]
            }
            RootClass::OneRealTwoComplex => {
                let (s, u) = self.cardano_terms();
                let s_plus_u = s + u;
                let s_minus_u = s - u;
                let shift = real(self.a13);
                let rotation = s_minus_u * Complex64::new(0.0, 0.5 * SQRT_3);
                [
                    s_plus_u - shift,
                    -0.5 * s_plus_u - shift + rotation,
                    -0.5 * s_plus_u - shift - rotation,
                ]
            }
        }
    }

    /// The first root only. Always real.
    ///
    /// Bitwise equal to the real part of `self.roots()[0]`.
    pub fn first_root(&self) -> FloatValue {
        self.first_root_for(self.classify())
    }

    pub(crate) fn first_root_for(&self, class: RootClass) -> FloatValue {
        match class {
            RootClass::AllRealEqual => self.equal_root(),
            RootClass::AllRealDistinct => {
                let (j, k) = self.trigonometric_terms();
                2.0 * j * (ONE_THIRD * k).cos() - self.a13
            }
            RootClass::OneRealTwoComplex => {
                let (s, u) = self.cardano_terms();
                (s + u - real(self.a13)).re
            }
        }
    }

    fn equal_root(&self) -> FloatValue {
        -cbrt_signed(self.c)
    }

    fn trigonometric_terms(&self) -> (FloatValue, FloatValue) {
        let j = (-self.f).sqrt();
        let j3 = j * j * j;
        // j^3 underflows only when g is negligible too
        let ratio = if j3 == 0.0 { 0.0 } else { -0.5 * self.g / j3 };
        // Rounding can push the ratio just outside [-1, 1] next to h = 0
        let k = ratio.clamp(-1.0, 1.0).acos();
        (j, k)
    }

    fn cardano_terms(&self) -> (Complex64, Complex64) {
        let sqrt_h = real(self.h).sqrt();
        let half_g = real(-0.5 * self.g);
        (
            cbrt_signed_complex(half_g + sqrt_h),
            cbrt_signed_complex(half_g - sqrt_h),
        )
    }
}

/// Solve $a x^3 + b x^2 + c x + d = 0$.
///
/// # Errors
///
/// Returns [`crate::errors::RSEBError::WrongDegree`] unless exactly four coefficients are given.
pub fn solve_cubic(coefficients: &[FloatValue]) -> RSEBResult<[Complex64; 3]> {
    check_degree(4, coefficients.len())?;
    let terms = CubicTerms::from_coefficients(
        coefficients[0],
        coefficients[1],
        coefficients[2],
        coefficients[3],
    );
    Ok(terms.roots())
}

/// Solve a cubic for its first real root only.
pub fn solve_cubic_one(coefficients: &[FloatValue]) -> RSEBResult<FloatValue> {
    check_degree(4, coefficients.len())?;
    let terms = CubicTerms::from_coefficients(
        coefficients[0],
        coefficients[1],
        coefficients[2],
        coefficients[3],
    );
    Ok(terms.first_root())
}

/// Compute the depressed-cubic terms for every row of an `[N, 4]` coefficient matrix.
fn batch_terms(coefficients: ArrayView2<FloatValue>) -> Array1<CubicTerms> {
    Zip::from(coefficients.column(0))
        .and(coefficients.column(1))
        .and(coefficients.column(2))
        .and(coefficients.column(3))
        .map_collect(|&a0, &b0, &c0, &d0| CubicTerms::from_coefficients(a0, b0, c0, d0))
}

/// Row indices for each [`RootClass`], in the order of [`RootClass::ALL`].
fn class_indices(terms: &Array1<CubicTerms>) -> [Vec<usize>; 3] {
    let mut indices: [Vec<usize>; 3] = Default::default();
    for (i, t) in terms.iter().enumerate() {
        let slot = match t.classify() {
            RootClass::AllRealEqual => 0,
            RootClass::AllRealDistinct => 1,
            RootClass::OneRealTwoComplex => 2,
        };
        indices[slot].push(i);
    }
    trace!(
        "Cubic batch of {}: {} equal, {} distinct, {} complex",
        terms.len(),
        indices[0].len(),
        indices[1].len(),
        indices[2].len()
    );
    indices
}

/// Solve a batch of cubics given as an `[N, 4]` coefficient matrix.
///
/// Rows are classified first and each class is then evaluated with the scalar formula
/// for that class. Returns an `[N, 3]` matrix of roots.
pub fn solve_cubic_batch(coefficients: ArrayView2<FloatValue>) -> RSEBResult<Array2<Complex64>> {
    check_degree(4, coefficients.ncols())?;
    let terms = batch_terms(coefficients);

    let mut roots = Array2::zeros((terms.len(), 3));
    for (class, rows) in RootClass::ALL.iter().zip(class_indices(&terms)) {
        for i in rows {
            let values = terms[i].roots_for(*class);
            roots.row_mut(i).assign(&aview1(&values));
        }
    }
    Ok(roots)
}

/// First real root of each monic cubic $x^3 + a_i x^2 + b_i x + c_i$.
///
/// This is the reduced batched form used for the resolvent cubic of the quartic solver.
pub fn cubic_first_root_batch(
    a: ArrayView1<FloatValue>,
    b: ArrayView1<FloatValue>,
    c: ArrayView1<FloatValue>,
) -> Array1<FloatValue> {
    let terms = Zip::from(a)
        .and(b)
        .and(c)
        .map_collect(|&a, &b, &c| CubicTerms::from_monic(a, b, c));

    let mut roots = Array1::zeros(terms.len());
    for (class, rows) in RootClass::ALL.iter().zip(class_indices(&terms)) {
        for i in rows {
            roots[i] = terms[i].first_root_for(*class);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Cubic;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sorted_real_parts(roots: &[Complex64]) -> Vec<f64> {
        let mut values: Vec<f64> = roots.iter().map(|r| r.re).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    fn random_cubics(n: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::from_shape_fn((n, 4), |(_, j)| {
            if j == 0 {
                let magnitude: f64 = rng.random_range(0.5..5.0);
                if rng.random_bool(0.5) {
                    magnitude
                } else {
                    -magnitude
                }
            } else {
                rng.random_range(-10.0..10.0)
            }
        })
    }

    #[test]
    fn test_three_distinct_real_roots() {
        // (x - 1)(x - 2)(x - 3)
        let coefficients = [1.0, -6.0, 11.0, -6.0];
        let terms = CubicTerms::from_coefficients(1.0, -6.0, 11.0, -6.0);
        assert_eq!(terms.classify(), RootClass::AllRealDistinct);

        let roots = solve_cubic(&coefficients).unwrap();
        for (got, expected) in sorted_real_parts(&roots).iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - expected).abs() < 1e-12, "got {}", got);
        }
        assert!(roots.iter().all(|r| r.im == 0.0));
    }

    #[test]
    fn test_triple_root() {
        // (x - 2)^3
        let terms = CubicTerms::from_coefficients(1.0, -6.0, 12.0, -8.0);
        assert_eq!(terms.classify(), RootClass::AllRealEqual);
        let roots = terms.roots();
        for r in roots {
            assert_eq!(r, real(2.0));
        }

        let roots = solve_cubic(&[2.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(roots, [real(0.0); 3]);
    }

    #[test]
    fn test_one_real_two_complex() {
        // (x - 1)(x^2 + 1)
        let terms = CubicTerms::from_coefficients(1.0, -1.0, 1.0, -1.0);
        assert_eq!(terms.classify(), RootClass::OneRealTwoComplex);

        let roots = terms.roots();
        assert!((roots[0] - real(1.0)).norm() < 1e-12, "got {}", roots[0]);
        assert!((roots[1] - roots[2].conj()).norm() < 1e-12);
        assert!((roots[1].im.abs() - 1.0).abs() < 1e-12);
        assert!(roots[1].re.abs() < 1e-12);
    }

    #[test]
    fn test_negative_real_root_uses_signed_branch() {
        // (x + 2)(x^2 + 1) = x^3 + 2x^2 + x + 2
        let roots = solve_cubic(&[1.0, 2.0, 1.0, 2.0]).unwrap();
        assert!((roots[0] - real(-2.0)).norm() < 1e-12, "got {}", roots[0]);
    }

    #[test]
    fn test_first_root_matches_full_form() {
        let coefficients = random_cubics(200, 7);
        for row in coefficients.outer_iter() {
            let row = row.as_slice().unwrap();
            let full = solve_cubic(row).unwrap();
            let one = solve_cubic_one(row).unwrap();
            assert_eq!(one, full[0].re);
        }
    }

    #[test]
    fn test_random_residuals() {
        let coefficients = random_cubics(500, 42);
        for row in coefficients.outer_iter() {
            let polynomial = Cubic::from_slice(row.as_slice().unwrap()).unwrap();
            let scale: f64 = polynomial.coefficients().iter().map(|c| c.abs()).sum();
            for r in solve_cubic(polynomial.coefficients()).unwrap() {
                let magnitude = r.norm().max(1.0).powi(3);
                let residual = polynomial.evaluate(r).norm();
                assert!(
                    residual <= 1e-8 * scale * magnitude,
                    "residual {} for root {} of {:?}",
                    residual,
                    r,
                    polynomial
                );
            }
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let mut coefficients = random_cubics(150, 3);
        // Make sure every class appears in the batch
        coefficients.row_mut(0).assign(&array![1.0, -6.0, 12.0, -8.0]);
        coefficients.row_mut(1).assign(&array![1.0, -6.0, 11.0, -6.0]);
        coefficients.row_mut(2).assign(&array![1.0, -1.0, 1.0, -1.0]);

        let batch = solve_cubic_batch(coefficients.view()).unwrap();
        assert_eq!(batch.dim(), (150, 3));
        for (i, row) in coefficients.outer_iter().enumerate() {
            let single = solve_cubic(row.as_slice().unwrap()).unwrap();
            for k in 0..3 {
                assert_eq!(batch[[i, k]], single[k], "row {} root {}", i, k);
            }
        }

        let a = coefficients.column(1).to_owned() / &coefficients.column(0);
        let b = coefficients.column(2).to_owned() / &coefficients.column(0);
        let c = coefficients.column(3).to_owned() / &coefficients.column(0);
        let first = cubic_first_root_batch(a.view(), b.view(), c.view());
        for i in 0..150 {
            assert_eq!(first[i], batch[[i, 0]].re);
        }
    }

    #[test]
    fn test_classification_boundary_is_continuous() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2 sits exactly on h = 0
        let at_boundary = CubicTerms::from_monic(0.0, -3.0, 2.0);
        assert_eq!(at_boundary.h, 0.0);
        assert_eq!(at_boundary.classify(), RootClass::AllRealDistinct);
        let reference = at_boundary.roots();

        for delta in [1e-6, 1e-8, 1e-10] {
            let above = CubicTerms::from_monic(0.0, -3.0, 2.0 + delta);
            let below = CubicTerms::from_monic(0.0, -3.0, 2.0 - delta);
            assert_eq!(above.classify(), RootClass::OneRealTwoComplex);
            assert_eq!(below.classify(), RootClass::AllRealDistinct);

            for side in [above.roots(), below.roots()] {
                for expected in reference {
                    let nearest = side
                        .iter()
                        .map(|r| (r - expected).norm())
                        .fold(f64::INFINITY, f64::min);
                    assert!(
                        nearest < 10.0 * delta.sqrt(),
                        "delta {}: {} not near {:?}",
                        delta,
                        expected,
                        side
                    );
                }
            }
        }
    }

    #[test]
    fn test_underflowing_discriminant_stays_finite() {
        // x^3 + 3e-110 x has roots 0 and +/- i sqrt(3e-110), but f^3 underflows so h == 0
        let terms = CubicTerms::from_coefficients(1.0, 0.0, 3e-110, 0.0);
        assert_eq!(terms.h, 0.0);
        assert!(terms.f > 0.0);
        assert_eq!(terms.classify(), RootClass::OneRealTwoComplex);

        let polynomial = Cubic::new([1.0, 0.0, 3e-110, 0.0]);
        let roots = solve_cubic(polynomial.coefficients()).unwrap();
        for r in roots {
            assert!(r.re.is_finite() && r.im.is_finite(), "got {:?}", roots);
            assert!(r.norm() < 1e-50, "got {:?}", roots);
            assert!(polynomial.evaluate(r).norm() < 1e-100);
        }
        assert!(solve_cubic_one(polynomial.coefficients()).unwrap().is_finite());

        // Negative f whose cube underflows takes the trigonometric branch
        let terms = CubicTerms::from_coefficients(1.0, 0.0, -3e-220, 0.0);
        assert_eq!(terms.classify(), RootClass::AllRealDistinct);
        for r in terms.roots() {
            assert!(r.re.is_finite() && r.re.abs() < 1e-100, "got {}", r);
        }

        let batch = solve_cubic_batch(
            array![[1.0, 0.0, 3e-110, 0.0], [1.0, 0.0, -3e-220, 0.0]].view(),
        )
        .unwrap();
        assert!(batch.iter().all(|r| r.re.is_finite() && r.im.is_finite()));
    }

    #[test]
    fn test_nan_coefficients_give_nan_roots() {
        let roots = solve_cubic(&[1.0, f64::NAN, 0.0, 1.0]).unwrap();
        assert!(roots.iter().all(|r| r.re.is_nan()));
        assert!(solve_cubic_one(&[1.0, 0.0, 0.0, f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_wrong_degree() {
        assert!(solve_cubic(&[1.0, 2.0, 3.0]).is_err());
        assert!(solve_cubic_one(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
        let coefficients = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        assert!(solve_cubic_batch(coefficients.view()).is_err());
    }
}
