//! Quartic solver
//!
//! Solves $x^4 + a x^3 + b x^2 + c x + d = 0$ (Ferrari's method).
//!
//! Substituting $x = y - a/4$ removes the cubic term. A single real root $z_0$ of the
//! resolvent cubic
//!
//! $$z^3 + p z^2 + r z + \left(p r - \frac{q^2}{2}\right) = 0$$
//!
//! factors the depressed quartic into two quadratics
//! $y^2 \pm s y + z_0 \pm t$ with $s = \sqrt{2p + 2z_0}$ and $t = -q / s$.
//! When $s = 0$ the second factor is taken from $t = z_0^2 + r$ instead.

use crate::complex::{real, Complex64};
use crate::errors::RSEBResult;
use crate::polynomial::check_degree;
use crate::roots::cubic::{cubic_first_root_batch, CubicTerms};
use crate::roots::quadratic::{quadratic_monic, quadratic_monic_batch};
use crate::FloatValue;
use ndarray::{Array1, Array2, ArrayView2, Zip};

/// Intermediate quantities of the depressed monic quartic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarticTerms {
    /// $a / 4$, the shift back from the depressed variable
    pub shift: FloatValue,
    pub p: FloatValue,
    pub q: FloatValue,
    pub r: FloatValue,
}

impl QuarticTerms {
    pub fn from_monic(a: FloatValue, b: FloatValue, c: FloatValue, d: FloatValue) -> Self {
        let shift = 0.25 * a;
        let a02 = shift * shift;

        let p = 3.0 * a02 - 0.5 * b;
        let q = a * a02 - b * shift + 0.5 * c;
        let r = 3.0 * a02 * a02 - b * a02 + c * shift - d;
        Self { shift, p, q, r }
    }

    /// Normalise `[a0, b0, c0, d0, e0]` by the leading coefficient.
    pub fn from_coefficients(
        a0: FloatValue,
        b0: FloatValue,
        c0: FloatValue,
        d0: FloatValue,
        e0: FloatValue,
    ) -> Self {
        Self::from_monic(b0 / a0, c0 / a0, d0 / a0, e0 / a0)
    }

    /// Constant term of the monic resolvent cubic.
    fn resolvent_constant(&self) -> FloatValue {
        self.p * self.r - 0.5 * self.q * self.q
    }

    /// Terms of the monic resolvent cubic $z^3 + p z^2 + r z + (pr - q^2/2)$.
    pub fn resolvent(&self) -> CubicTerms {
        CubicTerms::from_monic(self.p, self.r, self.resolvent_constant())
    }

    /// $s$ and $t$ of the factorisation, given a real root of the resolvent cubic.
    fn factor_terms(&self, z0: FloatValue) -> (Complex64, Complex64) {
        let s = real(2.0 * self.p + 2.0 * z0).sqrt();
        let t = if s == Complex64::new(0.0, 0.0) {
            real(z0 * z0 + self.r)
        } else {
            real(-self.q) / s
        };
        (s, t)
    }

    /// All four roots.
    pub fn roots(&self) -> [Complex64; 4] {
        let z0 = self.resolvent().first_root();
        let (s, t) = self.factor_terms(z0);
        let shift = real(self.shift);

        let [r0, r1] = quadratic_monic(s, real(z0) + t);
        let [r2, r3] = quadratic_monic(-s, real(z0) - t);
        [r0 - shift, r1 - shift, r2 - shift, r3 - shift]
    }
}

/// Solve $a x^4 + b x^3 + c x^2 + d x + e = 0$.
///
/// # Errors
///
/// Returns [`crate::errors::RSEBError::WrongDegree`] unless exactly five coefficients are given.
pub fn solve_quartic(coefficients: &[FloatValue]) -> RSEBResult<[Complex64; 4]> {
    check_degree(5, coefficients.len())?;
    let terms = QuarticTerms::from_coefficients(
        coefficients[0],
        coefficients[1],
        coefficients[2],
        coefficients[3],
        coefficients[4],
    );
    Ok(terms.roots())
}

/// Solve a batch of quartics given as an `[N, 5]` coefficient matrix.
///
/// The resolvent cubics are solved with the batched reduced cubic solver and the two
/// factor quadratics with the batched quadratic solver. Returns an `[N, 4]` matrix of roots.
pub fn solve_quartic_batch(coefficients: ArrayView2<FloatValue>) -> RSEBResult<Array2<Complex64>> {
    check_degree(5, coefficients.ncols())?;

    let terms: Array1<QuarticTerms> = Zip::from(coefficients.column(0))
        .and(coefficients.column(1))
        .and(coefficients.column(2))
        .and(coefficients.column(3))
        .and(coefficients.column(4))
        .map_collect(|&a0, &b0, &c0, &d0, &e0| {
            QuarticTerms::from_coefficients(a0, b0, c0, d0, e0)
        });

    let p = terms.mapv(|t| t.p);
    let r = terms.mapv(|t| t.r);
    let constant = terms.mapv(|t| t.resolvent_constant());
    let z0 = cubic_first_root_batch(p.view(), r.view(), constant.view());

    let factors = Zip::from(&terms)
        .and(&z0)
        .map_collect(|t, &z0| t.factor_terms(z0));
    let s = factors.mapv(|(s, _)| s);
    let negative_s = factors.mapv(|(s, _)| -s);
    let z0_plus_t = Zip::from(&z0)
        .and(&factors)
        .map_collect(|&z0, &(_, t)| real(z0) + t);
    let z0_minus_t = Zip::from(&z0)
        .and(&factors)
        .map_collect(|&z0, &(_, t)| real(z0) - t);

    let (r0, r1) = quadratic_monic_batch(s.view(), z0_plus_t.view());
    let (r2, r3) = quadratic_monic_batch(negative_s.view(), z0_minus_t.view());

    let shift = terms.mapv(|t| real(t.shift));
    let mut roots = Array2::zeros((terms.len(), 4));
    for (k, column) in [r0, r1, r2, r3].iter().enumerate() {
        roots
            .column_mut(k)
            .assign(&Zip::from(column).and(&shift).map_collect(|&x, &s| x - s));
    }
    Ok(roots)
}
