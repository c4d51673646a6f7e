//! Fixed-degree polynomials with real coefficients.

use crate::complex::Complex64;
use crate::errors::{RSEBError, RSEBResult};
use crate::FloatValue;

/// A polynomial with `N` real coefficients, highest power first.
///
/// The leading coefficient must be non-zero; this is a contract of the caller
/// and is not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polynomial<const N: usize> {
    coefficients: [FloatValue; N],
}

/// $a x^2 + b x + c$
pub type Quadratic = Polynomial<3>;
/// $a x^3 + b x^2 + c x + d$
pub type Cubic = Polynomial<4>;
/// $a x^4 + b x^3 + c x^2 + d x + e$
pub type Quartic = Polynomial<5>;

/// Name of the polynomial order with `n_coefficients` coefficients, used in error messages.
pub(crate) fn order_name(n_coefficients: usize) -> &'static str {
    match n_coefficients {
        3 => "2nd",
        4 => "3rd",
        5 => "4th",
        _ => "unsupported",
    }
}

/// Check that a coefficient count matches the expected count for a polynomial order.
///
/// The degree is never inferred from trailing zeros.
pub(crate) fn check_degree(expected: usize, got: usize) -> RSEBResult<()> {
    if expected != got {
        return Err(RSEBError::WrongDegree {
            order: order_name(expected),
            expected,
            got,
        });
    }
    Ok(())
}

impl<const N: usize> Polynomial<N> {
    pub fn new(coefficients: [FloatValue; N]) -> Self {
        Self { coefficients }
    }

    /// Build a polynomial from a slice, failing if the slice is not exactly `N` long.
    pub fn from_slice(coefficients: &[FloatValue]) -> RSEBResult<Self> {
        check_degree(N, coefficients.len())?;
        let mut values = [0.0; N];
        values.copy_from_slice(coefficients);
        Ok(Self::new(values))
    }

    pub fn coefficients(&self) -> &[FloatValue; N] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        N - 1
    }

    /// Evaluate the polynomial at a complex point using Horner's scheme.
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        self.coefficients
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    }

    pub fn has_nan(&self) -> bool {
        self.coefficients.iter().any(|c| c.is_nan())
    }

    /// Copy of this polynomial with every NaN coefficient replaced by zero.
    pub fn sanitised(&self) -> Self {
        Self::new(self.coefficients.map(|c| if c.is_nan() { 0.0 } else { c }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::real;

    #[test]
    fn test_from_slice_wrong_length() {
        let err = Quartic::from_slice(&[1.0, 0.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected 4th order polynomial with 5 coefficients, got 4"
        );

        // Trailing zeros are not stripped to guess a lower degree
        let err = Cubic::from_slice(&[1.0, 2.0, 3.0, 4.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            RSEBError::WrongDegree {
                expected: 4,
                got: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_evaluate() {
        // (x - 1)(x - 2) = x^2 - 3x + 2
        let p = Quadratic::new([1.0, -3.0, 2.0]);
        assert_eq!(p.evaluate(real(1.0)), real(0.0));
        assert_eq!(p.evaluate(real(2.0)), real(0.0));
        assert_eq!(p.evaluate(real(0.0)), real(2.0));

        // x^2 + 1 vanishes at i
        let p = Quadratic::new([1.0, 0.0, 1.0]);
        assert!(p.evaluate(Complex64::new(0.0, 1.0)).norm() < 1e-15);
    }

    #[test]
    fn test_sanitised() {
        let p = Quartic::new([1.0, 0.0, 0.0, 1.0, f64::NAN]);
        assert!(p.has_nan());
        let clean = p.sanitised();
        assert!(!clean.has_nan());
        assert_eq!(clean.coefficients(), &[1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(clean.degree(), 4);
    }
}
