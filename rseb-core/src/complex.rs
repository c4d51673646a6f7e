//! Complex number helpers shared by all solvers.
//!
//! Roots are represented as [`Complex64`] values (a real and an imaginary part).
//! The only branch-sensitive operation is the cube root, which is defined once here
//! so that every solver selects the same branch.

use crate::FloatValue;
pub use num::complex::Complex64;

pub const ONE_THIRD: FloatValue = 1.0 / 3.0;
pub const SQRT_3: FloatValue = 1.732_050_807_568_877_2;

/// Relative tolerance on the imaginary part below which a root counts as real.
pub const REAL_TOLERANCE: FloatValue = 1e-9;

/// Lift a real value into the complex plane.
#[inline]
pub fn real(x: FloatValue) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Sign-preserving real cube root.
///
/// $$\sqrt[3]{x} = \text{sign}(x) |x|^{1/3}$$
#[inline]
pub fn cbrt_signed(x: FloatValue) -> FloatValue {
    x.cbrt()
}

/// Cube root of a complex value that keeps the sign of the real part.
///
/// The principal branch of $z^{1/3}$ for a negative real $z$ lies off the real axis.
/// Cardano's formula needs the real branch instead, so arguments with a negative real
/// part are negated, rooted and negated back.
pub fn cbrt_signed_complex(z: Complex64) -> Complex64 {
    if z.re >= 0.0 {
        z.powf(ONE_THIRD)
    } else {
        -(-z).powf(ONE_THIRD)
    }
}

/// Whether `z` lies on the real axis within [`REAL_TOLERANCE`].
#[inline]
pub fn is_real(z: Complex64) -> bool {
    z.im.abs() <= REAL_TOLERANCE * z.re.abs().max(1.0)
}
