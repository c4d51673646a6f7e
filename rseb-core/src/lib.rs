//! Closed-form polynomial root solvers
//!
//! Analytic solvers for quadratic, cubic and quartic equations with real
//! coefficients. Every root is returned as a [`Complex64`](complex::Complex64),
//! even when it is known to be real; an imaginary part near zero marks a real root.
//!
//! Each degree has a single-equation form and a batched form operating on an
//! `[N, k]` coefficient matrix. The batched forms classify every row first and then
//! evaluate the rows of each class with the same scalar formulas, so the two forms
//! agree exactly for identical inputs.
//!
//! ```rust
//! use rseb_core::roots::solve_quartic;
//!
//! // (x - 1)(x - 2)(x - 3)(x - 4)
//! let roots = solve_quartic(&[1.0, -10.0, 35.0, -50.0, 24.0]).unwrap();
//! let mut real: Vec<f64> = roots.iter().map(|r| r.re).collect();
//! real.sort_by(|a, b| a.total_cmp(b));
//! for (got, expected) in real.iter().zip([1.0, 2.0, 3.0, 4.0]) {
//!     assert!((got - expected).abs() < 1e-9);
//! }
//! ```

pub mod complex;
pub mod errors;
pub mod polynomial;
pub mod roots;

/// Floating point type used throughout the solvers
pub type FloatValue = f64;
