//! Skin temperature and melt from a lumped surface energy balance
//!
//! Re-exports the polynomial solvers of [`rseb_core`] and the energy balance
//! components of [`rseb_components`].
//!
//! ```rust
//! use ndarray::Array2;
//! use rseb::{step_energy_balance_ensemble, MaterialParameters};
//!
//! // Three sites, each warmed by a constant flux for a day of hourly steps
//! let flux = Array2::from_shape_fn((24, 3), |(_, site)| 280.0 + 20.0 * site as f64);
//! let initial = ndarray::array![250.0, 250.0, 250.0];
//! let output =
//!     step_energy_balance_ensemble(flux.view(), initial.view(), 3600.0, &MaterialParameters::default())
//!         .unwrap();
//!
//! assert_eq!(output.temperature.dim(), (24, 3));
//! assert!(output.temperature[[23, 2]] > output.temperature[[23, 0]]);
//! ```

pub use rseb_components::config::EnergyBalanceConfig;
pub use rseb_components::energy_balance::{
    step_energy_balance, EnergyBalanceOutput, StepResult, SurfaceEnergyBalance,
};
pub use rseb_components::ensemble::{
    step_energy_balance_ensemble, step_energy_balance_lockstep, EnsembleOutput,
};
pub use rseb_components::flux::{net_flux, net_shortwave, TurbulentFluxConvention};
pub use rseb_components::parameters::MaterialParameters;
pub use rseb_core::errors::{RSEBError, RSEBResult};
pub use rseb_core::roots::{
    cubic_roots, quartic_roots, solve_cubic, solve_cubic_batch, solve_quadratic,
    solve_quadratic_batch, solve_quartic, solve_quartic_batch,
};

pub use rseb_components as components;
pub use rseb_core as solvers;
