//! Surface energy balance components
//!
//! Tracks the skin temperature of a thin surface layer (snow or firn) driven by a net
//! surface flux series, and the mass melted whenever the surface reaches the melting
//! point. Each step solves a quartic with the closed-form solvers of [`rseb_core`].
//!
//! ```rust
//! use ndarray::array;
//! use rseb_components::energy_balance::step_energy_balance;
//! use rseb_components::parameters::MaterialParameters;
//!
//! let flux = array![300.0, 320.0, 900.0];
//! let output =
//!     step_energy_balance(flux.view(), 250.0, 3600.0, &MaterialParameters::default()).unwrap();
//! assert!(output.temperature[0] > 250.0);
//! assert_eq!(output.temperature[2], 273.15);
//! assert!(output.melt_mass[2] > 0.0);
//! ```

pub mod config;
pub mod constants;
pub mod energy_balance;
pub mod ensemble;
pub mod flux;
pub mod parameters;
