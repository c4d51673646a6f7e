//! Physical constants used by the surface energy balance.

use rseb_core::FloatValue;

/// Stefan-Boltzmann constant ($\text{W m}^{-2}\text{ K}^{-4}$)
pub const STEFAN_BOLTZMANN: FloatValue = 5.67e-8;

/// Melting point of ice (K)
///
/// Skin temperatures never exceed this value.
pub const MELTING_POINT: FloatValue = 273.15;

/// Seconds in one hour, the default time step
pub const SECONDS_PER_HOUR: FloatValue = 3600.0;
