//! Run configuration
//!
//! The configuration only recognises the keys listed on [`EnergyBalanceConfig`];
//! anything else is rejected when parsing.
//!
//! ```toml
//! timestep_seconds = 3600.0
//! turbulent_flux_convention = "out_of_surface"
//!
//! [material]
//! density = 400.0
//! depth = 0.08
//! ```

use crate::constants::SECONDS_PER_HOUR;
use crate::flux::TurbulentFluxConvention;
use crate::parameters::MaterialParameters;
use rseb_core::errors::{RSEBError, RSEBResult};
use rseb_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the stepping loop needs besides the flux series and initial temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyBalanceConfig {
    /// Time step of the flux series (s).
    /// Default: 3600.0
    pub timestep_seconds: FloatValue,

    /// Sign convention of the sensible and latent heat fluxes supplied by the caller.
    /// Default: into the surface
    pub turbulent_flux_convention: TurbulentFluxConvention,

    pub material: MaterialParameters,
}

impl Default for EnergyBalanceConfig {
    fn default() -> Self {
        Self {
            timestep_seconds: SECONDS_PER_HOUR,
            turbulent_flux_convention: TurbulentFluxConvention::default(),
            material: MaterialParameters::default(),
        }
    }
}

impl EnergyBalanceConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> RSEBResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| RSEBError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RSEBResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> RSEBResult<String> {
        toml::to_string(self).map_err(|e| RSEBError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RSEBResult<()> {
        if !self.timestep_seconds.is_finite() || self.timestep_seconds <= 0.0 {
            return Err(RSEBError::InvalidParameter {
                name: "timestep_seconds".to_string(),
                reason: format!(
                    "must be finite and positive, got {}",
                    self.timestep_seconds
                ),
            });
        }
        self.material.validate()
    }
}
