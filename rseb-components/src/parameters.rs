//! Material parameters of the lumped surface layer

use rseb_core::errors::{RSEBError, RSEBResult};
use rseb_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Properties of the thin surface layer whose temperature is tracked.
///
/// The layer is treated as a single lumped thermal mass of $m = \rho \cdot \text{depth}$
/// per unit area.
///
/// # Default Values
///
/// Defaults describe a 5 cm layer of 400 kg/m^3 snow with the specific heat and
/// latent heat of fusion of ice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParameters {
    /// Density of the layer (kg/m^3).
    /// Default: 400.0
    pub density: FloatValue,

    /// Thickness of the layer (m).
    /// Default: 0.05
    pub depth: FloatValue,

    /// Specific heat capacity (J/kg/K).
    /// Default: 2097.0
    pub specific_heat: FloatValue,

    /// Latent heat of fusion (J/kg).
    /// Default: 333500.0
    pub latent_heat_fusion: FloatValue,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self {
            density: 400.0,
            depth: 0.05,
            specific_heat: 2097.0,
            latent_heat_fusion: 333500.0,
        }
    }
}

impl MaterialParameters {
    /// Areal mass of the layer, $\rho \cdot \text{depth}$ (kg/m^2).
    pub fn areal_mass(&self) -> FloatValue {
        self.density * self.depth
    }

    /// Areal heat capacity of the layer, $c_p \rho \cdot \text{depth}$ (J/m^2/K).
    pub fn heat_capacity(&self) -> FloatValue {
        self.specific_heat * self.areal_mass()
    }

    /// Check that every parameter is finite and strictly positive.
    pub fn validate(&self) -> RSEBResult<()> {
        let fields = [
            ("density", self.density),
            ("depth", self.depth),
            ("specific_heat", self.specific_heat),
            ("latent_heat_fusion", self.latent_heat_fusion),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(RSEBError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be finite and positive, got {}", value),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = MaterialParameters::default();
        assert!(params.validate().is_ok());
        assert!((params.areal_mass() - 20.0).abs() < 1e-12);
        assert!((params.heat_capacity() - 41940.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_non_physical() {
        let params = MaterialParameters {
            depth: 0.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter `depth`: must be finite and positive, got 0"
        );

        let params = MaterialParameters {
            density: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"depth": 0.08}"#;
        let params: MaterialParameters =
            serde_json::from_str(json).expect("Partial deserialization failed");

        assert!((params.depth - 0.08).abs() < 1e-12);
        assert!((params.density - 400.0).abs() < 1e-12);
        assert!((params.latent_heat_fusion - 333500.0).abs() < 1e-12);
    }
}
