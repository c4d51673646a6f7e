//! Skin temperature and melt from a lumped surface energy balance
//!
//! The surface layer has areal heat capacity $C = c_p \rho \, \text{depth}$ and emits
//! $\sigma T^4$. Over a step of length $\Delta t$ with net flux $F$ into the surface the
//! new temperature $T$ satisfies the implicit balance
//!
//! $$C \frac{T - T_0}{\Delta t} = F - \sigma T^4$$
//!
//! which is the quartic
//!
//! $$\frac{\sigma \Delta t}{C} T^4 + T - \left(\frac{F \Delta t}{C} + T_0\right) = 0$$
//!
//! For a positive net flux this has exactly one real positive root. When that root
//! reaches the melting point the temperature is held at the melting point and the
//! energy left over after emission melts ice:
//!
//! $$M = \frac{F - \sigma T_m^4}{L_f} \Delta t$$

use crate::constants::{MELTING_POINT, STEFAN_BOLTZMANN};
use crate::parameters::MaterialParameters;
use log::{debug, warn};
use ndarray::{Array1, ArrayView1};
use rseb_core::complex::{is_real, Complex64};
use rseb_core::errors::{RSEBError, RSEBResult};
use rseb_core::polynomial::Quartic;
use rseb_core::roots::solve_quartic;
use rseb_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Outcome of a single step of the balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Skin temperature at the end of the step (K)
    pub temperature: FloatValue,
    /// Mass melted during the step (kg/m^2)
    pub melt_mass: FloatValue,
}

impl StepResult {
    /// Result of a step whose inputs contain NaN.
    pub fn undefined() -> Self {
        Self {
            temperature: FloatValue::NAN,
            melt_mass: FloatValue::NAN,
        }
    }

    pub fn is_melting(&self) -> bool {
        self.temperature == MELTING_POINT
    }
}

/// Temperature and melt series produced by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalanceOutput {
    /// Skin temperature after each step (K)
    pub temperature: Array1<FloatValue>,
    /// Mass melted during each step (kg/m^2)
    pub melt_mass: Array1<FloatValue>,
}

impl EnergyBalanceOutput {
    pub fn zeros(n_steps: usize) -> Self {
        Self {
            temperature: Array1::zeros(n_steps),
            melt_mass: Array1::zeros(n_steps),
        }
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    pub(crate) fn set(&mut self, step: usize, result: StepResult) {
        self.temperature[step] = result.temperature;
        self.melt_mass[step] = result.melt_mass;
    }

    /// Total melt over all steps, ignoring undefined steps (kg/m^2).
    pub fn total_melt(&self) -> FloatValue {
        self.melt_mass.iter().filter(|m| !m.is_nan()).sum()
    }
}

/// Check that a step length is usable.
pub(crate) fn validate_timestep(dt_seconds: FloatValue) -> RSEBResult<()> {
    if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
        return Err(RSEBError::InvalidParameter {
            name: "dt_seconds".to_string(),
            reason: format!("must be finite and positive, got {}", dt_seconds),
        });
    }
    Ok(())
}

/// Real parts of the roots that are real and strictly positive.
pub fn physical_roots(roots: &[Complex64]) -> Vec<FloatValue> {
    roots
        .iter()
        .filter(|r| is_real(**r) && r.re > 0.0)
        .map(|r| r.re)
        .collect()
}

/// Steps the skin temperature of a thin surface layer through a flux series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEnergyBalance {
    parameters: MaterialParameters,
}

impl SurfaceEnergyBalance {
    pub fn from_parameters(parameters: MaterialParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &MaterialParameters {
        &self.parameters
    }

    /// Coefficients `[a, 0, 0, 1, e]` of the step quartic.
    ///
    /// NaN inputs are carried into the coefficients unchanged.
    pub fn quartic_coefficients(
        &self,
        flux: FloatValue,
        previous_temperature: FloatValue,
        dt_seconds: FloatValue,
    ) -> Quartic {
        let scale = dt_seconds / self.parameters.heat_capacity();
        let a = STEFAN_BOLTZMANN * scale;
        let e = -(flux * scale + previous_temperature);
        Quartic::new([a, 0.0, 0.0, 1.0, e])
    }

    /// Melt produced when the surface sits at the melting point under `flux` (kg/m^2).
    pub fn melt_mass(&self, flux: FloatValue, dt_seconds: FloatValue) -> FloatValue {
        let emitted = STEFAN_BOLTZMANN * MELTING_POINT.powi(4);
        ((flux - emitted) / self.parameters.latent_heat_fusion * dt_seconds).max(0.0)
    }

    /// Turn the roots of a step quartic into the new state.
    pub(crate) fn resolve_step(
        &self,
        step: usize,
        flux: FloatValue,
        previous_temperature: FloatValue,
        dt_seconds: FloatValue,
        roots: &[Complex64],
    ) -> RSEBResult<StepResult> {
        let candidates = physical_roots(roots);
        if candidates.len() > 1 {
            warn!(
                "Step {} has {} real positive roots {:?}, taking the largest",
                step,
                candidates.len(),
                candidates
            );
        }
        let root = candidates
            .into_iter()
            .reduce(FloatValue::max)
            .ok_or_else(|| RSEBError::NoPhysicalRoot {
                step,
                previous_temperature,
                flux,
            })?;

        if root >= MELTING_POINT {
            Ok(StepResult {
                temperature: MELTING_POINT,
                melt_mass: self.melt_mass(flux, dt_seconds),
            })
        } else {
            Ok(StepResult {
                temperature: root,
                melt_mass: 0.0,
            })
        }
    }

    /// Advance the layer by one step.
    ///
    /// A NaN flux or previous temperature gives an undefined result rather than an error.
    ///
    /// # Errors
    ///
    /// [`RSEBError::NoPhysicalRoot`] if the quartic has no real positive root.
    pub fn solve_step(
        &self,
        step: usize,
        flux: FloatValue,
        previous_temperature: FloatValue,
        dt_seconds: FloatValue,
    ) -> RSEBResult<StepResult> {
        let polynomial = self.quartic_coefficients(flux, previous_temperature, dt_seconds);
        if polynomial.has_nan() {
            debug!("Step {} has undefined inputs", step);
            return Ok(StepResult::undefined());
        }
        let roots = solve_quartic(polynomial.coefficients())?;
        self.resolve_step(step, flux, previous_temperature, dt_seconds, &roots)
    }

    /// Step through the whole flux series starting from `initial_temperature`.
    pub fn run(
        &self,
        flux: ArrayView1<FloatValue>,
        initial_temperature: FloatValue,
        dt_seconds: FloatValue,
    ) -> RSEBResult<EnergyBalanceOutput> {
        self.parameters.validate()?;
        validate_timestep(dt_seconds)?;

        debug!(
            "Stepping {} steps of {} s from {} K",
            flux.len(),
            dt_seconds,
            initial_temperature
        );

        let mut output = EnergyBalanceOutput::zeros(flux.len());
        let mut previous_temperature = initial_temperature;
        for (step, &f) in flux.iter().enumerate() {
            let result = self.solve_step(step, f, previous_temperature, dt_seconds)?;
            output.set(step, result);
            previous_temperature = result.temperature;
        }

        debug!(
            "Finished with {} melting steps and {} kg/m^2 total melt",
            output.temperature.iter().filter(|&&t| t == MELTING_POINT).count(),
            output.total_melt()
        );
        Ok(output)
    }
}

/// Skin temperature and melt mass for a flux series (W/m^2, positive into the surface).
///
/// # Errors
///
/// Fails for invalid material parameters or step length, and with
/// [`RSEBError::NoPhysicalRoot`] at the first step without a physical solution.
pub fn step_energy_balance(
    flux: ArrayView1<FloatValue>,
    initial_temperature: FloatValue,
    dt_seconds: FloatValue,
    material: &MaterialParameters,
) -> RSEBResult<EnergyBalanceOutput> {
    SurfaceEnergyBalance::from_parameters(material.clone()).run(
        flux,
        initial_temperature,
        dt_seconds,
    )
}
