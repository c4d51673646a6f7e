//! Many independent flux series at once
//!
//! Series (for example grid cells or sites) share material parameters and step length
//! but nothing else. Arrays are laid out `[time, series]`.
//!
//! Two drivers produce the same result:
//! - [`step_energy_balance_ensemble`] runs each series to completion on the rayon
//!   thread pool.
//! - [`step_energy_balance_lockstep`] advances every series one step at a time and
//!   solves the step quartics of all series with a single [`quartic_roots`] call.

use crate::energy_balance::{
    validate_timestep, EnergyBalanceOutput, StepResult, SurfaceEnergyBalance,
};
use crate::parameters::MaterialParameters;
use log::debug;
use ndarray::{aview1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;
use rseb_core::errors::{RSEBError, RSEBResult};
use rseb_core::roots::quartic_roots;
use rseb_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Temperature and melt for every series, each `[time, series]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleOutput {
    /// Skin temperature (K)
    pub temperature: Array2<FloatValue>,
    /// Melt mass per step (kg/m^2)
    pub melt_mass: Array2<FloatValue>,
}

impl EnsembleOutput {
    pub fn zeros(n_steps: usize, n_series: usize) -> Self {
        Self {
            temperature: Array2::zeros((n_steps, n_series)),
            melt_mass: Array2::zeros((n_steps, n_series)),
        }
    }

    pub fn n_steps(&self) -> usize {
        self.temperature.nrows()
    }

    pub fn n_series(&self) -> usize {
        self.temperature.ncols()
    }

    /// Copy out a single series.
    pub fn series(&self, series: usize) -> EnergyBalanceOutput {
        EnergyBalanceOutput {
            temperature: self.temperature.column(series).to_owned(),
            melt_mass: self.melt_mass.column(series).to_owned(),
        }
    }
}

fn check_inputs(
    flux: &ArrayView2<FloatValue>,
    initial_temperature: &ArrayView1<FloatValue>,
    dt_seconds: FloatValue,
    material: &MaterialParameters,
) -> RSEBResult<()> {
    material.validate()?;
    validate_timestep(dt_seconds)?;
    if flux.ncols() != initial_temperature.len() {
        return Err(RSEBError::ShapeMismatch {
            expected: format!(
                "one initial temperature per series ({})",
                flux.ncols()
            ),
            got: format!("{}", initial_temperature.len()),
        });
    }
    Ok(())
}

/// Step every column of `flux` independently, in parallel.
///
/// # Errors
///
/// Invalid inputs are reported as for [`crate::energy_balance::step_energy_balance`].
/// A failing series is reported as [`RSEBError::Series`]; when several series fail
/// any one of them may be reported.
pub fn step_energy_balance_ensemble(
    flux: ArrayView2<FloatValue>,
    initial_temperature: ArrayView1<FloatValue>,
    dt_seconds: FloatValue,
    material: &MaterialParameters,
) -> RSEBResult<EnsembleOutput> {
    check_inputs(&flux, &initial_temperature, dt_seconds, material)?;
    let (n_steps, n_series) = flux.dim();
    debug!("Stepping {} series of {} steps in parallel", n_series, n_steps);

    let component = SurfaceEnergyBalance::from_parameters(material.clone());
    let results = (0..n_series)
        .into_par_iter()
        .map(|series| {
            component
                .run(flux.column(series), initial_temperature[series], dt_seconds)
                .map_err(|e| e.in_series(series))
        })
        .collect::<RSEBResult<Vec<EnergyBalanceOutput>>>()?;

    let mut output = EnsembleOutput::zeros(n_steps, n_series);
    for (series, result) in results.iter().enumerate() {
        output
            .temperature
            .column_mut(series)
            .assign(&result.temperature);
        output.melt_mass.column_mut(series).assign(&result.melt_mass);
    }
    Ok(output)
}

/// Step all columns of `flux` together, solving each step as one batch of quartics.
///
/// Undefined (NaN) coefficients are zeroed before the batch solve and the affected
/// series get NaN for that step.
pub fn step_energy_balance_lockstep(
    flux: ArrayView2<FloatValue>,
    initial_temperature: ArrayView1<FloatValue>,
    dt_seconds: FloatValue,
    material: &MaterialParameters,
) -> RSEBResult<EnsembleOutput> {
    check_inputs(&flux, &initial_temperature, dt_seconds, material)?;
    let (n_steps, n_series) = flux.dim();
    debug!("Stepping {} series of {} steps in lockstep", n_series, n_steps);

    let component = SurfaceEnergyBalance::from_parameters(material.clone());
    let mut output = EnsembleOutput::zeros(n_steps, n_series);
    let mut previous_temperature = initial_temperature.to_owned();
    let mut coefficients = Array2::zeros((n_series, 5));
    let mut undefined = vec![false; n_series];

    for (step, step_flux) in flux.outer_iter().enumerate() {
        for series in 0..n_series {
            let polynomial = component.quartic_coefficients(
                step_flux[series],
                previous_temperature[series],
                dt_seconds,
            );
            undefined[series] = polynomial.has_nan();
            coefficients
                .row_mut(series)
                .assign(&aview1(polynomial.sanitised().coefficients()));
        }

        let roots = quartic_roots(coefficients.view())?;

        for series in 0..n_series {
            let result = if undefined[series] {
                StepResult::undefined()
            } else {
                component
                    .resolve_step(
                        step,
                        step_flux[series],
                        previous_temperature[series],
                        dt_seconds,
                        &roots.row(series).to_vec(),
                    )
                    .map_err(|e| e.in_series(series))?
            };
            output.temperature[[step, series]] = result.temperature;
            output.melt_mass[[step, series]] = result.melt_mass;
            previous_temperature[series] = result.temperature;
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy_balance::step_energy_balance;
    use ndarray::array;

    fn ramp(n_steps: usize, n_series: usize) -> Array2<f64> {
        Array2::from_shape_fn((n_steps, n_series), |(t, s)| {
            250.0 + 40.0 * t as f64 + 2.0 * s as f64
        })
    }

    #[test]
    fn test_ensemble_matches_single_series() {
        let flux = ramp(12, 5);
        let initial = array![240.0, 245.0, 250.0, 255.0, 260.0];
        let material = MaterialParameters::default();

        let output =
            step_energy_balance_ensemble(flux.view(), initial.view(), 3600.0, &material).unwrap();
        assert_eq!((output.n_steps(), output.n_series()), (12, 5));

        for series in 0..5 {
            let single =
                step_energy_balance(flux.column(series), initial[series], 3600.0, &material)
                    .unwrap();
            assert_eq!(output.series(series), single);
        }
    }

    #[test]
    fn test_lockstep_matches_ensemble_small_batch() {
        let flux = ramp(12, 5);
        let initial = array![240.0, 245.0, 250.0, 255.0, 260.0];
        let material = MaterialParameters::default();

        let ensemble =
            step_energy_balance_ensemble(flux.view(), initial.view(), 3600.0, &material).unwrap();
        let lockstep =
            step_energy_balance_lockstep(flux.view(), initial.view(), 3600.0, &material).unwrap();
        assert_eq!(ensemble, lockstep);
    }

    #[test]
    fn test_lockstep_nan_series() {
        let mut flux = ramp(4, 3);
        flux[[1, 2]] = f64::NAN;
        let initial = array![250.0, 250.0, 250.0];
        let output = step_energy_balance_lockstep(
            flux.view(),
            initial.view(),
            3600.0,
            &MaterialParameters::default(),
        )
        .unwrap();

        assert!(output.temperature[[0, 2]].is_finite());
        for step in 1..4 {
            assert!(output.temperature[[step, 2]].is_nan());
            assert!(output.melt_mass[[step, 2]].is_nan());
        }
        assert!(output.temperature.column(0).iter().all(|t| t.is_finite()));
        assert!(output.temperature.column(1).iter().all(|t| t.is_finite()));
    }

    #[test]
    fn test_failing_series_is_identified() {
        let mut flux = ramp(3, 4);
        flux[[2, 3]] = -1e6;
        let initial = array![250.0, 250.0, 250.0, 250.0];
        let material = MaterialParameters::default();

        for result in [
            step_energy_balance_ensemble(flux.view(), initial.view(), 3600.0, &material),
            step_energy_balance_lockstep(flux.view(), initial.view(), 3600.0, &material),
        ] {
            match result.unwrap_err() {
                RSEBError::Series { series, source } => {
                    assert_eq!(series, 3);
                    assert!(matches!(*source, RSEBError::NoPhysicalRoot { step: 2, .. }));
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let flux = ramp(3, 4);
        let initial = array![250.0, 250.0];
        let err = step_energy_balance_ensemble(
            flux.view(),
            initial.view(),
            3600.0,
            &MaterialParameters::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RSEBError::ShapeMismatch { .. }));
    }
}
