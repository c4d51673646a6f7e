//! Net surface flux assembly
//!
//! Helpers that turn the flux components of a climate dataset into the net flux
//! series consumed by the stepping loop. The stepping loop itself assumes the
//! convention positive = energy into the surface.

use ndarray::{Array1, ArrayView1, Zip};
use rseb_core::errors::{RSEBError, RSEBResult};
use rseb_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Sign convention of the turbulent (sensible and latent) heat fluxes in a dataset.
///
/// Datasets disagree on this. The caller states which convention its inputs follow;
/// it is never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbulentFluxConvention {
    /// Positive values carry energy into the surface
    #[default]
    IntoSurface,
    /// Positive values carry energy away from the surface, so they are negated
    OutOfSurface,
}

impl TurbulentFluxConvention {
    /// Factor converting a flux in this convention to the into-surface convention.
    pub fn sign(&self) -> FloatValue {
        match self {
            TurbulentFluxConvention::IntoSurface => 1.0,
            TurbulentFluxConvention::OutOfSurface => -1.0,
        }
    }
}

fn check_length(name: &str, expected: usize, got: usize) -> RSEBResult<()> {
    if expected != got {
        return Err(RSEBError::ShapeMismatch {
            expected: format!("{} of length {}", name, expected),
            got: format!("length {}", got),
        });
    }
    Ok(())
}

/// Net flux into the surface (W/m^2).
///
/// $$F = SW_{net} + LW_{abs} + s (Q_H + Q_L) + G$$
///
/// where $s$ is [`TurbulentFluxConvention::sign`] and $G$ the optional ground heat flux.
/// All series must have the same length. NaN entries propagate.
pub fn net_flux(
    shortwave_net: ArrayView1<FloatValue>,
    longwave_absorbed: ArrayView1<FloatValue>,
    sensible: ArrayView1<FloatValue>,
    latent: ArrayView1<FloatValue>,
    ground_heat: Option<ArrayView1<FloatValue>>,
    convention: TurbulentFluxConvention,
) -> RSEBResult<Array1<FloatValue>> {
    let n = shortwave_net.len();
    check_length("longwave_absorbed", n, longwave_absorbed.len())?;
    check_length("sensible", n, sensible.len())?;
    check_length("latent", n, latent.len())?;

    let sign = convention.sign();
    let mut flux = Zip::from(shortwave_net)
        .and(longwave_absorbed)
        .and(sensible)
        .and(latent)
        .map_collect(|&sw, &lw, &qh, &ql| sw + lw + sign * (qh + ql));

    if let Some(ground_heat) = ground_heat {
        check_length("ground_heat", n, ground_heat.len())?;
        flux += &ground_heat;
    }
    Ok(flux)
}

/// Fill NaN gaps, first from the next valid value and then from the previous one.
///
/// A series with no valid values is returned unchanged.
pub fn fill_gaps(values: ArrayView1<FloatValue>) -> Array1<FloatValue> {
    let mut filled = values.to_owned();

    let mut next = FloatValue::NAN;
    for v in filled.iter_mut().rev() {
        if v.is_nan() {
            *v = next;
        } else {
            next = *v;
        }
    }

    let mut previous = FloatValue::NAN;
    for v in filled.iter_mut() {
        if v.is_nan() {
            *v = previous;
        } else {
            previous = *v;
        }
    }
    filled
}

/// Absorbed shortwave flux $SW_\downarrow (1 - \alpha)$ (W/m^2).
///
/// Gaps in the albedo series are filled with [`fill_gaps`] first.
pub fn net_shortwave(
    shortwave_down: ArrayView1<FloatValue>,
    albedo: ArrayView1<FloatValue>,
) -> RSEBResult<Array1<FloatValue>> {
    check_length("albedo", shortwave_down.len(), albedo.len())?;
    let albedo = fill_gaps(albedo);
    Ok(Zip::from(shortwave_down)
        .and(&albedo)
        .map_collect(|&sw, &alpha| sw * (1.0 - alpha)))
}

/// Mean spacing of a time axis given in seconds.
///
/// # Errors
///
/// Fails for fewer than two time points or an axis that is not strictly increasing.
pub fn mean_timestep_seconds(times: &[FloatValue]) -> RSEBResult<FloatValue> {
    if times.len() < 2 {
        return Err(RSEBError::Error(format!(
            "At least two time points are needed to infer a time step, got {}",
            times.len()
        )));
    }
    if times.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(RSEBError::Error(
            "Time axis must be strictly increasing".to_string(),
        ));
    }
    Ok((times[times.len() - 1] - times[0]) / (times.len() - 1) as FloatValue)
}
