// Differentially-private mean release (bounded Laplace mechanism)

use rand::Rng;
use rand_distr::{Distribution, Exp};
use thiserror::Error;

use crate::models::SampleSeries;

#[derive(Debug, Error)]
pub enum PrivacyError {
    #[error("invalid privacy parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid bounds: lower {lower} must be finite and below upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },
}

/// Privacy budget and the assumed data range, fixed per invocation.
#[derive(Debug, Clone, Copy)]
pub struct PrivacyParams {
    pub epsilon: f64,
    pub bounds: (f64, f64),
}

/// Both aggregates of one run. `noised` is derived only from the series and
/// the params, never from `exact`.
#[derive(Debug, Clone, Copy)]
pub struct MeanRelease {
    pub exact: f64,
    pub noised: f64,
}

/// Compute the exact mean and an epsilon-DP noised mean over the same series.
///
/// Samples outside `params.bounds` are silently clipped to the bounds before
/// noising, matching the bounded-mean mechanism's contract; the exact mean is
/// taken over the raw series. The noised mean gets `Laplace(0, b)` noise with
/// `b = (upper - lower) / (n * epsilon)` (noise std dev `sqrt(2) * b`) and is
/// rounded to 2 decimal places. It is not post-clipped, so it may fall
/// outside the bounds.
pub fn compute(series: &SampleSeries, params: &PrivacyParams) -> Result<MeanRelease, PrivacyError> {
    compute_with_rng(series, params, &mut rand::thread_rng())
}

/// Same as [`compute`], with the noise source injected (seedable in tests).
pub fn compute_with_rng<R: Rng>(
    series: &SampleSeries,
    params: &PrivacyParams,
    rng: &mut R,
) -> Result<MeanRelease, PrivacyError> {
    let (lower, upper) = params.bounds;
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(PrivacyError::InvalidBounds { lower, upper });
    }
    if !params.epsilon.is_finite() || params.epsilon <= 0.0 {
        return Err(PrivacyError::InvalidParameter(format!(
            "epsilon must be > 0, got {}",
            params.epsilon
        )));
    }
    if series.is_empty() {
        return Err(PrivacyError::InvalidParameter(
            "sample series is empty".into(),
        ));
    }

    let n = series.len() as f64;
    let exact = series.values().iter().sum::<f64>() / n;

    let clipped_mean = series
        .values()
        .iter()
        .map(|v| v.clamp(lower, upper))
        .sum::<f64>()
        / n;

    // Sensitivity of a mean over n samples clipped to [lower, upper].
    let scale = (upper - lower) / (n * params.epsilon);
    let noised = round2(clipped_mean + laplace_noise(scale, rng)?);

    Ok(MeanRelease { exact, noised })
}

/// Laplace(0, scale) as the difference of two Exp(1/scale) draws.
fn laplace_noise<R: Rng>(scale: f64, rng: &mut R) -> Result<f64, PrivacyError> {
    let exp = Exp::new(1.0 / scale).map_err(|e| {
        PrivacyError::InvalidParameter(format!("laplace scale {} rejected: {:?}", scale, e))
    })?;
    Ok(exp.sample(rng) - exp.sample(rng))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
