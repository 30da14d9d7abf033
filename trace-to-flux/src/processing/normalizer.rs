use flux_common::Real;
use tracing::{debug, instrument};

use crate::{
    error::{FluxError, FluxResult, InvalidParameterError, MissingDataError, Stage},
    signal::{Channel, check_alignment},
};

/// The `q`th percentile of `values`, interpolating linearly between the
/// two nearest order statistics.
pub(crate) fn percentile(values: &[Real], q: Real) -> FluxResult<Real> {
    if !(0.0..=100.0).contains(&q) {
        return Err(FluxError::invalid(
            InvalidParameterError::NormFactorOutOfRange(q),
            Stage::Normalizer,
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(Real::total_cmp);

    let rank = (sorted.len().saturating_sub(1)) as Real * q / 100.0;
    let lower = rank.floor();
    let fraction = rank - lower;
    match (sorted.get(lower as usize), sorted.get(rank.ceil() as usize)) {
        (Some(low), Some(high)) => Ok(low + (high - low) * fraction),
        _ => Err(FluxError::missing(
            MissingDataError::EmptySignal,
            Stage::Normalizer,
        )),
    }
}

/// Expresses the inverted trace relative to a baseline taken from the
/// smoothed trace. Returns the baseline and the normalized channel.
#[instrument(skip_all, fields(len = inverted.len(), norm_factor = norm_factor))]
pub(crate) fn normalize(
    inverted: &[Real],
    smoothed: &[Real],
    norm_factor: Real,
) -> FluxResult<(Real, Vec<Real>)> {
    if smoothed.is_empty() {
        return Err(FluxError::missing(
            MissingDataError::EmptySignal,
            Stage::Normalizer,
        ));
    }
    check_alignment(
        Channel::Smoothed,
        inverted.len(),
        smoothed.len(),
        Stage::Normalizer,
    )?;

    let baseline = percentile(smoothed, norm_factor)?;
    debug!(baseline, "Baseline");
    if baseline == 0.0 {
        return Err(FluxError::invalid(
            InvalidParameterError::ZeroBaseline,
            Stage::Normalizer,
        ));
    }

    let normalized = inverted
        .iter()
        .map(|value| (value - baseline) / baseline)
        .collect();
    Ok((baseline, normalized))
}
