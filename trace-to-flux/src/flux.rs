use flux_common::Real;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::{FluxError, FluxResult, InvalidParameterError, Stage},
    parameters::Config,
    peak_detection::Peak,
};

/// The particle flux through the scan line over one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluxEstimate {
    /// Number of accepted peaks.
    pub count: usize,
    /// Acquisition time of the recording.
    pub total_time_seconds: Real,
    /// Peaks per second, scaled by 1000.
    pub rate_per_second: Real,
}

/// Converts a peak count into a rate, taking `signal_length` scan lines of
/// `config.t_line` each as the acquisition time.
///
/// The rate is reported in a scaled unit, a thousand times the plain per
/// second figure.
#[instrument(skip_all, fields(count = peaks.len(), signal_length = signal_length, t_line = config.t_line))]
pub fn estimate_flux(
    peaks: &[Peak],
    signal_length: usize,
    config: &Config,
) -> FluxResult<FluxEstimate> {
    config.validate_timing(Stage::FluxEstimator)?;

    let total_time_seconds = signal_length as Real * config.t_line;
    if !(total_time_seconds.is_finite() && total_time_seconds > 0.0) {
        return Err(FluxError::invalid(
            InvalidParameterError::NonPositiveTotalTime(total_time_seconds),
            Stage::FluxEstimator,
        ));
    }

    let count = peaks.len();
    let rate_per_second = count as Real / total_time_seconds * 1000.0;
    debug!(total_time_seconds, rate_per_second, "Flux estimated");
    Ok(FluxEstimate {
        count,
        total_time_seconds,
        rate_per_second,
    })
}
