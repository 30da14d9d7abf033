//! This module finds the peaks of a normalized trace which represent
//! particles crossing the scan line.
//!
//! Candidates are the local maxima of the trace. They are filtered in turn by
//! height, prominence and width, and finally thinned so that no two accepted
//! peaks are closer than the minimum separation, higher peaks taking
//! precedence:
//! ```ignore
//! let peaks = find_peaks(derived.normalized(), &PeakConstraints::from(&config))?;
//! ```
pub(crate) mod detectors;
pub(crate) mod distance;
pub(crate) mod prominence;
pub(crate) mod width;

use flux_common::{Real, SampleIndex};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::{FluxError, FluxResult, InvalidParameterError, MissingDataError, Stage},
    parameters::{Config, require_finite},
    signal::DerivedSignal,
};
use detectors::{EventFilter, LocalMaximumDetector};

/// An accepted peak of the normalized channel.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    /// Position of the peak in the normalized channel.
    pub index: SampleIndex,
    /// Normalized value at the peak.
    pub height: Real,
    /// Width at half prominence, in samples.
    pub width: Real,
    pub prominence: Real,
    /// Position of the valley floor bounding the peak on the left.
    pub left_base: SampleIndex,
    /// Position of the valley floor bounding the peak on the right.
    pub right_base: SampleIndex,
    /// Interpolated position of the left half-prominence crossing.
    pub left_ip: Real,
    /// Interpolated position of the right half-prominence crossing.
    pub right_ip: Real,
}

/// The thresholds a candidate must meet to be accepted as a peak.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakConstraints {
    pub height: Real,
    pub width: Real,
    pub prom: Real,
    pub dist: usize,
}

impl From<&Config> for PeakConstraints {
    fn from(config: &Config) -> Self {
        Self {
            height: config.height,
            width: config.width,
            prom: config.prom,
            dist: config.dist,
        }
    }
}

impl PeakConstraints {
    pub(crate) fn validate(&self, location: Stage) -> FluxResult<()> {
        require_finite("height", self.height, location)?;
        require_finite("width", self.width, location)?;
        require_finite("prom", self.prom, location)?;
        if self.dist == 0 {
            return Err(FluxError::invalid(
                InvalidParameterError::NonPositiveDistance,
                location,
            ));
        }
        Ok(())
    }
}

/// Finds the peaks of the normalized channel of `derived`, in index order.
pub fn detect_peaks(derived: &DerivedSignal, config: &Config) -> FluxResult<Vec<Peak>> {
    find_peaks(derived.normalized(), &PeakConstraints::from(config))
}

/// Finds the peaks of an arbitrary trace, in index order.
/// An empty result is not an error.
#[instrument(skip_all, fields(len = values.len(), height = constraints.height, width = constraints.width, prom = constraints.prom, dist = constraints.dist))]
pub fn find_peaks(values: &[Real], constraints: &PeakConstraints) -> FluxResult<Vec<Peak>> {
    if values.is_empty() {
        return Err(FluxError::missing(
            MissingDataError::EmptySignal,
            Stage::PeakDetector,
        ));
    }
    constraints.validate(Stage::PeakDetector)?;

    let candidates: Vec<(SampleIndex, Real)> = values
        .iter()
        .copied()
        .enumerate()
        .events(LocalMaximumDetector::default())
        .collect();
    debug!(count = candidates.len(), "Local maxima");

    let candidates: Vec<(SampleIndex, Real)> = candidates
        .into_iter()
        .filter(|(_, height)| *height >= constraints.height)
        .collect();
    debug!(count = candidates.len(), "After height filter");

    let candidates: Vec<(SampleIndex, Real, prominence::Prominence)> = candidates
        .into_iter()
        .map(|(index, height)| (index, height, prominence::prominence(values, index)))
        .filter(|(_, _, prominence)| prominence.prominence >= constraints.prom)
        .collect();
    debug!(count = candidates.len(), "After prominence filter");

    let peaks: Vec<Peak> = candidates
        .into_iter()
        .map(|(index, height, prominence)| {
            let width = width::width(values, index, &prominence);
            Peak {
                index,
                height,
                width: width.width,
                prominence: prominence.prominence,
                left_base: prominence.left_base,
                right_base: prominence.right_base,
                left_ip: width.left_ip,
                right_ip: width.right_ip,
            }
        })
        .filter(|peak| peak.width >= constraints.width)
        .collect();
    debug!(count = peaks.len(), "After width filter");

    let peaks = distance::select_by_distance(peaks, constraints.dist);
    debug!(count = peaks.len(), "Peaks accepted");
    Ok(peaks)
}
