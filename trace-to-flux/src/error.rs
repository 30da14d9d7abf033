use flux_common::{Real, SampleIndex};
use thiserror::Error;

use crate::signal::Channel;

pub type FluxResult<T> = Result<T, FluxError>;

/// The pipeline stage at which an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Stage {
    #[strum(to_string = "Config::validate")]
    Config,
    #[strum(to_string = "Signal::new")]
    Signal,
    #[strum(to_string = "DerivedSignal::new")]
    DerivedSignal,
    #[strum(to_string = "smooth")]
    Smoother,
    #[strum(to_string = "normalize")]
    Normalizer,
    #[strum(to_string = "detect_peaks")]
    PeakDetector,
    #[strum(to_string = "estimate_flux")]
    FluxEstimator,
}

#[derive(Debug, Error, PartialEq)]
pub enum FluxError {
    #[error("Missing Data: {reason} at {location}")]
    MissingData {
        reason: MissingDataError,
        location: Stage,
    },
    #[error("Invalid Parameter: {reason} at {location}")]
    InvalidParameter {
        reason: InvalidParameterError,
        location: Stage,
    },
}

impl FluxError {
    pub(crate) fn missing(reason: MissingDataError, location: Stage) -> Self {
        Self::MissingData { reason, location }
    }

    pub(crate) fn invalid(reason: InvalidParameterError, location: Stage) -> Self {
        Self::InvalidParameter { reason, location }
    }

    pub fn location(&self) -> Stage {
        match self {
            Self::MissingData { location, .. } | Self::InvalidParameter { location, .. } => {
                *location
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MissingDataError {
    #[error("Signal contains no samples")]
    EmptySignal,
    #[error("Sample index {index} at position {position} does not follow {previous}")]
    NonIncreasingIndex {
        position: usize,
        previous: SampleIndex,
        index: SampleIndex,
    },
    #[error("Intensity at index {index} is not finite")]
    NonFiniteSample { index: SampleIndex },
    #[error("Channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: Channel,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidParameterError {
    #[error("window_length {0} is not odd")]
    EvenWindowLength(usize),
    #[error("window_length {window_length} is not less than the signal length {signal_length}")]
    WindowExceedsSignal {
        window_length: usize,
        signal_length: usize,
    },
    #[error("polyorder {polyorder} is not less than window_length {window_length}")]
    PolyorderTooHigh {
        polyorder: usize,
        window_length: usize,
    },
    #[error("Least squares fit of order {polyorder} over {window_length} samples failed: {reason}")]
    SingularFit {
        polyorder: usize,
        window_length: usize,
        reason: &'static str,
    },
    #[error("norm_factor {0} is outside the percentile range [0, 100]")]
    NormFactorOutOfRange(Real),
    #[error("Baseline is zero")]
    ZeroBaseline,
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: Real },
    #[error("dist must be a positive number of samples")]
    NonPositiveDistance,
    #[error("t_line {0} must be positive")]
    NonPositiveLineTime(Real),
    #[error("Total acquisition time {0} s must be positive")]
    NonPositiveTotalTime(Real),
}
