use clap::Args;
use flux_common::Real;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::{FluxError, FluxResult, InvalidParameterError, Stage},
    peak_detection::PeakConstraints,
    window::savitzky_golay,
};

/// The full set of analysis parameters for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Smoothing window width in samples, odd.
    pub window_length: usize,
    /// Degree of the smoothing polynomial, less than `window_length`.
    pub polyorder: usize,
    /// Percentile of the smoothed trace taken as the baseline, in [0, 100].
    pub norm_factor: Real,
    /// Minimum normalized amplitude of a peak.
    pub height: Real,
    /// Minimum peak width at half prominence, in samples.
    pub width: Real,
    /// Minimum separation between accepted peaks, in samples.
    pub dist: usize,
    /// Minimum prominence of a peak.
    pub prom: Real,
    /// Seconds per scan line.
    pub t_line: Real,
}

pub(crate) fn require_finite(name: &'static str, value: Real, location: Stage) -> FluxResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FluxError::invalid(
            InvalidParameterError::NonFinite { name, value },
            location,
        ))
    }
}

impl Config {
    /// Checks every constraint that does not depend on the signal itself.
    /// Each stage repeats the checks for the parameters it consumes.
    pub fn validate(&self) -> FluxResult<()> {
        self.validate_smoothing(Stage::Config)?;
        self.validate_normalization(Stage::Config)?;
        self.validate_peak_constraints(Stage::Config)?;
        self.validate_timing(Stage::Config)
    }

    pub(crate) fn validate_smoothing(&self, location: Stage) -> FluxResult<()> {
        savitzky_golay::validate(self.window_length, self.polyorder, location)
    }

    pub(crate) fn validate_normalization(&self, location: Stage) -> FluxResult<()> {
        if !(0.0..=100.0).contains(&self.norm_factor) {
            return Err(FluxError::invalid(
                InvalidParameterError::NormFactorOutOfRange(self.norm_factor),
                location,
            ));
        }
        Ok(())
    }

    pub(crate) fn validate_peak_constraints(&self, location: Stage) -> FluxResult<()> {
        PeakConstraints::from(self).validate(location)
    }

    pub(crate) fn validate_timing(&self, location: Stage) -> FluxResult<()> {
        if !(self.t_line.is_finite() && self.t_line > 0.0) {
            return Err(FluxError::invalid(
                InvalidParameterError::NonPositiveLineTime(self.t_line),
                location,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Missing Parameters: {}", .0.join(", "))]
pub struct MissingParameters(pub Vec<&'static str>);

/// A partially specified [Config], as read from a parameter file or the
/// command line. Unset fields are filled from another source with [ConfigArgs::or].
#[derive(Default, Debug, Clone, PartialEq, Args, Deserialize)]
#[serde(default)]
pub struct ConfigArgs {
    /// Smoothing window width in samples (odd)
    #[clap(long)]
    pub window_length: Option<usize>,

    /// Degree of the smoothing polynomial
    #[clap(long)]
    pub polyorder: Option<usize>,

    /// Percentile of the smoothed trace used as the baseline
    #[clap(long)]
    pub norm_factor: Option<Real>,

    /// Minimum normalized peak height
    #[clap(long)]
    pub height: Option<Real>,

    /// Minimum peak width in samples
    #[clap(long)]
    pub width: Option<Real>,

    /// Minimum separation between peaks in samples
    #[clap(long)]
    pub dist: Option<usize>,

    /// Minimum peak prominence
    #[clap(long)]
    pub prom: Option<Real>,

    /// Seconds per scan line
    #[clap(long)]
    pub t_line: Option<Real>,
}

impl ConfigArgs {
    /// Fields set in `self` take precedence over those in `fallback`.
    pub fn or(self, fallback: ConfigArgs) -> ConfigArgs {
        ConfigArgs {
            window_length: self.window_length.or(fallback.window_length),
            polyorder: self.polyorder.or(fallback.polyorder),
            norm_factor: self.norm_factor.or(fallback.norm_factor),
            height: self.height.or(fallback.height),
            width: self.width.or(fallback.width),
            dist: self.dist.or(fallback.dist),
            prom: self.prom.or(fallback.prom),
            t_line: self.t_line.or(fallback.t_line),
        }
    }
}

impl TryFrom<ConfigArgs> for Config {
    type Error = MissingParameters;

    fn try_from(args: ConfigArgs) -> Result<Self, Self::Error> {
        let missing: Vec<&'static str> = [
            ("window_length", args.window_length.is_none()),
            ("polyorder", args.polyorder.is_none()),
            ("norm_factor", args.norm_factor.is_none()),
            ("height", args.height.is_none()),
            ("width", args.width.is_none()),
            ("dist", args.dist.is_none()),
            ("prom", args.prom.is_none()),
            ("t_line", args.t_line.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        match args {
            ConfigArgs {
                window_length: Some(window_length),
                polyorder: Some(polyorder),
                norm_factor: Some(norm_factor),
                height: Some(height),
                width: Some(width),
                dist: Some(dist),
                prom: Some(prom),
                t_line: Some(t_line),
            } => Ok(Config {
                window_length,
                polyorder,
                norm_factor,
                height,
                width,
                dist,
                prom,
                t_line,
            }),
            _ => Err(MissingParameters(missing)),
        }
    }
}
