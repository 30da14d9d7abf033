//! Conditioning of a raw trace into the channels peak detection runs on:
//! inversion against the detector ceiling, Savitzky-Golay smoothing, and
//! normalization against a percentile baseline.
pub(crate) mod inverter;
pub(crate) mod normalizer;

use flux_common::BitDepth;
use tracing::{debug, instrument};

use crate::{
    error::{FluxResult, Stage},
    parameters::Config,
    signal::{DerivedSignal, Signal},
    window::SavitzkyGolay,
};

/// Derives the inverted, smoothed and normalized channels of a signal
/// recorded at 12 bit depth.
pub fn process(signal: &Signal, config: &Config) -> FluxResult<DerivedSignal> {
    process_with_bit_depth(signal, config, BitDepth::default())
}

/// As [process], for a detector of the given bit depth.
#[instrument(skip_all, fields(len = signal.len(), bit_depth = bit_depth.0))]
pub fn process_with_bit_depth(
    signal: &Signal,
    config: &Config,
    bit_depth: BitDepth,
) -> FluxResult<DerivedSignal> {
    config.validate_smoothing(Stage::Smoother)?;
    config.validate_normalization(Stage::Normalizer)?;

    let inverted = inverter::invert(signal, bit_depth);
    let smoothed =
        SavitzkyGolay::new(config.window_length, config.polyorder)?.smooth(&inverted)?;
    let (baseline, normalized) =
        normalizer::normalize(&inverted, &smoothed, config.norm_factor)?;
    debug!(baseline, "Signal processed");

    DerivedSignal::new(signal.clone(), inverted, smoothed, normalized, baseline)
}
