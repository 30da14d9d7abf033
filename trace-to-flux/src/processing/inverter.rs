use flux_common::{BitDepth, Intensity, Real};

use crate::signal::Signal;

/// Flips the polarity of a trace, so that dark particles on a bright
/// background become positive excursions.
///
/// Values brighter than the ceiling are not clamped and invert to
/// negative values.
pub(crate) fn invert(signal: &Signal, bit_depth: BitDepth) -> Vec<Real> {
    let ceiling: Intensity = bit_depth.ceiling();
    signal.intensities().map(|value| ceiling - value).collect()
}
