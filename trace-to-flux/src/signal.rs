use flux_common::{Intensity, Real, SampleIndex};
use itertools::Itertools;

use crate::error::{FluxError, FluxResult, MissingDataError, Stage};

/// A single raw sample: its scan-line index and the detector intensity.
pub type TracePoint = (SampleIndex, Intensity);

/// One acquisition of a scan line, in index order.
/// A `Signal` is never empty, its indices strictly increase and every
/// intensity is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    points: Vec<TracePoint>,
}

impl Signal {
    pub fn new(points: Vec<TracePoint>) -> FluxResult<Self> {
        if points.is_empty() {
            return Err(FluxError::missing(
                MissingDataError::EmptySignal,
                Stage::Signal,
            ));
        }
        if let Some((position, ((previous, _), (index, _)))) = points
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, ((previous, _), (index, _)))| index <= previous)
        {
            return Err(FluxError::missing(
                MissingDataError::NonIncreasingIndex {
                    position: position + 1,
                    previous: *previous,
                    index: *index,
                },
                Stage::Signal,
            ));
        }
        if let Some((index, _)) = points.iter().find(|(_, value)| !value.is_finite()) {
            return Err(FluxError::missing(
                MissingDataError::NonFiniteSample { index: *index },
                Stage::Signal,
            ));
        }
        Ok(Self { points })
    }

    /// Builds a signal whose samples are indexed by their position.
    pub fn from_intensities<I>(intensities: I) -> FluxResult<Self>
    where
        I: IntoIterator<Item = Intensity>,
    {
        Self::new(intensities.into_iter().enumerate().collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn indices(&self) -> impl Iterator<Item = SampleIndex> + '_ {
        self.points.iter().map(|(index, _)| *index)
    }

    pub fn intensities(&self) -> impl Iterator<Item = Intensity> + '_ {
        self.points.iter().map(|(_, value)| *value)
    }
}

/// The channels derived from a [Signal] by [crate::process].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Channel {
    #[strum(to_string = "inverted")]
    Inverted,
    #[strum(to_string = "smoothed")]
    Smoothed,
    #[strum(to_string = "normalized")]
    Normalized,
}

/// A [Signal] together with its derived channels, each aligned with the
/// source sample for sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSignal {
    source: Signal,
    inverted: Vec<Real>,
    smoothed: Vec<Real>,
    normalized: Vec<Real>,
    baseline: Real,
}

impl DerivedSignal {
    pub fn new(
        source: Signal,
        inverted: Vec<Real>,
        smoothed: Vec<Real>,
        normalized: Vec<Real>,
        baseline: Real,
    ) -> FluxResult<Self> {
        for (channel, values) in [
            (Channel::Inverted, &inverted),
            (Channel::Smoothed, &smoothed),
            (Channel::Normalized, &normalized),
        ] {
            check_alignment(channel, source.len(), values.len(), Stage::DerivedSignal)?;
        }
        Ok(Self {
            source,
            inverted,
            smoothed,
            normalized,
            baseline,
        })
    }

    pub fn source(&self) -> &Signal {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn channel(&self, channel: Channel) -> &[Real] {
        match channel {
            Channel::Inverted => &self.inverted,
            Channel::Smoothed => &self.smoothed,
            Channel::Normalized => &self.normalized,
        }
    }

    pub fn inverted(&self) -> &[Real] {
        &self.inverted
    }

    pub fn smoothed(&self) -> &[Real] {
        &self.smoothed
    }

    pub fn normalized(&self) -> &[Real] {
        &self.normalized
    }

    /// The background level the normalized channel is expressed relative to.
    pub fn baseline(&self) -> Real {
        self.baseline
    }
}

pub(crate) fn check_alignment(
    channel: Channel,
    expected: usize,
    found: usize,
    location: Stage,
) -> FluxResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(FluxError::missing(
            MissingDataError::ChannelLengthMismatch {
                channel,
                expected,
                found,
            },
            location,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signal() {
        assert_eq!(
            Signal::from_intensities(Vec::<Intensity>::new()),
            Err(FluxError::missing(
                MissingDataError::EmptySignal,
                Stage::Signal
            ))
        );
    }

    #[test]
    fn enumerated_signal() {
        let signal = Signal::from_intensities([4.0, 3.0, 2.0]).expect("valid signal");
        assert_eq!(signal.len(), 3);
        assert_eq!(signal.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(signal.intensities().collect::<Vec<_>>(), vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn offset_indices_are_kept() {
        let signal = Signal::new(vec![(10, 1.0), (11, 2.0), (15, 3.0)]).expect("valid signal");
        assert_eq!(signal.points(), &[(10, 1.0), (11, 2.0), (15, 3.0)]);
    }

    #[test]
    fn repeated_index() {
        assert_eq!(
            Signal::new(vec![(0, 1.0), (1, 2.0), (1, 3.0)]),
            Err(FluxError::missing(
                MissingDataError::NonIncreasingIndex {
                    position: 2,
                    previous: 1,
                    index: 1
                },
                Stage::Signal
            ))
        );
    }

    #[test]
    fn non_finite_sample() {
        assert_eq!(
            Signal::new(vec![(0, 1.0), (1, Real::NAN)]),
            Err(FluxError::missing(
                MissingDataError::NonFiniteSample { index: 1 },
                Stage::Signal
            ))
        );
    }

    #[test]
    fn misaligned_channel() {
        let signal = Signal::from_intensities([1.0, 2.0, 3.0]).expect("valid signal");
        let result = DerivedSignal::new(
            signal,
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0, 3.0],
            1.0,
        );
        assert_eq!(
            result,
            Err(FluxError::missing(
                MissingDataError::ChannelLengthMismatch {
                    channel: Channel::Smoothed,
                    expected: 3,
                    found: 2
                },
                Stage::DerivedSignal
            ))
        );
    }
}
