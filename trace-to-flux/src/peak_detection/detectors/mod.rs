pub(crate) mod local_maximum_detector;

use flux_common::{Real, SampleIndex};

pub(crate) use local_maximum_detector::LocalMaximumDetector;

/// Consumes a trace one sample at a time, reporting events as they are recognised.
pub(crate) trait Detector: Default + Clone {
    type EventType;

    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<Self::EventType>;
}

#[derive(Clone)]
pub(crate) struct EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    source: I,
    detector: D,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    type Item = D::EventType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, value) = self.source.next()?;
            if let Some(event) = self.detector.signal(index, value) {
                return Some(event);
            }
        }
    }
}

pub(crate) trait EventFilter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
        }
    }
}
