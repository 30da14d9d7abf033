use flux_common::{Real, SampleIndex};

use super::Detector;

/// Reports each sample which rises strictly above its predecessor and is not
/// exceeded by its successor. A flat top is reported at its first sample, and
/// the first and last samples of a trace are never reported.
#[derive(Default, Clone)]
pub(crate) struct LocalMaximumDetector {
    prev: Option<(SampleIndex, Real)>,
    prev_prev_value: Option<Real>,
}

impl Detector for LocalMaximumDetector {
    type EventType = (SampleIndex, Real);

    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<(SampleIndex, Real)> {
        let event = match (self.prev_prev_value, self.prev) {
            (Some(prev_prev_value), Some((prev_index, prev_value)))
                if prev_value > prev_prev_value && prev_value >= value =>
            {
                Some((prev_index, prev_value))
            }
            _ => None,
        };
        self.prev_prev_value = self.prev.map(|(_, prev_value)| prev_value);
        self.prev = Some((index, value));
        event
    }
}
