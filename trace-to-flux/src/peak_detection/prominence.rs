use flux_common::{Real, SampleIndex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Prominence {
    pub(crate) prominence: Real,
    pub(crate) left_base: SampleIndex,
    pub(crate) right_base: SampleIndex,
}

/// The lowest sample reached from the peak, walking over `positions`
/// until a sample higher than the peak is met. Ties keep the sample
/// nearest the peak.
fn valley_floor<P>(values: &[Real], peak: SampleIndex, positions: P) -> (SampleIndex, Real)
where
    P: Iterator<Item = SampleIndex>,
{
    let height = values[peak];
    positions
        .map(|index| (index, values[index]))
        .take_while(|(_, value)| *value <= height)
        .fold((peak, height), |(base, floor), (index, value)| {
            if value < floor {
                (index, value)
            } else {
                (base, floor)
            }
        })
}

/// How far the peak at `peak` stands above the higher of the valley
/// floors on either side of it.
pub(crate) fn prominence(values: &[Real], peak: SampleIndex) -> Prominence {
    let (left_base, left_floor) = valley_floor(values, peak, (0..peak).rev());
    let (right_base, right_floor) = valley_floor(values, peak, peak + 1..values.len());
    Prominence {
        prominence: values[peak] - left_floor.max(right_floor),
        left_base,
        right_base,
    }
}
