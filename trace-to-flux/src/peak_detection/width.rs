use flux_common::{Real, SampleIndex};

use super::prominence::Prominence;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Width {
    pub(crate) width: Real,
    pub(crate) left_ip: Real,
    pub(crate) right_ip: Real,
}

/// The width of the peak at half its prominence.
///
/// From the peak, walks outwards on each side (no further than the side's
/// base) to the first sample at or below the evaluation height, then
/// interpolates linearly between that sample and its neighbour nearer the peak.
pub(crate) fn width(values: &[Real], peak: SampleIndex, prominence: &Prominence) -> Width {
    let evaluation_height = values[peak] - prominence.prominence / 2.0;

    let left = (prominence.left_base + 1..=peak)
        .rev()
        .find(|&index| values[index] <= evaluation_height)
        .unwrap_or(prominence.left_base);
    let mut left_ip = left as Real;
    if values[left] < evaluation_height {
        left_ip += (evaluation_height - values[left]) / (values[left + 1] - values[left]);
    }

    let right = (peak..prominence.right_base)
        .find(|&index| values[index] <= evaluation_height)
        .unwrap_or(prominence.right_base);
    let mut right_ip = right as Real;
    if values[right] < evaluation_height {
        right_ip -= (evaluation_height - values[right]) / (values[right - 1] - values[right]);
    }

    Width {
        width: right_ip - left_ip,
        left_ip,
        right_ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peak_detection::prominence::prominence;
    use assert_approx_eq::assert_approx_eq;

    const DATA: [Real; 7] = [0.0, 1.0, 0.0, 3.0, 1.0, 2.0, 0.0];

    fn width_at(data: &[Real], peak: SampleIndex) -> Width {
        width(data, peak, &prominence(data, peak))
    }

    #[test]
    fn interpolated_crossings() {
        let result = width_at(&DATA, 3);
        assert_approx_eq!(result.left_ip, 2.5);
        assert_approx_eq!(result.right_ip, 3.75);
        assert_approx_eq!(result.width, 1.25);
    }

    #[test]
    fn walk_is_bounded_by_base() {
        let result = width_at(&DATA, 5);
        assert_approx_eq!(result.left_ip, 4.5);
        assert_approx_eq!(result.right_ip, 5.25);
        assert_approx_eq!(result.width, 0.75);
    }

    #[test]
    fn triangular_peak() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0];
        let result = width_at(&data, 4);
        assert_approx_eq!(result.left_ip, 2.0);
        assert_approx_eq!(result.right_ip, 6.0);
        assert_approx_eq!(result.width, 4.0);
    }

    #[test]
    fn flat_topped_peak() {
        let data = [0.0, 2.0, 2.0, 2.0, 0.0];
        let result = width_at(&data, 1);
        assert_approx_eq!(result.left_ip, 0.5);
        assert_approx_eq!(result.right_ip, 3.5);
        assert_approx_eq!(result.width, 3.0);
    }

    #[test]
    fn zero_prominence_has_zero_width() {
        let data = [1.0, 3.0, 3.0, 5.0, 0.0];
        assert_approx_eq!(width_at(&data, 1).width, 0.0);
    }
}
