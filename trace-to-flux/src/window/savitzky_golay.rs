use std::collections::VecDeque;

use flux_common::{Real, SampleIndex};
use nalgebra::{DMatrix, DVector};
use tracing::{instrument, trace};

use super::{Window, WindowFilter};
use crate::error::{FluxError, FluxResult, InvalidParameterError, MissingDataError, Stage};

/// Checks the window/order pair independently of any signal.
pub(crate) fn validate(window_length: usize, polyorder: usize, location: Stage) -> FluxResult<()> {
    if window_length % 2 == 0 {
        return Err(FluxError::invalid(
            InvalidParameterError::EvenWindowLength(window_length),
            location,
        ));
    }
    if polyorder >= window_length {
        return Err(FluxError::invalid(
            InvalidParameterError::PolyorderTooHigh {
                polyorder,
                window_length,
            },
            location,
        ));
    }
    Ok(())
}

/// A Savitzky-Golay smoothing filter.
///
/// The least squares fit of a degree `polyorder` polynomial to `window_length`
/// equally spaced samples is linear in the samples, so it is solved once, as
/// the pseudo-inverse of the window's Vandermonde matrix, and reused for
/// every window position. Sample offsets are scaled into `[-1, 1]` before
/// fitting to keep the matrix well conditioned.
///
/// Samples closer than half a window to either end of the trace are taken
/// from the polynomial fitted to the first (or last) full window, evaluated
/// at their offsets.
#[derive(Debug, Clone)]
pub(crate) struct SavitzkyGolay {
    half_width: usize,
    scale: Real,
    pseudo_inverse: DMatrix<Real>,
}

impl SavitzkyGolay {
    pub(crate) fn new(window_length: usize, polyorder: usize) -> FluxResult<Self> {
        validate(window_length, polyorder, Stage::Smoother)?;

        let half_width = window_length / 2;
        let scale = half_width.max(1) as Real;
        let vandermonde = DMatrix::from_fn(window_length, polyorder + 1, |row, power| {
            ((row as Real - half_width as Real) / scale).powi(power as i32)
        });
        let pseudo_inverse = vandermonde
            .svd(true, true)
            .pseudo_inverse(Real::EPSILON * window_length as Real)
            .map_err(|reason| {
                FluxError::invalid(
                    InvalidParameterError::SingularFit {
                        polyorder,
                        window_length,
                        reason,
                    },
                    Stage::Smoother,
                )
            })?;

        Ok(Self {
            half_width,
            scale,
            pseudo_inverse,
        })
    }

    pub(crate) fn window_length(&self) -> usize {
        2 * self.half_width + 1
    }

    /// The weights which, applied to a full window, give the fitted value at its centre.
    pub(crate) fn centre_coefficients(&self) -> Vec<Real> {
        self.pseudo_inverse.row(0).iter().copied().collect()
    }

    fn fit(&self, window: &[Real]) -> DVector<Real> {
        &self.pseudo_inverse * DVector::from_column_slice(window)
    }

    fn evaluate(&self, polynomial: &DVector<Real>, offset: isize) -> Real {
        let x = offset as Real / self.scale;
        polynomial
            .as_slice()
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }

    #[instrument(skip_all, fields(len = values.len(), window_length = self.window_length()))]
    pub(crate) fn smooth(&self, values: &[Real]) -> FluxResult<Vec<Real>> {
        if values.is_empty() {
            return Err(FluxError::missing(
                MissingDataError::EmptySignal,
                Stage::Smoother,
            ));
        }
        let window_length = self.window_length();
        if window_length >= values.len() {
            return Err(FluxError::invalid(
                InvalidParameterError::WindowExceedsSignal {
                    window_length,
                    signal_length: values.len(),
                },
                Stage::Smoother,
            ));
        }

        let half_width = self.half_width as isize;
        let head = self.fit(&values[..window_length]);
        let tail = self.fit(&values[values.len() - window_length..]);

        let mut smoothed = Vec::with_capacity(values.len());
        smoothed.extend((-half_width..0).map(|offset| self.evaluate(&head, offset)));
        smoothed.extend(
            values
                .iter()
                .copied()
                .enumerate()
                .window(SavitzkyGolayWindow::new(self.centre_coefficients()))
                .map(|(_, value)| value),
        );
        smoothed.extend((1..=half_width).map(|offset| self.evaluate(&tail, offset)));

        trace!(head = ?head.as_slice(), tail = ?tail.as_slice(), "Edge polynomials");
        Ok(smoothed)
    }
}

/// Applies a fixed set of convolution weights to each full window.
#[derive(Clone)]
pub(crate) struct SavitzkyGolayWindow {
    coefficients: Vec<Real>,
    window: VecDeque<Real>,
}

impl SavitzkyGolayWindow {
    pub(crate) fn new(coefficients: Vec<Real>) -> Self {
        SavitzkyGolayWindow {
            window: VecDeque::with_capacity(coefficients.len()),
            coefficients,
        }
    }

    fn is_full(&self) -> bool {
        self.window.len() == self.coefficients.len()
    }
}

impl Window for SavitzkyGolayWindow {
    type InputType = Real;
    type OutputType = Real;

    fn push(&mut self, value: Real) -> bool {
        if self.is_full() {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.is_full()
    }

    fn output(&self) -> Option<Real> {
        self.is_full().then(|| {
            self.window
                .iter()
                .zip(&self.coefficients)
                .map(|(value, coefficient)| value * coefficient)
                .sum()
        })
    }

    fn apply_time_shift(&self, index: SampleIndex) -> SampleIndex {
        index.saturating_sub(self.coefficients.len() / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn classic_coefficients() {
        // Savitzky & Golay's table for a five point quadratic
        let filter = SavitzkyGolay::new(5, 2).expect("valid filter");
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0].map(|c| c / 35.0);
        for (c, e) in filter.centre_coefficients().into_iter().zip(expected) {
            assert_approx_eq!(c, e, 1e-12);
        }
    }

    #[test]
    fn window_is_centred() {
        let output: Vec<_> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .into_iter()
            .enumerate()
            .window(SavitzkyGolayWindow::new(vec![1.0 / 3.0; 3]))
            .collect();

        assert_eq!(output.len(), 3);
        assert_eq!(output[0].0, 1);
        assert_eq!(output[1].0, 2);
        assert_eq!(output[2].0, 3);
        assert_approx_eq!(output[0].1, 2.0);
        assert_approx_eq!(output[1].1, 3.0);
        assert_approx_eq!(output[2].1, 4.0);
    }

    #[test]
    fn constant_signal() {
        let values = vec![1234.5; 40];
        for (window_length, polyorder) in [(1, 0), (3, 0), (3, 2), (5, 3), (11, 4), (39, 6)] {
            let smoothed = SavitzkyGolay::new(window_length, polyorder)
                .and_then(|filter| filter.smooth(&values))
                .expect("valid filter");
            assert_eq!(smoothed.len(), values.len());
            for value in smoothed {
                assert_approx_eq!(value, 1234.5, 1e-8);
            }
        }
    }

    #[test]
    fn polynomials_up_to_order_are_preserved() {
        // Includes the edges, where the nearest full window's fit is extrapolated
        let values: Vec<Real> = (0..25)
            .map(|i| i as Real)
            .map(|x| 2.0 - 0.5 * x + 0.25 * x * x)
            .collect();
        let smoothed = SavitzkyGolay::new(7, 2)
            .and_then(|filter| filter.smooth(&values))
            .expect("valid filter");
        for (s, v) in smoothed.into_iter().zip(values) {
            assert_approx_eq!(s, v, 1e-8);
        }
    }

    #[test]
    fn noise_is_reduced() {
        let values: Vec<Real> = (0..50)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let smoothed = SavitzkyGolay::new(9, 2)
            .and_then(|filter| filter.smooth(&values))
            .expect("valid filter");
        let interior_peak = smoothed[4..46]
            .iter()
            .fold(0.0, |max: Real, value| max.max(value.abs()));
        assert!(interior_peak < 0.5);
    }

    #[test]
    fn even_window_length() {
        assert_eq!(
            SavitzkyGolay::new(4, 2).map(|_| ()),
            Err(FluxError::invalid(
                InvalidParameterError::EvenWindowLength(4),
                Stage::Smoother
            ))
        );
    }

    #[test]
    fn polyorder_too_high() {
        assert_eq!(
            SavitzkyGolay::new(5, 5).map(|_| ()),
            Err(FluxError::invalid(
                InvalidParameterError::PolyorderTooHigh {
                    polyorder: 5,
                    window_length: 5
                },
                Stage::Smoother
            ))
        );
    }

    #[test]
    fn window_one_shorter_than_signal() {
        let values: Vec<Real> = (0..12).map(|i| (i % 3) as Real).collect();
        let smoothed = SavitzkyGolay::new(11, 2)
            .and_then(|filter| filter.smooth(&values))
            .expect("window shorter than the signal");
        assert_eq!(smoothed.len(), 12);
    }

    #[test]
    fn window_as_long_as_signal() {
        let values = vec![1.0; 11];
        assert_eq!(
            SavitzkyGolay::new(11, 2).and_then(|filter| filter.smooth(&values)),
            Err(FluxError::invalid(
                InvalidParameterError::WindowExceedsSignal {
                    window_length: 11,
                    signal_length: 11
                },
                Stage::Smoother
            ))
        );
    }

    #[test]
    fn window_longer_than_signal() {
        let values = vec![1.0; 5];
        assert!(matches!(
            SavitzkyGolay::new(7, 2).and_then(|filter| filter.smooth(&values)),
            Err(FluxError::InvalidParameter {
                reason: InvalidParameterError::WindowExceedsSignal { .. },
                ..
            })
        ));
    }
}
