pub(crate) mod savitzky_golay;

use flux_common::SampleIndex;

pub(crate) use savitzky_golay::SavitzkyGolay;

/// A sliding window over a trace, which produces an output once it has
/// seen enough samples.
pub(crate) trait Window: Clone {
    type InputType: Copy;
    type OutputType;

    /// Adds a sample, returning true if the window now has an output.
    fn push(&mut self, value: Self::InputType) -> bool;
    fn output(&self) -> Option<Self::OutputType>;
    /// Maps the index of the most recent sample to the index the output refers to.
    fn apply_time_shift(&self, index: SampleIndex) -> SampleIndex;
}

#[derive(Clone)]
pub(crate) struct WindowIter<I, W>
where
    I: Iterator<Item = (SampleIndex, W::InputType)>,
    W: Window,
{
    window_function: W,
    source: I,
}

impl<I, W> WindowIter<I, W>
where
    I: Iterator<Item = (SampleIndex, W::InputType)>,
    W: Window,
{
    pub(crate) fn new(source: I, window_function: W) -> Self {
        WindowIter {
            source,
            window_function,
        }
    }
}

impl<I, W> Iterator for WindowIter<I, W>
where
    I: Iterator<Item = (SampleIndex, W::InputType)>,
    W: Window,
{
    type Item = (SampleIndex, W::OutputType);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, value) = self.source.next()?;
            if self.window_function.push(value) {
                return Some((
                    self.window_function.apply_time_shift(index),
                    self.window_function.output()?,
                ));
            }
        }
    }
}

pub(crate) trait WindowFilter<I, W>
where
    I: Iterator<Item = (SampleIndex, W::InputType)>,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W>;
}

impl<I, W> WindowFilter<I, W> for I
where
    I: Iterator<Item = (SampleIndex, W::InputType)>,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W> {
        WindowIter::<I, W>::new(self, window)
    }
}
