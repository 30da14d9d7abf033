pub mod tracer;

/// Scalar type used for every derived channel.
pub type Real = f64;

/// Position of a sample within a recording, in scan-line order.
pub type SampleIndex = usize;

/// Raw detector counts, as exported by the acquisition software.
pub type Intensity = Real;

/// Bit depth of the acquisition hardware, which fixes the brightest
/// representable intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth(pub u32);

impl BitDepth {
    pub const TWELVE: BitDepth = BitDepth(12);

    /// The largest raw value the detector can report, `2^bits - 1`.
    pub fn ceiling(&self) -> Intensity {
        (2.0 as Real).powi(self.0 as i32) - 1.0
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::TWELVE
    }
}
