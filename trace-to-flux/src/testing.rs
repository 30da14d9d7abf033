//! Synthetic traces for tests.
use flux_common::{Intensity, Real, SampleIndex};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// Triangular spikes of height `amplitude` on a zero background. Each spike
/// falls to zero `half_width + 1` samples either side of its position.
pub(crate) fn spike_train(
    len: usize,
    positions: &[SampleIndex],
    amplitude: Real,
    half_width: Real,
) -> Vec<Real> {
    (0..len)
        .map(|index| {
            positions
                .iter()
                .map(|&position| {
                    let offset = index.abs_diff(position) as Real;
                    amplitude * (1.0 - offset / (half_width + 1.0)).max(0.0)
                })
                .fold(0.0, Real::max)
        })
        .collect()
}

/// A raster scan line as the detector records it: a bright background with
/// a Gaussian dip wherever a particle crosses, plus Gaussian noise.
#[derive(Debug, Clone)]
pub(crate) struct RasterTrace {
    pub(crate) len: usize,
    pub(crate) background: Intensity,
    pub(crate) noise: Real,
    pub(crate) depth: Intensity,
    pub(crate) dip_sigma: Real,
    pub(crate) dips: Vec<SampleIndex>,
    pub(crate) seed: u64,
}

impl Default for RasterTrace {
    fn default() -> Self {
        Self {
            len: 10_000,
            background: 3000.0,
            noise: 20.0,
            depth: 1500.0,
            dip_sigma: 4.0,
            dips: (0..10).map(|n| 500 + 1000 * n).collect(),
            seed: 0,
        }
    }
}

impl RasterTrace {
    pub(crate) fn generate(&self) -> Vec<Intensity> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let noise = Normal::new(0.0, self.noise).expect("valid standard deviation");
        (0..self.len)
            .map(|index| {
                let dip: Real = self
                    .dips
                    .iter()
                    .map(|&centre| {
                        let offset = index.abs_diff(centre) as Real / self.dip_sigma;
                        self.depth * (-0.5 * offset * offset).exp()
                    })
                    .sum();
                self.background - dip + noise.sample(&mut rng)
            })
            .collect()
    }
}
