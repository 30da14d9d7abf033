//! Estimates the flux of particles crossing a raster scan line from the
//! intensity profile recorded along it.
//!
//! Particles show up as dips in an otherwise bright trace. The trace is
//! inverted, smoothed and normalized against a percentile baseline
//! ([process]), the peaks of the normalized trace are found
//! ([detect_peaks]), and their count is converted into a rate over the
//! acquisition time ([estimate_flux]).
pub mod error;
pub mod flux;
pub mod loader;
pub mod parameters;
pub mod peak_detection;
pub mod processing;
pub mod signal;
#[cfg(test)]
pub(crate) mod testing;
pub(crate) mod window;

pub use error::{FluxError, FluxResult, InvalidParameterError, MissingDataError, Stage};
pub use flux::{FluxEstimate, estimate_flux};
pub use loader::{LoaderError, load_signal, read_signal};
pub use parameters::{Config, ConfigArgs, MissingParameters};
pub use peak_detection::{Peak, PeakConstraints, detect_peaks, find_peaks};
pub use processing::{process, process_with_bit_depth};
pub use signal::{Channel, DerivedSignal, Signal, TracePoint};
