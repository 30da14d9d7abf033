use thiserror::Error;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid Log Filter Directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Global Subscriber Already Set: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub struct TracerOptions<'a> {
    /// Filter directive used when `RUST_LOG` is not set.
    pub default_directive: &'a str,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for TracerOptions<'_> {
    fn default() -> Self {
        Self {
            default_directive: "info",
            ansi: true,
        }
    }
}

/// This object initialises the stderr tracer for a binary, given a TracerOptions struct.
/// Logs go to stderr so that stdout is left for the results a binary reports.
pub struct TracerEngine {
    service_name: String,
}

impl TracerEngine {
    /// Initialises the stderr tracer for the crate
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the service, usually the binary name.
    /// * `module_name` - The name of the current module.
    /// #Returns
    /// An instance of TracerEngine, or an error if the filter is malformed or
    /// a global subscriber has already been installed.
    pub fn new(
        options: TracerOptions,
        service_name: &str,
        module_name: &str,
    ) -> Result<Self, TracerError> {
        let stderr_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(options.ansi);

        // This filter is applied to the stderr tracer
        let log_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(directives) => EnvFilter::try_new(directives)?,
            Err(_) => EnvFilter::try_new(options.default_directive)?,
        };

        let subscriber =
            tracing_subscriber::Registry::default().with(stderr_tracer.with_filter(log_filter));
        tracing::subscriber::set_global_default(subscriber)?;

        tracing::debug!(service_name, module_name, "Tracer initialised");
        Ok(Self {
            service_name: service_name.to_owned(),
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
