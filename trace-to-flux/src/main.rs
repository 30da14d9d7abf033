use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use flux_common::{BitDepth, Real, init_tracer, tracer::TracerOptions};
use serde::Serialize;
use tracing::{info, info_span};
use trace_to_flux::{
    Config, ConfigArgs, FluxEstimate, Peak, detect_peaks, estimate_flux, load_signal,
    process_with_bit_depth,
};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// CSV line profile to analyse
    input: PathBuf,

    /// JSON file of analysis parameters, overridden by any parameter flags
    #[clap(long)]
    params: Option<PathBuf>,

    #[clap(flatten)]
    config: ConfigArgs,

    /// Bit depth of the detector, which sets the inversion ceiling
    #[clap(long, default_value = "12")]
    bit_depth: u32,

    /// Intensity column of the profile, defaults to the first of "Y" or "Gray_Value"
    #[clap(long)]
    intensity_column: Option<String>,

    /// Print a JSON report rather than the rate alone
    #[clap(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a Path,
    config: &'a Config,
    baseline: Real,
    peaks: &'a [Peak],
    estimate: &'a FluxEstimate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let tracer = init_tracer!(TracerOptions::default())?;
    let _guard = info_span!("analysis", service = tracer.service_name()).entered();

    let config = resolve_config(cli.config, cli.params.as_deref())?;
    config.validate()?;

    let signal = load_signal(&cli.input, cli.intensity_column.as_deref())
        .with_context(|| format!("Cannot load profile {}", cli.input.display()))?;
    info!(samples = signal.len(), "Profile loaded");

    let derived = process_with_bit_depth(&signal, &config, BitDepth(cli.bit_depth))?;
    let peaks = detect_peaks(&derived, &config)?;
    let estimate = estimate_flux(&peaks, derived.len(), &config)?;
    info!(
        count = estimate.count,
        total_time_seconds = estimate.total_time_seconds,
        rate_per_second = estimate.rate_per_second,
        "Flux estimated"
    );

    if cli.json {
        let report = Report {
            input: &cli.input,
            config: &config,
            baseline: derived.baseline(),
            peaks: &peaks,
            estimate: &estimate,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Flux was {:.2} / sec", estimate.rate_per_second);
    }
    Ok(())
}

/// Fills any parameters not given on the command line from the parameter file.
fn resolve_config(command_line: ConfigArgs, params: Option<&Path>) -> Result<Config> {
    let file = match params {
        Some(path) => {
            let reader = File::open(path)
                .map(BufReader::new)
                .with_context(|| format!("Cannot open parameter file {}", path.display()))?;
            serde_json::from_reader(reader)
                .with_context(|| format!("Cannot read parameter file {}", path.display()))?
        }
        None => ConfigArgs::default(),
    };
    Ok(Config::try_from(command_line.or(file))?)
}
