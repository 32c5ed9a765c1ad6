use anyhow::{Context, Result};
use bandpower_core::Recording;
use bandpower_processing::{ExtractionConfig, FeatureExtractor};
use bandpower_simulation::{RecordingSimulator, SimulationConfig};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::cli::{ExtractArgs, SimulateArgs};

pub fn extract(args: ExtractArgs) -> Result<()> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read recording {}", args.input.display()))?;
    let recording = Recording::from_json(&json)
        .with_context(|| format!("failed to parse recording {}", args.input.display()))?;

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ExtractionConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => ExtractionConfig::default(),
    };

    let extraction = FeatureExtractor::new().extract(&recording, &config)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&extraction)?
    } else {
        serde_json::to_string(&extraction)?
    };
    write_output(&output, args.output.as_deref())?;

    info!(
        recording = %recording.name,
        samples = extraction.features.sample_count(),
        excluded = extraction.features.mask.excluded_count(),
        "extraction written"
    );
    Ok(())
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let config = SimulationConfig {
        sampling_rate: args.sampling_rate,
        duration: args.duration,
        channel_count: args.channels,
        external_channels: args.external,
        boundaries: args.boundary,
        seed: args.seed,
        ..SimulationConfig::default()
    };

    let name = args
        .output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("simulated")
        .to_string();

    let recording = RecordingSimulator::new(config)?.generate(&name)?;
    write_output(&recording.to_json()?, Some(args.output.as_path()))?;

    info!(
        recording = %recording.name,
        channels = recording.channel_count(),
        samples = recording.sample_count(),
        path = %args.output.display(),
        "simulated recording written"
    );
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content).context("failed to write to stdout")
        }
    }
}
