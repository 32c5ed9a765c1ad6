use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bandpower",
    version,
    about = "Windowed average band-power features from EEG recordings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract band-power features from a JSON recording
    Extract(ExtractArgs),
    /// Write a synthetic JSON recording
    Simulate(SimulateArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Recording JSON file
    #[arg(long)]
    pub input: PathBuf,

    /// Extraction config JSON file, defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Output recording JSON file
    #[arg(long)]
    pub output: PathBuf,

    /// Recording length in seconds
    #[arg(long, default_value_t = 10.0)]
    pub duration: f64,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 250.0)]
    pub sampling_rate: f64,

    /// Scalp channels (1-19)
    #[arg(long, default_value_t = 19)]
    pub channels: usize,

    /// Channels without a scalp position
    #[arg(long, default_value_t = 0)]
    pub external: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Boundary annotation as ONSET:DURATION in seconds (repeatable)
    #[arg(long, value_parser = parse_boundary)]
    pub boundary: Vec<(f64, f64)>,
}

fn parse_boundary(value: &str) -> Result<(f64, f64), String> {
    let (onset, duration) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ONSET:DURATION, got '{}'", value))?;
    let onset: f64 = onset
        .trim()
        .parse()
        .map_err(|e| format!("invalid onset '{}': {}", onset, e))?;
    let duration: f64 = duration
        .trim()
        .parse()
        .map_err(|e| format!("invalid duration '{}': {}", duration, e))?;
    Ok((onset, duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary() {
        assert_eq!(parse_boundary("0.4:0.2"), Ok((0.4, 0.2)));
        assert_eq!(parse_boundary(" 3 : 1.5 "), Ok((3.0, 1.5)));
        assert!(parse_boundary("0.4").is_err());
        assert!(parse_boundary("a:1").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
