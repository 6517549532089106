use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bias correction of simulated river discharge.
#[derive(Parser)]
#[command(
    name = "hydrobias",
    version,
    about = "Detrended quantile-mapping bias correction and cross-validation for simulated discharge"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Cross-validate DQM over the configured quantile counts for every gauge.
    Cv(CvArgs),
    /// Train and store one production model per gauge.
    Train(TrainArgs),
    /// Correct the full simulated record of every gauge with its stored model.
    Correct(CorrectArgs),
}

/// Arguments for the `cv` subcommand.
#[derive(clap::Args)]
pub struct CvArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hydrobias.toml")]
    pub config: PathBuf,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only run these gauge ids (repeatable).
    #[arg(short, long = "gauge")]
    pub gauges: Vec<u32>,
}

/// Arguments for the `train` subcommand.
#[derive(clap::Args)]
pub struct TrainArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hydrobias.toml")]
    pub config: PathBuf,

    /// Override the model directory from config.
    #[arg(short, long)]
    pub models: Option<PathBuf>,

    /// Only train these gauge ids (repeatable).
    #[arg(short, long = "gauge")]
    pub gauges: Vec<u32>,
}

/// Arguments for the `correct` subcommand.
#[derive(clap::Args)]
pub struct CorrectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hydrobias.toml")]
    pub config: PathBuf,

    /// Override the corrected-series directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only correct these gauge ids (repeatable).
    #[arg(short, long = "gauge")]
    pub gauges: Vec<u32>,
}
