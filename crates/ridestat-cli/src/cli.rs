use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ridestat::CorrectionMethod;

/// Directory searched for ride files when neither a flag nor a study file
/// names one.
pub const DATA_ENV: &str = "RIDESTAT_DATA";

#[derive(Debug, Parser)]
#[command(name = "ridestat", version, about = "A/B testing for ride-hailing pickup data")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inventory the ride files in a data directory
    Summary {
        #[arg(long, env = DATA_ENV, default_value = "data/raw")]
        data: PathBuf,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List built-in experiments and those declared in a study file
    List {
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Run a study and print or write its report
    Run(RunArgs),
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Study file (TOML, or YAML by extension)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Experiment to run; repeat for several. Defaults to the study's
    /// experiments.
    #[arg(long = "experiment", short = 'e', value_name = "NAME")]
    pub experiments: Vec<String>,

    #[arg(long, env = DATA_ENV)]
    pub data: Option<PathBuf>,

    /// Month token such as `apr14`; repeat for several
    #[arg(long = "month", value_name = "TOKEN")]
    pub months: Vec<String>,

    /// Maximum rows read per file
    #[arg(long)]
    pub sample_size: Option<usize>,

    #[arg(long)]
    pub alpha: Option<f64>,

    /// none, bonferroni, holm or benjamini_hochberg
    #[arg(long)]
    pub correction: Option<CorrectionMethod>,

    /// Bootstrap resamples for the difference in means
    #[arg(long, value_name = "RESAMPLES")]
    pub bootstrap: Option<usize>,

    /// Bootstrap seed
    #[arg(long, requires = "bootstrap")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Csv,
    Json,
}
