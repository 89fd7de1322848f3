use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Jérôme Eberhardt",
    version,
    about = "brmsf - Bootstrap RMSF with confidence intervals for molecular dynamics trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for bootstrap iterations.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-residue bootstrap RMSF of a trajectory and write it as CSV.
    Run(RunArgs),
    /// Render a previously computed RMSF table as an SVG line plot with uncertainty band.
    Plot(PlotArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the input trajectory (multi-model PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub trajectory: PathBuf,

    /// Path for the output CSV table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Bootstrap Overrides ---
    /// Number of bootstrap iterations.
    #[arg(short = 'n', long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Seed for every random draw; a random seed is drawn and logged when absent.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub interval: IntervalArgs,

    #[command(flatten)]
    pub sampling: SamplingArgs,

    // --- Selection Overrides ---
    /// Atom names to analyse (e.g. CA). Can be repeated.
    #[arg(long = "atom-name", value_name = "NAME")]
    pub atom_names: Vec<String>,

    /// Residue names to analyse. Can be repeated.
    #[arg(long = "resname", value_name = "NAME")]
    pub resnames: Vec<String>,

    /// Segment (or chain) identifiers to analyse. Can be repeated.
    #[arg(long = "segid", value_name = "ID")]
    pub segids: Vec<String>,

    /// Inclusive residue number range, e.g. '1-120' or '42'.
    #[arg(long, value_name = "START-END")]
    pub residues: Option<String>,

    // --- Output ---
    /// Also render the result table as an SVG plot at this path.
    #[arg(long, value_name = "PATH")]
    pub plot: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S bootstrap.iterations=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive choice of interval statistic.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct IntervalArgs {
    /// Report a pivot confidence interval at this significance level, in (0, 0.5).
    #[arg(long, value_name = "FLOAT")]
    pub alpha: Option<f64>,

    /// Report the mean and standard deviation of the bootstrap replicates instead.
    #[arg(long)]
    pub mean_std: bool,
}

/// How the base frame sample is drawn.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SamplingArgs {
    /// Draw this many frames instead of using the whole trajectory.
    #[arg(long, value_name = "INT", conflicts_with = "all_frames")]
    pub sample_size: Option<usize>,

    /// Draw the frame sample without replacement (requires --sample-size).
    #[arg(long, requires = "sample_size")]
    pub without_replacement: bool,

    /// Use every frame once, overriding a sample size from the config file.
    #[arg(long)]
    pub all_frames: bool,
}

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Path to a CSV table written by `brmsf run`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output SVG image.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file; only its [plot] section is used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Upper bound of the y axis. Defaults to the largest value plus one.
    #[arg(long, value_name = "FLOAT")]
    pub ymax: Option<f64>,

    /// Residue number of the first residue; shifts the x axis by start - 1.
    #[arg(long, value_name = "INT", allow_negative_numbers = true)]
    pub start_resid: Option<isize>,
}
