use crate::input::InputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use kappa::engine::symbols::SymbolAlphabet;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The Kappa Developers",
    version,
    about = "KAPPA CLI - Compression-based structural order parameters (CID) for molecular-simulation snapshots.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute CID metrics for one or more snapshot files.
    Analyze(AnalyzeArgs),
    /// Discover snapshots in a directory, evaluate them all and write a CSV table.
    Batch(BatchArgs),
    /// Compute the CID of an arbitrary byte sequence stored in a file.
    Cid(CidArgs),
}

/// Symbol alphabet used to encode voxel counts.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetArg {
    /// ASCII digits, counts up to 9
    Digits,
    /// Raw bytes, counts up to 255
    Bytes,
}

impl From<AlphabetArg> for SymbolAlphabet {
    fn from(arg: AlphabetArg) -> Self {
        match arg {
            AlphabetArg::Digits => SymbolAlphabet::Digits,
            AlphabetArg::Bytes => SymbolAlphabet::Bytes,
        }
    }
}

/// Options shared by every command that evaluates snapshots.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Snapshot format. Detected from the file extension when omitted.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Grid resolution per axis (power of two).
    #[arg(short, long, value_name = "INT")]
    pub nbins: Option<usize>,

    /// Side of the cubic binning box. Overrides the box read from LAMMPS headers.
    #[arg(short, long, value_name = "FLOAT")]
    pub box_size: Option<f64>,

    /// Number of shuffled baselines (0 reports the raw CID only).
    #[arg(long, value_name = "INT")]
    pub n_shuffles: Option<usize>,

    /// Seed for the shuffled baselines.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Keep only these particle types, e.g. '1,2'.
    #[arg(long, value_name = "LIST")]
    pub types: Option<String>,

    /// Symbol alphabet for voxel counts.
    #[arg(long, value_enum, value_name = "ALPHABET")]
    pub alphabet: Option<AlphabetArg>,

    /// Saturate counts the alphabet cannot represent instead of failing.
    #[arg(long)]
    pub clip: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S normalization.n-shuffles=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Snapshot files to evaluate.
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Write the results to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Discovery and scheduling options of the `batch` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct BatchOptions {
    /// Glob pattern, relative to the directory, selecting snapshot files.
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Maximum number of snapshots evaluated at the same time.
    #[arg(long, value_name = "INT")]
    pub max_in_flight: Option<usize>,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing the snapshots.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Path of the CSV results table.
    #[arg(short, long, value_name = "PATH", default_value = "cid_results.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub batch: BatchOptions,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for the `cid` subcommand.
#[derive(Args, Debug)]
pub struct CidArgs {
    /// File whose bytes form the sequence.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print 'length<TAB>factors<TAB>cid'.
    #[arg(long, conflicts_with = "breakdown")]
    pub tab: bool,

    /// Print a human-readable breakdown of the estimate.
    #[arg(long)]
    pub breakdown: bool,

    /// Also compute the shuffle-normalized CID with this many baselines.
    #[arg(long, value_name = "INT")]
    pub n_shuffles: Option<usize>,

    /// Seed for the shuffled baselines.
    #[arg(long, value_name = "INT", default_value_t = 0)]
    pub seed: u64,
}
