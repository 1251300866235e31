use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use exclusivity::core::selection::ChainSelector;
use exclusivity::engine::config::AlignmentAtoms;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Compare two complexes that share a protein and report whether their partners bind overlapping, mutually exclusive sites.",
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

    /// Directory that receives the timestamped error log of failed comparisons
    #[arg(long, global = true, value_name = "DIR")]
    pub error_log_dir: Option<PathBuf>,

    /// Set the number of threads used by `batch`.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two PDB structures given explicit common and test chains.
    Compare(CompareArgs),
    /// Compare the two dimers named on one manifest line (e.g. 'P1-P2|P1-P3').
    Pair(PairArgs),
    /// Compare every dimer pair listed in a manifest file.
    Batch(BatchArgs),
}

/// Settings shared by every subcommand that runs a comparison.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the contact distance cutoff in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the number of outlier-rejection cycles of the superposition.
    #[arg(long, value_name = "INT")]
    pub align_cycles: Option<usize>,

    /// Override the outlier rejection threshold, in multiples of the current RMSD.
    #[arg(long, value_name = "FLOAT")]
    pub outlier_cutoff: Option<f64>,

    /// Override which atoms take part in the superposition (all, backbone, ca).
    #[arg(long, value_name = "ATOMS")]
    pub align_atoms: Option<AlignmentAtoms>,

    /// Override the report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.cutoff=5.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First structure; it is superposed onto the second.
    #[arg(long, required = true, value_name = "PATH")]
    pub pdb1: PathBuf,

    /// Second structure, which fixes the reference frame.
    #[arg(long, required = true, value_name = "PATH")]
    pub pdb2: PathBuf,

    /// Common protein chain in the first structure ('A' or 'chain A').
    #[arg(long, required = true, value_name = "CHAIN")]
    pub common_ch1: ChainSelector,

    /// Common protein chain in the second structure.
    #[arg(long, required = true, value_name = "CHAIN")]
    pub common_ch2: ChainSelector,

    /// Partner chain tested in the first structure.
    #[arg(long, required = true, value_name = "CHAIN")]
    pub test_ch1: ChainSelector,

    /// Partner chain tested in the second structure.
    #[arg(long, required = true, value_name = "CHAIN")]
    pub test_ch2: ChainSelector,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Save the first structure, superposed onto the second, as PDB.
    #[arg(long, value_name = "PATH")]
    pub write_aligned: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Where dimer structures live and how manifest lines are split.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Separator between the two proteins of a dimer (default '-').
    #[arg(long, value_name = "DELIM", allow_hyphen_values = true)]
    pub pair_delim: Option<String>,

    /// Separator between the two dimers of a line (default '|').
    #[arg(long, value_name = "DELIM", allow_hyphen_values = true)]
    pub dimer_delim: Option<String>,

    /// Directory containing one '<label>/<label>.pdb' folder per dimer.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub structure_root: PathBuf,

    /// Directory for the '<label1>_<label2>_overlap.txt' reports (default 'overlap_results').
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `pair` subcommand.
#[derive(Args, Debug)]
pub struct PairArgs {
    /// Manifest line naming two dimers that share a protein.
    #[arg(long, required = true, value_name = "LINE", allow_hyphen_values = true)]
    pub input_line: String,

    /// Save the first structure, superposed onto the second, as PDB.
    #[arg(long, value_name = "PATH")]
    pub write_aligned: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Manifest file with one dimer pair per line; blank lines and '#' comments are skipped.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Write a CSV summary with one row per manifest line.
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}
