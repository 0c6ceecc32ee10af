use crate::utils::parser;
use biorun_core::core::tools::proteinmpnn::MODEL_NAMES;
use biorun_core::engine::config::BenchmarkSetting;
use clap::builder::PossibleValuesParser;
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
    author = "Tony Kan, Ted Yu",
    version,
    about = "biorun - Run ColabFold, Foldseek and ProteinMPNN inside Docker containers.",
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

    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RuntimeArgs {
    /// Path to a TOML configuration file. Defaults to `config.toml` in the user config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Host directory mounted at /data inside the containers. Defaults to the working directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub mount_root: Option<PathBuf>,

    /// Docker executable to invoke.
    #[arg(long, global = true, value_name = "PATH")]
    pub docker: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S foldseek.threads=16
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict a protein structure with ColabFold.
    Colabfold(ColabfoldArgs),
    /// Search structures against a Foldseek database.
    Foldseek(FoldseekArgs),
    /// Design sequences for a backbone with ProteinMPNN.
    Proteinmpnn(ProteinmpnnArgs),
    /// Benchmark ProteinMPNN over a directory of structures and log the runs to CSV.
    ProteinmpnnBench(BenchArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ColabfoldArgs {
    /// Input FASTA or A3M file.
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: PathBuf,

    /// Output directory.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Model type passed to colabfold_batch.
    #[arg(long, value_name = "TYPE")]
    pub model_type: Option<String>,

    /// Number of models to predict.
    #[arg(long, value_name = "INT")]
    pub num_models: Option<u32>,

    /// Number of recycles.
    #[arg(long, value_name = "INT")]
    pub num_recycles: Option<u32>,

    /// Maximum number of cluster sequences.
    #[arg(long, value_name = "INT")]
    pub max_seq: Option<u32>,

    /// Maximum number of extra sequences.
    #[arg(long, value_name = "INT")]
    pub max_extra_seq: Option<u32>,

    /// Legacy combined value: an integer, `max_seq:max_extra_seq`, or `auto`.
    #[arg(long, value_name = "VALUE")]
    pub max_msa: Option<String>,

    #[command(flatten)]
    pub gpu: GpuToggle,
}

/// Mutually exclusive switches for the container's GPU access.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct GpuToggle {
    /// Request all GPUs for the container.
    #[arg(long)]
    pub gpu: bool,
    /// Run without GPU access.
    #[arg(long)]
    pub no_gpu: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FoldseekArgs {
    /// A single PDB file inside the input directory to search. Searches every `*.pdb` when omitted.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Directory holding the query structures.
    #[arg(long = "input", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving one `<stem>_fs.tsv` per query.
    #[arg(long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Foldseek database path (prefix of the database files).
    #[arg(long = "db", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Scratch directory for Foldseek.
    #[arg(long = "tmp", value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Comma-separated output columns.
    #[arg(long, value_name = "FIELDS")]
    pub format: Option<String>,

    /// Job identifier. Enables the completion marker and job info files.
    #[arg(long, value_name = "ID")]
    pub job_id: Option<String>,

    /// Search sensitivity.
    #[arg(long, value_name = "FLOAT")]
    pub sensitivity: Option<f64>,

    /// E-value threshold.
    #[arg(long, value_name = "FLOAT")]
    pub evalue: Option<f64>,

    /// Maximum number of results per query.
    #[arg(long, value_name = "INT")]
    pub max_seqs: Option<u32>,

    /// Threads used by Foldseek.
    #[arg(long, value_name = "INT")]
    pub threads: Option<u32>,

    /// Minimum TM-score. Ignored for databases without CA coordinates.
    #[arg(long, value_name = "FLOAT")]
    pub tmscore_threshold: Option<f64>,

    /// Minimum alignment coverage.
    #[arg(long, value_name = "FLOAT")]
    pub coverage: Option<f64>,

    /// Minimum sequence identity.
    #[arg(long, value_name = "FLOAT")]
    pub min_seq_id: Option<f64>,

    /// Alignment mode.
    #[arg(long, value_name = "INT")]
    pub alignment_mode: Option<u32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProteinmpnnArgs {
    /// Input PDB file.
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: PathBuf,

    /// Chains to design, space separated, or `all`.
    #[arg(long, value_name = "CHAINS")]
    pub chains: Option<String>,

    /// Number of sequences to design.
    #[arg(long, value_name = "INT")]
    pub num_designs: Option<u32>,

    /// Sampling temperature(s), passed through verbatim.
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<String>,

    /// Amino acids to exclude from designs.
    #[arg(long, value_name = "AAS")]
    pub omit_aa: Option<String>,

    /// Output directory.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Model weights.
    #[arg(long, value_name = "NAME", value_parser = PossibleValuesParser::new(MODEL_NAMES))]
    pub model_name: Option<String>,

    /// Batch size.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<u32>,

    /// Use the CA-only model.
    #[arg(long)]
    pub ca_only: bool,

    /// Maximum sequence length.
    #[arg(long, value_name = "INT")]
    pub max_length: Option<u32>,

    /// Random seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Save per-sequence scores (0 or 1).
    #[arg(long, value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
    pub save_score: Option<u8>,

    /// Save per-position probabilities (0 or 1).
    #[arg(long, value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
    pub save_probs: Option<u8>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BenchArgs {
    /// Directory scanned for `*.pdb` structures.
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving one subdirectory per run.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// CSV log, recreated on every invocation.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Benchmark setting as SEQUENCES@TEMPERATURE. Repeat to run several. Example: --setting 5@0.1
    #[arg(long = "setting", value_name = "N@T", value_parser = parser::parse_setting)]
    pub settings: Vec<BenchmarkSetting>,

    /// Random seed passed to every run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Per-run timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip the pauses between runs and between settings.
    #[arg(long)]
    pub no_pause: bool,
}
