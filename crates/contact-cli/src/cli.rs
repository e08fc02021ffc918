use clap::{ArgAction, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const CUTOFF_ERROR: &str = "Could not read cut-off value.";

#[derive(Parser, Debug)]
#[command(
    name = "contact",
    version,
    about = "Calculates the frequency of contacts between two selections of atoms over a Gromacs trajectory.",
    help_template = HELP_TEMPLATE,
    disable_help_flag = true,
)]
pub struct Cli {
    /// Print this message and exit
    #[arg(short = 'h', long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,

    // --- Input and Output ---
    /// Gro file with the structure of the system
    #[arg(short = 'c', long = "structure", required = true, value_name = "GRO_FILE")]
    pub structure: PathBuf,

    /// Trajectory to analyze (.xtc or multi-frame .gro); without it only the structure is used
    #[arg(short = 'f', long = "trajectory", value_name = "TRAJECTORY")]
    pub trajectory: Option<PathBuf>,

    /// Ndx file with named groups of atoms [default: index.ndx]
    #[arg(short = 'n', long = "index", value_name = "NDX_FILE")]
    pub index: Option<PathBuf>,

    /// Output file for the contact matrix [default: contacts.dat]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    // --- Selections ---
    /// First selection of atoms (columns of the matrix)
    #[arg(short = 'a', long = "selection-a", required = true, value_name = "SELECTION")]
    pub selection_a: String,

    /// Second selection of atoms (rows of the matrix)
    #[arg(short = 'b', long = "selection-b", required = true, value_name = "SELECTION")]
    pub selection_b: String,

    /// Cut-off distance for a contact in nm [default: 0.5]
    #[arg(
        short = 'u',
        long = "cutoff",
        value_name = "FLOAT",
        value_parser = parse_cutoff,
        allow_negative_numbers = true
    )]
    pub cutoff: Option<f64>,

    // --- Ambient Options ---
    /// TOML file with default values for cutoff, index, output, and progress-interval
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output and progress except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for the contact calculation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}

fn parse_cutoff(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|cutoff| cutoff.is_finite() && *cutoff > 0.0)
        .ok_or_else(|| CUTOFF_ERROR.to_string())
}
