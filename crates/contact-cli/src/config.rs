use crate::cli::Cli;
use crate::error::{CliError, Result};
use contact_matrix::engine::config::{self as core_config, ContactConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OUTPUT_FILE: &str = "contacts.dat";

/// Defaults read from a `--config` TOML file. Command-line values take precedence.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialContactConfig {
    cutoff: Option<f64>,
    index: Option<PathBuf>,
    output: Option<PathBuf>,
    progress_interval: Option<u64>,
}

/// Everything a run needs: the engine configuration plus the output destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub contact: ContactConfig,
    pub output: PathBuf,
}

impl PartialContactConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &Cli) -> Result<RunSettings> {
        let mut builder = core_config::ContactConfigBuilder::new()
            .structure_path(args.structure.clone())
            .trajectory_path(args.trajectory.clone())
            .selection_a(&args.selection_a)
            .selection_b(&args.selection_b);

        if let Some(index) = args.index.clone().or(self.index) {
            builder = builder.index_path(index);
        }
        if let Some(cutoff) = args.cutoff.or(self.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if let Some(interval) = self.progress_interval {
            builder = builder.progress_interval(interval);
        }

        let contact = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        let output = args
            .output
            .clone()
            .or(self.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        Ok(RunSettings { contact, output })
    }
}

/// Combines the optional configuration file with the command-line arguments.
pub fn resolve(args: &Cli) -> Result<RunSettings> {
    let partial = match &args.config {
        Some(path) => PartialContactConfig::from_file(path)?,
        None => PartialContactConfig::default(),
    };
    partial.merge_with_cli(args)
}
