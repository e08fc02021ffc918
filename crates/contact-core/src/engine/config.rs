use std::path::PathBuf;
use thiserror::Error;

/// Contact distance in nanometers used when none is given.
pub const DEFAULT_CUTOFF: f64 = 0.5;
/// Index file read when none is given.
pub const DEFAULT_INDEX_FILE: &str = "index.ndx";
/// Number of frames between two progress status updates.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    pub structure_path: PathBuf,
    /// Absent for a single-frame calculation on the structure itself.
    pub trajectory_path: Option<PathBuf>,
    pub index_path: PathBuf,
    pub selection_a: String,
    pub selection_b: String,
    /// Contact distance in nanometers. Pairs closer than this (strictly) are in contact.
    pub cutoff: f64,
    pub progress_interval: u64,
}

#[derive(Default)]
pub struct ContactConfigBuilder {
    structure_path: Option<PathBuf>,
    trajectory_path: Option<PathBuf>,
    index_path: Option<PathBuf>,
    selection_a: Option<String>,
    selection_b: Option<String>,
    cutoff: Option<f64>,
    progress_interval: Option<u64>,
}

impl ContactConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure_path(mut self, path: PathBuf) -> Self {
        self.structure_path = Some(path);
        self
    }
    pub fn trajectory_path(mut self, path: Option<PathBuf>) -> Self {
        self.trajectory_path = path;
        self
    }
    pub fn index_path(mut self, path: PathBuf) -> Self {
        self.index_path = Some(path);
        self
    }
    pub fn selection_a(mut self, expression: &str) -> Self {
        self.selection_a = Some(expression.to_string());
        self
    }
    pub fn selection_b(mut self, expression: &str) -> Self {
        self.selection_b = Some(expression.to_string());
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = Some(frames);
        self
    }

    pub fn build(self) -> Result<ContactConfig, ConfigError> {
        let cutoff = self.cutoff.unwrap_or(DEFAULT_CUTOFF);
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "cutoff",
                reason: format!("must be a positive distance, got {cutoff}"),
            });
        }

        let progress_interval = self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL);
        if progress_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "progress_interval",
                reason: "must be at least one frame".into(),
            });
        }

        Ok(ContactConfig {
            structure_path: self
                .structure_path
                .ok_or(ConfigError::MissingParameter("structure_path"))?,
            trajectory_path: self.trajectory_path,
            index_path: self
                .index_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_FILE)),
            selection_a: self
                .selection_a
                .ok_or(ConfigError::MissingParameter("selection_a"))?,
            selection_b: self
                .selection_b
                .ok_or(ConfigError::MissingParameter("selection_b"))?,
            cutoff,
            progress_interval,
        })
    }
}
