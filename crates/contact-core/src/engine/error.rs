use thiserror::Error;

use crate::core::io::gro::GroError;
use crate::core::io::trajectory::TrajectoryError;
use crate::core::select::SelectionError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to load structure from '{path}': {source}")]
    StructureLoad {
        path: String,
        #[source]
        source: GroError,
    },

    #[error("Trajectory error: {source}")]
    Trajectory {
        #[from]
        source: TrajectoryError,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Number of atoms in the trajectory ({found}) does not match the structure ({expected}).")]
    AtomCountMismatch { expected: usize, found: usize },

    #[error("No frames were processed")]
    NoFrames,
}
