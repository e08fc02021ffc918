use super::gro::GroError;
use super::gro_traj::GroTrajectory;
use super::xtc::XtcTrajectory;
use crate::core::models::structure::Structure;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("Could not open trajectory '{path}': {message}")]
    Open { path: String, message: String },
    #[error("Unsupported trajectory format '{0}' (expected .xtc or .gro)")]
    UnsupportedFormat(String),
    #[error("Failed to read frame {frame}: {message}")]
    Read { frame: usize, message: String },
    #[error("Frame {frame} contains {found} atoms, expected {expected}")]
    FrameAtomCount {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Failed to parse frame {frame}: {source}")]
    Gro {
        frame: usize,
        #[source]
        source: GroError,
    },
}

/// The outcome of requesting the next frame from a [`TrajectorySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The structure now holds the coordinates and box of a new frame.
    Updated,
    /// The trajectory has no further frames.
    EndOfStream,
}

/// A sequential reader of trajectory frames.
///
/// Each call to [`next_frame`](TrajectorySource::next_frame) overwrites the
/// positions, box, time, and step of the structure in place. The underlying
/// file is released when the source is dropped.
pub trait TrajectorySource {
    /// Returns the number of atoms declared by the trajectory.
    fn atom_count(&self) -> usize;

    /// Reads the next frame into `structure`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is corrupt or cannot be read. Reaching the
    /// end of the trajectory is not an error.
    fn next_frame(&mut self, structure: &mut Structure) -> Result<FrameStatus, TrajectoryError>;
}

/// Opens a trajectory file, choosing the reader from the file extension.
///
/// `.xtc` files are read as compressed Gromacs trajectories and `.gro` files
/// as a sequence of concatenated GRO frames.
///
/// # Errors
///
/// Returns [`TrajectoryError::UnsupportedFormat`] for other extensions and
/// [`TrajectoryError::Open`] if the file cannot be opened.
pub fn open_trajectory(path: &Path) -> Result<Box<dyn TrajectorySource>, TrajectoryError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    debug!("Opening trajectory {} (format: '{}').", path.display(), extension);

    match extension.as_str() {
        "xtc" => Ok(Box::new(XtcTrajectory::open(path)?)),
        "gro" => Ok(Box::new(GroTrajectory::open(path)?)),
        other => Err(TrajectoryError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.trr");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            open_trajectory(&path),
            Err(TrajectoryError::UnsupportedFormat(ext)) if ext == "trr"
        ));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_trajectory(&dir.path().join("missing.gro")),
            Err(TrajectoryError::Open { .. })
        ));
        assert!(matches!(
            open_trajectory(&dir.path().join("missing.xtc")),
            Err(TrajectoryError::Open { .. })
        ));
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.GRO");
        fs::write(
            &path,
            "t\n    1\n    1RES      X    1   0.000   0.000   0.000\n   1.0   1.0   1.0\n",
        )
        .unwrap();
        let source = open_trajectory(&path).unwrap();
        assert_eq!(source.atom_count(), 1);
    }
}
