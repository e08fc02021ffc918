use super::trajectory::{FrameStatus, TrajectoryError, TrajectorySource};
use crate::core::models::structure::{SimBox, Structure};
use nalgebra::Point3;
use std::path::Path;
use xdrfile::{Frame, Trajectory, XTCTrajectory};

/// Reads compressed Gromacs XTC trajectories.
pub struct XtcTrajectory {
    traj: XTCTrajectory,
    frame: Frame,
    atom_count: usize,
    frames_read: usize,
}

impl XtcTrajectory {
    /// Opens an XTC file and reads its atom count.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::Open`] if the file cannot be opened or its
    /// header cannot be read.
    pub fn open(path: &Path) -> Result<Self, TrajectoryError> {
        let open_error = |err: xdrfile::Error| TrajectoryError::Open {
            path: path.display().to_string(),
            message: err.to_string(),
        };

        let mut traj = XTCTrajectory::open_read(path).map_err(open_error)?;
        let atom_count = traj.get_num_atoms().map_err(open_error)?;

        Ok(Self {
            traj,
            frame: Frame::with_len(atom_count),
            atom_count,
            frames_read: 0,
        })
    }
}

impl TrajectorySource for XtcTrajectory {
    fn atom_count(&self) -> usize {
        self.atom_count
    }

    fn next_frame(&mut self, structure: &mut Structure) -> Result<FrameStatus, TrajectoryError> {
        let frame_number = self.frames_read + 1;
        if let Err(err) = self.traj.read(&mut self.frame) {
            if err.is_eof() {
                return Ok(FrameStatus::EndOfStream);
            }
            return Err(TrajectoryError::Read {
                frame: frame_number,
                message: err.to_string(),
            });
        }

        if self.frame.coords.len() != structure.atom_count() {
            return Err(TrajectoryError::FrameAtomCount {
                frame: frame_number,
                expected: structure.atom_count(),
                found: self.frame.coords.len(),
            });
        }

        for (atom, [x, y, z]) in structure.atoms_mut().iter_mut().zip(&self.frame.coords) {
            atom.position = Point3::new(f64::from(*x), f64::from(*y), f64::from(*z));
        }
        structure.sim_box = SimBox::from_vectors(
            self.frame
                .box_vector
                .map(|row| row.map(f64::from)),
        );
        structure.time = f64::from(self.frame.time);
        structure.step = self.frame.step as u64;

        self.frames_read = frame_number;
        Ok(FrameStatus::Updated)
    }
}
