use super::gro::GroLines;
use super::trajectory::{FrameStatus, TrajectoryError, TrajectorySource};
use crate::core::models::structure::Structure;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// Reads a trajectory stored as concatenated GRO frames.
pub struct GroTrajectory {
    lines: GroLines<BufReader<File>>,
    atom_count: usize,
    frames_read: usize,
}

impl GroTrajectory {
    /// Opens a multi-frame GRO file and reads the atom count of its first frame.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::Open`] if the file cannot be opened or its
    /// header does not declare a valid atom count.
    pub fn open(path: &Path) -> Result<Self, TrajectoryError> {
        let open_error = |message: String| TrajectoryError::Open {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path).map_err(|e| open_error(e.to_string()))?;
        let mut reader = BufReader::new(file);

        let mut header = String::new();
        reader
            .read_line(&mut header)
            .map_err(|e| open_error(e.to_string()))?;
        header.clear();
        reader
            .read_line(&mut header)
            .map_err(|e| open_error(e.to_string()))?;
        let atom_count: usize = header
            .trim()
            .parse()
            .map_err(|_| open_error(format!("invalid atom count '{}'", header.trim())))?;

        reader.rewind().map_err(|e| open_error(e.to_string()))?;

        Ok(Self {
            lines: GroLines::new(reader),
            atom_count,
            frames_read: 0,
        })
    }
}

impl TrajectorySource for GroTrajectory {
    fn atom_count(&self) -> usize {
        self.atom_count
    }

    fn next_frame(&mut self, structure: &mut Structure) -> Result<FrameStatus, TrajectoryError> {
        let frame_number = self.frames_read + 1;
        let frame = match self.lines.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(FrameStatus::EndOfStream),
            Err(source) => {
                return Err(TrajectoryError::Gro {
                    frame: frame_number,
                    source,
                });
            }
        };

        if frame.atoms.len() != structure.atom_count() {
            return Err(TrajectoryError::FrameAtomCount {
                frame: frame_number,
                expected: structure.atom_count(),
                found: frame.atoms.len(),
            });
        }

        for (atom, source) in structure.atoms_mut().iter_mut().zip(&frame.atoms) {
            atom.position = source.position;
        }
        structure.sim_box = frame.sim_box;
        structure.time = frame.time.unwrap_or(structure.time);
        structure.step = frame.step.unwrap_or(structure.step);

        self.frames_read = frame_number;
        Ok(FrameStatus::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::gro::GroFile;
    use crate::core::io::traits::StructureFile;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::SimBox;
    use nalgebra::{Point3, Vector3};
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn frame(x: f64, edge: f64, time: f64) -> Structure {
        let atoms = vec![
            Atom::new(1, "A", 1, "RES").with_position(Point3::new(0.0, 0.0, 0.0)),
            Atom::new(2, "B", 2, "RES").with_position(Point3::new(x, 0.0, 0.0)),
        ];
        let mut structure = Structure::new("frame", atoms, SimBox::orthorhombic(edge, edge, edge));
        structure.time = time;
        structure.step = (time * 10.0) as u64;
        structure
    }

    fn write_trajectory(dir: &TempDir, frames: &[Structure]) -> std::path::PathBuf {
        let path = dir.path().join("traj.gro");
        let mut file = File::create(&path).unwrap();
        for structure in frames {
            GroFile::write_to(structure, &mut file).unwrap();
        }
        file.flush().unwrap();
        path
    }

    #[test]
    fn reads_frames_sequentially_until_end_of_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trajectory(&dir, &[frame(0.3, 5.0, 0.0), frame(0.8, 6.0, 10.0)]);

        let mut structure = frame(0.0, 1.0, 0.0);
        let mut source = GroTrajectory::open(&path).unwrap();
        assert_eq!(source.atom_count(), 2);

        assert_eq!(source.next_frame(&mut structure).unwrap(), FrameStatus::Updated);
        assert_eq!(structure.atoms()[1].position, Point3::new(0.3, 0.0, 0.0));
        assert_eq!(structure.sim_box.lengths(), &Vector3::new(5.0, 5.0, 5.0));

        assert_eq!(source.next_frame(&mut structure).unwrap(), FrameStatus::Updated);
        assert_eq!(structure.atoms()[1].position, Point3::new(0.8, 0.0, 0.0));
        assert_eq!(structure.sim_box.lengths(), &Vector3::new(6.0, 6.0, 6.0));
        assert_eq!(structure.time, 10.0);
        assert_eq!(structure.step, 100);

        assert_eq!(
            source.next_frame(&mut structure).unwrap(),
            FrameStatus::EndOfStream
        );
    }

    #[test]
    fn trailing_blank_line_ends_the_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trajectory(&dir, &[frame(0.3, 5.0, 0.0)]);
        let mut content = fs::read_to_string(&path).unwrap();
        content.push('\n');
        fs::write(&path, content).unwrap();

        let mut structure = frame(0.0, 1.0, 0.0);
        let mut source = GroTrajectory::open(&path).unwrap();
        assert_eq!(source.next_frame(&mut structure).unwrap(), FrameStatus::Updated);
        assert_eq!(
            source.next_frame(&mut structure).unwrap(),
            FrameStatus::EndOfStream
        );
    }

    #[test]
    fn frame_with_different_atom_count_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trajectory(&dir, &[frame(0.3, 5.0, 0.0)]);

        let mut structure = Structure::new(
            "three atoms",
            vec![
                Atom::new(1, "A", 1, "RES"),
                Atom::new(2, "B", 1, "RES"),
                Atom::new(3, "C", 1, "RES"),
            ],
            SimBox::default(),
        );
        let mut source = GroTrajectory::open(&path).unwrap();
        assert!(matches!(
            source.next_frame(&mut structure),
            Err(TrajectoryError::FrameAtomCount {
                frame: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn corrupt_frame_is_reported_with_frame_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trajectory(&dir, &[frame(0.3, 5.0, 0.0)]);
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("broken\n    2\n    1RES      A    1   0.000\n");
        fs::write(&path, content).unwrap();

        let mut structure = frame(0.0, 1.0, 0.0);
        let mut source = GroTrajectory::open(&path).unwrap();
        assert_eq!(source.next_frame(&mut structure).unwrap(), FrameStatus::Updated);
        assert!(matches!(
            source.next_frame(&mut structure),
            Err(TrajectoryError::Gro { frame: 2, .. })
        ));
    }

    #[test]
    fn invalid_header_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gro");
        fs::write(&path, "title\nnot-a-number\n").unwrap();
        assert!(matches!(
            GroTrajectory::open(&path),
            Err(TrajectoryError::Open { .. })
        ));
    }
}
