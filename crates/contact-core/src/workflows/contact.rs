use crate::core::io::gro::GroFile;
use crate::core::io::ndx::GroupTable;
use crate::core::io::traits::StructureFile;
use crate::core::io::trajectory::open_trajectory;
use crate::core::select;
use crate::engine::config::ContactConfig;
use crate::engine::driver::{ContactAccumulator, run_single_frame, run_streaming};
use crate::engine::error::EngineError;
use crate::engine::matrix::ContactAnalysis;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Computes the contact-frequency matrix described by `config`.
///
/// The structure is loaded first, then the index groups (a missing or invalid
/// index file only disables named groups), then both selections. Without a
/// trajectory the structure's own coordinates form the single frame;
/// otherwise every trajectory frame is processed in order.
///
/// # Errors
///
/// Returns an [`EngineError`] if the structure cannot be loaded, a selection
/// is invalid or empty, the trajectory cannot be read or does not match the
/// structure, or the trajectory holds no frames.
#[instrument(skip_all, name = "contact_workflow")]
pub fn run(
    config: &ContactConfig,
    reporter: &ProgressReporter,
) -> Result<ContactAnalysis, EngineError> {
    // === Phase 1: Structure, index groups, and selections ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        "Loading structure from {}.",
        config.structure_path.display()
    );
    let mut structure = GroFile::read_from_path(&config.structure_path).map_err(|source| {
        EngineError::StructureLoad {
            path: config.structure_path.display().to_string(),
            source,
        }
    })?;
    info!(atoms = structure.atom_count(), "Structure loaded.");

    let groups = GroupTable::read_or_empty(&config.index_path, &structure);
    let selection_a = select::resolve(&structure, &config.selection_a, &groups)?;
    let selection_b = select::resolve(&structure, &config.selection_b, &groups)?;
    info!(
        atoms_a = selection_a.len(),
        atoms_b = selection_b.len(),
        "Selections resolved."
    );
    reporter.report(Progress::Message(format!(
        "Selected {} atoms in group A and {} atoms in group B.",
        selection_a.len(),
        selection_b.len()
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Contact accumulation ===
    let mut accumulator = ContactAccumulator::new(&selection_a, &selection_b, config.cutoff);
    match &config.trajectory_path {
        None => run_single_frame(&structure, &mut accumulator),
        Some(path) => {
            reporter.report(Progress::PhaseStart {
                name: "Trajectory",
            });
            info!("Reading trajectory {}.", path.display());
            let mut source = open_trajectory(path)?;
            let frames = run_streaming(
                &mut structure,
                source.as_mut(),
                &mut accumulator,
                config.progress_interval,
                reporter,
            )?;
            info!(frames, "Trajectory processed.");
            reporter.report(Progress::PhaseFinish);
        }
    }

    accumulator.finish(&structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::trajectory::TrajectoryError;
    use crate::core::select::SelectionError;
    use crate::engine::config::ContactConfigBuilder;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use xdrfile::{FileMode, Frame, Trajectory, XTCTrajectory};

    const TWO_ATOMS: &str = "\
Two atoms t= 0.00000 step= 0
    2
    1RES      A    1   0.000   0.000   0.000
    2RES      B    2   0.300   0.000   0.000
   5.00000   5.00000   5.00000
";

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config(dir: &TempDir, structure: &Path, trajectory: Option<PathBuf>) -> ContactConfig {
        ContactConfigBuilder::new()
            .structure_path(structure.to_path_buf())
            .trajectory_path(trajectory)
            .index_path(dir.path().join("index.ndx"))
            .selection_a("serial 1")
            .selection_b("serial 2")
            .build()
            .unwrap()
    }

    #[test]
    fn single_frame_uses_structure_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);

        let analysis = run(&config(&dir, &gro, None), &ProgressReporter::new()).unwrap();

        assert_eq!(analysis.frames(), 1);
        assert_eq!(analysis.frequency(0, 0), Some(1.0));
    }

    #[test]
    fn selection_sizes_are_reported_as_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);

        let messages = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));
        run(&config(&dir, &gro, None), &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            messages.into_inner().unwrap(),
            vec!["Selected 1 atoms in group A and 1 atoms in group B."]
        );
    }

    #[test]
    fn index_groups_can_be_selected_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);
        write(&dir, "index.ndx", "[ First ]\n1\n[ Second ]\n2\n");

        let mut config = config(&dir, &gro, None);
        config.selection_a = "First".into();
        config.selection_b = "Second".into();
        let analysis = run(&config, &ProgressReporter::new()).unwrap();

        assert_eq!(analysis.labels_a(), &[1]);
        assert_eq!(analysis.labels_b(), &[2]);
    }

    #[test]
    fn gro_trajectory_replaces_structure_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);
        let far = TWO_ATOMS.replace("   0.300   0.000   0.000", "   2.000   0.000   0.000");
        let traj = write(&dir, "traj.gro", &format!("{TWO_ATOMS}{far}{far}{far}"));

        let analysis = run(&config(&dir, &gro, Some(traj)), &ProgressReporter::new()).unwrap();

        assert_eq!(analysis.frames(), 4);
        assert_eq!(analysis.frequency(0, 0), Some(0.25));
    }

    #[test]
    fn xtc_trajectory_is_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);
        let xtc = dir.path().join("traj.xtc");

        let mut traj = XTCTrajectory::open(xtc.clone(), FileMode::Write).unwrap();
        let mut frame = Frame::with_len(2);
        frame.box_vector = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]];
        for (step, x) in [0.1f32, 1.9, 1.0].into_iter().enumerate() {
            frame.step = step;
            frame.time = step as f32;
            frame.coords[0] = [0.0, 0.0, 0.0];
            frame.coords[1] = [x, 0.0, 0.0];
            traj.write(&frame).unwrap();
        }
        traj.flush().unwrap();
        drop(traj);

        let analysis = run(&config(&dir, &gro, Some(xtc)), &ProgressReporter::new()).unwrap();

        assert_eq!(analysis.frames(), 3);
        let frequency = analysis.frequency(0, 0).unwrap();
        assert!((frequency - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn trajectory_with_other_atom_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);
        let traj = write(
            &dir,
            "traj.gro",
            "One\n    1\n    1RES      A    1   0.000   0.000   0.000\n   5.0   5.0   5.0\n",
        );

        let result = run(&config(&dir, &gro, Some(traj)), &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::AtomCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn empty_selection_is_reported_with_its_expression() {
        let dir = tempfile::tempdir().unwrap();
        let gro = write(&dir, "system.gro", TWO_ATOMS);
        let mut config = config(&dir, &gro, None);
        config.selection_b = "name XYZ".into();

        let result = run(&config, &ProgressReporter::new());
        match result {
            Err(EngineError::Selection(SelectionError::Empty { expression })) => {
                assert_eq!(expression, "name XYZ")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_structure_and_trajectory_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.gro");
        assert!(matches!(
            run(&config(&dir, &missing, None), &ProgressReporter::new()),
            Err(EngineError::StructureLoad { .. })
        ));

        let gro = write(&dir, "system.gro", TWO_ATOMS);
        let result = run(
            &config(&dir, &gro, Some(dir.path().join("missing.xtc"))),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Trajectory {
                source: TrajectoryError::Open { .. }
            })
        ));
    }
}
