use crate::core::io::trajectory::{FrameStatus, TrajectorySource};
use crate::core::models::selection::Selection;
use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use crate::engine::matrix::{ContactAnalysis, ContactMatrix};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, warn};

/// Accumulates contacts between two fixed selections over a sequence of frames.
pub struct ContactAccumulator<'a> {
    selection_a: &'a Selection,
    selection_b: &'a Selection,
    cutoff: f64,
    matrix: ContactMatrix,
    frames: u64,
    triclinic_warned: bool,
    open_box_warned: bool,
}

impl<'a> ContactAccumulator<'a> {
    pub fn new(selection_a: &'a Selection, selection_b: &'a Selection, cutoff: f64) -> Self {
        Self {
            selection_a,
            selection_b,
            cutoff,
            matrix: ContactMatrix::new(selection_a.len(), selection_b.len()),
            frames: 0,
            triclinic_warned: false,
            open_box_warned: false,
        }
    }

    /// Adds the current frame of `structure` to the counts.
    pub fn process_frame(&mut self, structure: &Structure) {
        if structure.sim_box.is_triclinic() && !self.triclinic_warned {
            warn!(
                "Triclinic box detected; distances use only the box diagonal and may be inaccurate."
            );
            self.triclinic_warned = true;
        }
        if !structure.sim_box.is_periodic() && !self.open_box_warned {
            warn!(
                "Box has a non-positive edge length; distances along that axis are not wrapped."
            );
            self.open_box_warned = true;
        }
        self.matrix
            .accumulate(structure, self.selection_a, self.selection_b, self.cutoff);
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn matrix(&self) -> &ContactMatrix {
        &self.matrix
    }

    /// Finalizes the counts, labeling rows and columns with atom numbers from `structure`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoFrames`] if no frame was processed.
    pub fn finish(self, structure: &Structure) -> Result<ContactAnalysis, EngineError> {
        ContactAnalysis::new(
            self.matrix,
            self.frames,
            self.selection_a.atom_numbers(structure),
            self.selection_b.atom_numbers(structure),
        )
    }
}

/// Processes the coordinates already loaded in `structure` as the only frame.
pub fn run_single_frame(structure: &Structure, accumulator: &mut ContactAccumulator) {
    debug!("No trajectory supplied; using the structure as a single frame.");
    accumulator.process_frame(structure);
}

/// Streams every frame of `source` through `accumulator`.
///
/// A status update is reported every `progress_interval` frames. Reading stops
/// at the end of the trajectory; any read error aborts the run.
///
/// # Return
///
/// Returns the number of frames processed.
///
/// # Errors
///
/// Returns [`EngineError::AtomCountMismatch`] before reading any frame if the
/// trajectory and structure disagree on the number of atoms,
/// [`EngineError::Trajectory`] if a frame cannot be read, and
/// [`EngineError::NoFrames`] if the trajectory holds no frames.
pub fn run_streaming(
    structure: &mut Structure,
    source: &mut dyn TrajectorySource,
    accumulator: &mut ContactAccumulator,
    progress_interval: u64,
    reporter: &ProgressReporter,
) -> Result<u64, EngineError> {
    let expected = structure.atom_count();
    let found = source.atom_count();
    if expected != found {
        return Err(EngineError::AtomCountMismatch { expected, found });
    }

    reporter.report(Progress::TaskStart);

    let mut frames = 0u64;
    loop {
        match source.next_frame(structure)? {
            FrameStatus::EndOfStream => break,
            FrameStatus::Updated => {
                accumulator.process_frame(structure);
                frames += 1;
                reporter.report(Progress::TaskIncrement);

                if progress_interval > 0 && frames % progress_interval == 0 {
                    let text = format!("Step: {}. Time: {:.0} ps", structure.step, structure.time);
                    debug!(frames, "{}", text);
                    reporter.report(Progress::StatusUpdate { text });
                }
            }
        }
    }

    reporter.report(Progress::TaskFinish);

    if frames == 0 {
        return Err(EngineError::NoFrames);
    }
    debug!(frames, "Reached the end of the trajectory.");
    Ok(frames)
}
