use crate::core::io::report::ContactReport;
use crate::core::models::atom::Atom;
use crate::core::models::selection::Selection;
use crate::core::models::structure::{SimBox, Structure};
use crate::core::utils::geometry::distance;
use crate::engine::error::EngineError;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Matrices with fewer cells are always accumulated on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_CELLS: usize = 16_384;

/// Per-pair contact counts between two selections.
///
/// Row `i` belongs to the `i`-th atom of selection A and column `j` to the
/// `j`-th atom of selection B. The dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMatrix {
    rows: usize,
    columns: usize,
    counts: Vec<u64>,
}

impl ContactMatrix {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            counts: vec![0; rows * columns],
        }
    }

    /// Returns `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u64> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.counts.get(row * self.columns + column).copied()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts one frame: every pair closer than `cutoff` gains one contact.
    ///
    /// Distances are measured between the current positions of `structure`
    /// under the minimum-image convention of its current box.
    pub fn accumulate(
        &mut self,
        structure: &Structure,
        selection_a: &Selection,
        selection_b: &Selection,
        cutoff: f64,
    ) {
        debug_assert_eq!(selection_a.len(), self.rows);
        debug_assert_eq!(selection_b.len(), self.columns);

        if self.columns == 0 {
            return;
        }

        let atoms = structure.atoms();
        let sim_box = &structure.sim_box;
        let others = selection_b.indices();

        #[cfg(feature = "parallel")]
        if self.counts.len() >= PARALLEL_MIN_CELLS {
            self.counts
                .par_chunks_mut(self.columns)
                .zip(selection_a.indices().par_iter())
                .for_each(|(row, &a)| {
                    accumulate_row(row, &atoms[a].position, others, atoms, sim_box, cutoff)
                });
            return;
        }

        for (row, &a) in self
            .counts
            .chunks_mut(self.columns)
            .zip(selection_a.indices())
        {
            accumulate_row(row, &atoms[a].position, others, atoms, sim_box, cutoff);
        }
    }
}

#[inline]
fn accumulate_row(
    row: &mut [u64],
    origin: &Point3<f64>,
    others: &[usize],
    atoms: &[Atom],
    sim_box: &SimBox,
    cutoff: f64,
) {
    for (count, &b) in row.iter_mut().zip(others) {
        if distance(origin, &atoms[b].position, sim_box) < cutoff {
            *count += 1;
        }
    }
}

/// The finished result of a contact calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactAnalysis {
    matrix: ContactMatrix,
    frames: u64,
    labels_a: Vec<usize>,
    labels_b: Vec<usize>,
}

impl ContactAnalysis {
    /// # Errors
    ///
    /// Returns [`EngineError::NoFrames`] if `frames` is zero.
    pub fn new(
        matrix: ContactMatrix,
        frames: u64,
        labels_a: Vec<usize>,
        labels_b: Vec<usize>,
    ) -> Result<Self, EngineError> {
        if frames == 0 {
            return Err(EngineError::NoFrames);
        }
        debug_assert_eq!(matrix.dimensions(), (labels_a.len(), labels_b.len()));
        Ok(Self {
            matrix,
            frames,
            labels_a,
            labels_b,
        })
    }

    pub fn matrix(&self) -> &ContactMatrix {
        &self.matrix
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Atom numbers of selection A, in selection order.
    pub fn labels_a(&self) -> &[usize] {
        &self.labels_a
    }

    /// Atom numbers of selection B, in selection order.
    pub fn labels_b(&self) -> &[usize] {
        &self.labels_b
    }

    /// Fraction of frames in which atom `a` of selection A touched atom `b` of selection B.
    pub fn frequency(&self, a: usize, b: usize) -> Option<f64> {
        self.matrix
            .get(a, b)
            .map(|count| count as f64 / self.frames as f64)
    }

    /// Builds the output table: one row per atom of selection B, one column
    /// per atom of selection A.
    pub fn to_report(&self) -> ContactReport {
        let (rows_a, columns_b) = self.matrix.dimensions();
        let mut values = Vec::with_capacity(rows_a * columns_b);
        for b in 0..columns_b {
            for a in 0..rows_a {
                values.push(self.frequency(a, b).unwrap_or_default());
            }
        }
        ContactReport::new(self.labels_a.clone(), self.labels_b.clone(), values)
    }
}
