use super::atom::Atom;
use nalgebra::Vector3;

const OFF_DIAGONAL_TOLERANCE: f64 = 1e-6;

/// The periodic simulation cell of a frame.
///
/// Only the diagonal of the box matrix (three edge lengths) enters distance
/// calculations. Boxes read with non-zero off-diagonal components are flagged
/// as triclinic so that callers can warn about the approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    lengths: Vector3<f64>,
    triclinic: bool,
}

impl SimBox {
    /// Creates a rectangular box from its three edge lengths in nanometers.
    pub fn orthorhombic(x: f64, y: f64, z: f64) -> Self {
        Self {
            lengths: Vector3::new(x, y, z),
            triclinic: false,
        }
    }

    /// Creates a box from a row-major 3x3 matrix of box vectors.
    ///
    /// Row `i` holds box vector `i`. The diagonal is kept as the edge lengths and
    /// the box is flagged as triclinic if any off-diagonal element is non-zero.
    pub fn from_vectors(vectors: [[f64; 3]; 3]) -> Self {
        let triclinic = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .filter(|(i, j)| i != j)
            .any(|(i, j)| vectors[i][j].abs() > OFF_DIAGONAL_TOLERANCE);

        Self {
            lengths: Vector3::new(vectors[0][0], vectors[1][1], vectors[2][2]),
            triclinic,
        }
    }

    /// Returns the three edge lengths of the box.
    #[inline]
    pub fn lengths(&self) -> &Vector3<f64> {
        &self.lengths
    }

    /// Returns `true` if the source box had non-zero off-diagonal components.
    #[inline]
    pub fn is_triclinic(&self) -> bool {
        self.triclinic
    }

    /// Returns `true` if every edge length is strictly positive.
    pub fn is_periodic(&self) -> bool {
        self.lengths.iter().all(|&l| l > 0.0)
    }
}

impl Default for SimBox {
    fn default() -> Self {
        Self::orthorhombic(0.0, 0.0, 0.0)
    }
}

/// A loaded molecular structure together with the state of its current frame.
///
/// The structure owns all atom positions. Trajectory sources overwrite the
/// positions, the box, and the time/step of the current frame in place, while
/// selections keep referring to atoms by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    /// The title line of the structure file.
    pub title: String,
    atoms: Vec<Atom>,
    /// The simulation box of the current frame.
    pub sim_box: SimBox,
    /// The simulation time of the current frame in picoseconds.
    pub time: f64,
    /// The simulation step of the current frame.
    pub step: u64,
}

impl Structure {
    /// Creates a structure from a list of atoms and a box.
    pub fn new(title: &str, atoms: Vec<Atom>, sim_box: SimBox) -> Self {
        Self {
            title: title.to_string(),
            atoms,
            sim_box,
            time: 0.0,
            step: 0,
        }
    }

    /// Returns the number of atoms in the structure.
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns all atoms in file order.
    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns a mutable view of all atoms, used by trajectory sources to update positions.
    #[inline]
    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    /// Retrieves an atom by its zero-based index.
    #[inline]
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }
}
