use nalgebra::Point3;

/// Represents a single atom of a loaded molecular structure.
///
/// The `atom_number` is the identifier written in the structure file. It is only
/// used for labeling output and is not guaranteed to be unique (GRO files wrap
/// atom numbers at 100000). Atoms are addressed internally by their position in
/// the owning [`Structure`](super::structure::Structure).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom number as written in the structure file.
    pub atom_number: usize,
    /// The name of the atom (e.g., "CA", "OW", "P").
    pub name: String,
    /// The residue number as written in the structure file.
    pub residue_number: isize,
    /// The name of the residue this atom belongs to (e.g., "POPC", "SOL").
    pub residue_name: String,
    /// The current coordinates of the atom in nanometers.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` positioned at the origin.
    ///
    /// # Arguments
    ///
    /// * `atom_number` - The identifier from the structure file.
    /// * `name` - The name of the atom.
    /// * `residue_number` - The residue number from the structure file.
    /// * `residue_name` - The name of the parent residue.
    pub fn new(atom_number: usize, name: &str, residue_number: isize, residue_name: &str) -> Self {
        Self {
            atom_number,
            name: name.to_string(),
            residue_number,
            residue_name: residue_name.to_string(),
            position: Point3::origin(),
        }
    }

    /// Returns the atom with its position replaced by `position`.
    pub fn with_position(mut self, position: Point3<f64>) -> Self {
        self.position = position;
        self
    }
}
