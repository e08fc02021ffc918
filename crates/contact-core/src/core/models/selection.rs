use super::structure::Structure;
use std::slice;

/// An ordered, non-empty list of atoms of a [`Structure`], addressed by index.
///
/// A selection does not own any coordinates. It is resolved once against a
/// structure and then reads the current positions of that structure every time
/// a frame is processed. The order of the indices defines the row or column
/// order of the contact matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Creates a selection from atom indices.
    ///
    /// # Return
    ///
    /// Returns `None` if `indices` is empty.
    pub fn new(indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() {
            None
        } else {
            Some(Self { indices })
        }
    }

    /// Returns the number of selected atoms.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no atom is selected, which a constructed selection never is.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the selected atom indices in selection order.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns an iterator over the selected atom indices.
    pub fn iter(&self) -> slice::Iter<'_, usize> {
        self.indices.iter()
    }

    /// Returns the file atom numbers of the selected atoms, used as output labels.
    ///
    /// Indices that fall outside `structure` are skipped.
    pub fn atom_numbers(&self, structure: &Structure) -> Vec<usize> {
        self.indices
            .iter()
            .filter_map(|&i| structure.atom(i).map(|a| a.atom_number))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a usize;
    type IntoIter = slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::SimBox;

    #[test]
    fn empty_selection_is_rejected() {
        assert!(Selection::new(Vec::new()).is_none());
    }

    #[test]
    fn selection_preserves_index_order() {
        let selection = Selection::new(vec![2, 0, 1]).unwrap();
        assert_eq!(selection.len(), 3);
        assert!(!selection.is_empty());
        assert_eq!(selection.indices(), &[2, 0, 1]);
        assert_eq!(selection.iter().copied().collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn atom_numbers_follow_selection_order() {
        let structure = Structure::new(
            "test",
            vec![
                Atom::new(10, "A", 1, "RES"),
                Atom::new(20, "B", 1, "RES"),
                Atom::new(30, "C", 1, "RES"),
            ],
            SimBox::default(),
        );
        let selection = Selection::new(vec![2, 0]).unwrap();
        assert_eq!(selection.atom_numbers(&structure), vec![30, 10]);
    }
}
