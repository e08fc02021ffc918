//! Resolution of atom-selection expressions.
//!
//! An expression is either the exact name of an index group or a query such as
//! `resname POPC and name P`, `resid 1-20 or serial 5 to 9`, or
//! `not (name H* || Water)`. Keywords and operators are case-insensitive; atom
//! and residue names are matched case-sensitively and accept a trailing `*`
//! wildcard. Words that are not keywords refer to index groups.

mod eval;
mod parser;

use crate::core::io::ndx::GroupTable;
use crate::core::models::selection::Selection;
use crate::core::models::structure::Structure;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown group '{0}'")]
    UnknownGroup(String),
    #[error("Invalid selection '{expression}': {message}")]
    Syntax { expression: String, message: String },
    #[error("No atoms ('{expression}') found.")]
    Empty { expression: String },
}

/// Resolves `expression` to an ordered selection of atoms of `structure`.
///
/// An expression that exactly names a group of `groups` yields that group's
/// atoms in the order of the index file. Any other expression is parsed as a
/// query and yields the matching atoms in structure order.
///
/// # Errors
///
/// Returns [`SelectionError::UnknownGroup`] if the query refers to a missing
/// group, [`SelectionError::Syntax`] if it is malformed, and
/// [`SelectionError::Empty`] if no atom matches.
pub fn resolve(
    structure: &Structure,
    expression: &str,
    groups: &GroupTable,
) -> Result<Selection, SelectionError> {
    let trimmed = expression.trim();
    let empty = || SelectionError::Empty {
        expression: expression.to_string(),
    };

    if let Some(indices) = groups.get(trimmed) {
        debug!(group = trimmed, atoms = indices.len(), "Selection matched an index group.");
        return Selection::new(indices.to_vec()).ok_or_else(empty);
    }

    let expr = parser::parse(trimmed).map_err(|message| SelectionError::Syntax {
        expression: expression.to_string(),
        message,
    })?;
    let mask = eval::evaluate(&expr, structure, groups)?;
    let indices: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter(|&(_, &selected)| selected)
        .map(|(i, _)| i)
        .collect();

    debug!(expression, atoms = indices.len(), "Resolved selection query.");
    Selection::new(indices).ok_or_else(empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::SimBox;

    fn membrane() -> Structure {
        let atoms = vec![
            Atom::new(1, "P", 1, "POPC"),
            Atom::new(2, "C1", 1, "POPC"),
            Atom::new(3, "C2", 1, "POPC"),
            Atom::new(4, "P", 2, "POPE"),
            Atom::new(5, "CA", 3, "ALA"),
            Atom::new(6, "OW", 4, "SOL"),
            Atom::new(7, "HW1", 4, "SOL"),
        ];
        Structure::new("membrane", atoms, SimBox::orthorhombic(5.0, 5.0, 5.0))
    }

    fn groups() -> GroupTable {
        let mut groups = GroupTable::new();
        groups.insert("Protein", vec![4]);
        groups.insert("Reversed", vec![3, 0]);
        groups.insert("Upper Leaflet", vec![0, 1, 2]);
        groups.insert("Nothing", vec![]);
        groups
    }

    fn select(expression: &str) -> Result<Vec<usize>, SelectionError> {
        resolve(&membrane(), expression, &groups()).map(|s| s.indices().to_vec())
    }

    #[test]
    fn exact_group_name_keeps_index_file_order() {
        assert_eq!(select("Reversed").unwrap(), vec![3, 0]);
        assert_eq!(select("  Upper Leaflet ").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn keyword_queries_select_in_structure_order() {
        assert_eq!(select("name P").unwrap(), vec![0, 3]);
        assert_eq!(select("resname POPE POPC").unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(select("resid 3-4").unwrap(), vec![4, 5, 6]);
        assert_eq!(select("resnum 1 to 2 and name P").unwrap(), vec![0, 3]);
        assert_eq!(select("serial 7 2").unwrap(), vec![1, 6]);
        assert_eq!(select("index 1").unwrap(), vec![0]);
    }

    #[test]
    fn boolean_operators_combine_masks() {
        assert_eq!(select("resname POPC && !name P").unwrap(), vec![1, 2]);
        assert_eq!(select("not (resname POPC or resname SOL)").unwrap(), vec![3, 4]);
        assert_eq!(
            select("all and not all").unwrap_err().to_string(),
            "No atoms ('all and not all') found."
        );
    }

    #[test]
    fn wildcards_match_name_prefixes() {
        assert_eq!(select("name C*").unwrap(), vec![1, 2, 4]);
        assert_eq!(select("resname PO*").unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(matches!(select("name p"), Err(SelectionError::Empty { .. })));
    }

    #[test]
    fn groups_can_be_combined_with_queries() {
        assert_eq!(select("Protein or name OW").unwrap(), vec![4, 5]);
        assert_eq!(select("'Upper Leaflet' and name C*").unwrap(), vec![1, 2]);
    }

    #[test]
    fn unknown_group_is_reported() {
        assert_eq!(
            select("Membrane or name P"),
            Err(SelectionError::UnknownGroup("Membrane".into()))
        );
    }

    #[test]
    fn empty_matches_are_errors() {
        assert_eq!(
            select("name XYZ"),
            Err(SelectionError::Empty {
                expression: "name XYZ".into()
            })
        );
        assert!(matches!(select("Nothing"), Err(SelectionError::Empty { .. })));
    }

    #[test]
    fn syntax_errors_carry_the_expression() {
        match select("resid 1 to") {
            Err(SelectionError::Syntax { expression, .. }) => assert_eq!(expression, "resid 1 to"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
