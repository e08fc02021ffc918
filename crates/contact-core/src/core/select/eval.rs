use super::SelectionError;
use super::parser::{Expr, NumericField, TextField};
use crate::core::io::ndx::GroupTable;
use crate::core::models::structure::Structure;

/// Evaluates `expr` to a per-atom membership mask over `structure`.
pub(crate) fn evaluate(
    expr: &Expr,
    structure: &Structure,
    groups: &GroupTable,
) -> Result<Vec<bool>, SelectionError> {
    let atoms = structure.atoms();
    let mask = match expr {
        Expr::All => vec![true; atoms.len()],
        Expr::Not(inner) => evaluate(inner, structure, groups)?
            .into_iter()
            .map(|selected| !selected)
            .collect(),
        Expr::And(lhs, rhs) => combine(lhs, rhs, structure, groups, |a, b| a && b)?,
        Expr::Or(lhs, rhs) => combine(lhs, rhs, structure, groups, |a, b| a || b)?,
        Expr::Text { field, patterns } => atoms
            .iter()
            .map(|atom| {
                let value = match field {
                    TextField::ResidueName => atom.residue_name.as_str(),
                    TextField::AtomName => atom.name.as_str(),
                };
                patterns.iter().any(|p| p.matches(value))
            })
            .collect(),
        Expr::Numeric { field, ranges } => atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                let value = match field {
                    NumericField::ResidueNumber => atom.residue_number as i64,
                    NumericField::AtomNumber => atom.atom_number as i64,
                    NumericField::Index => i as i64 + 1,
                };
                ranges.iter().any(|r| r.contains(&value))
            })
            .collect(),
        Expr::Group(name) => {
            let indices = groups
                .get(name)
                .ok_or_else(|| SelectionError::UnknownGroup(name.clone()))?;
            let mut mask = vec![false; atoms.len()];
            for &i in indices {
                if let Some(selected) = mask.get_mut(i) {
                    *selected = true;
                }
            }
            mask
        }
    };
    Ok(mask)
}

fn combine(
    lhs: &Expr,
    rhs: &Expr,
    structure: &Structure,
    groups: &GroupTable,
    op: impl Fn(bool, bool) -> bool,
) -> Result<Vec<bool>, SelectionError> {
    let left = evaluate(lhs, structure, groups)?;
    let right = evaluate(rhs, structure, groups)?;
    Ok(left.into_iter().zip(right).map(|(a, b)| op(a, b)).collect())
}
