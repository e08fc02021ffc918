use crate::core::models::structure::Structure;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum NdxError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: atom index found before any group header")]
    IndexOutsideGroup { line: usize },
    #[error("Line {line}: invalid group header '{content}'")]
    InvalidHeader { line: usize, content: String },
    #[error("Line {line}: invalid atom index '{value}'")]
    InvalidIndex { line: usize, value: String },
    #[error("Line {line}: atom index {index} is out of range (structure has {atom_count} atoms)")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        atom_count: usize,
    },
}

/// Named groups of atoms read from a Gromacs NDX index file.
///
/// Groups keep the order in which they appear in the file, and each group keeps
/// the order of its atoms. Atom indices are stored zero-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<(String, Vec<usize>)>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of groups in the table.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Looks up a group by its exact (case-sensitive) name.
    ///
    /// If a name occurs several times in the file, the last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&[usize]> {
        self.groups
            .iter()
            .rev()
            .find(|(group_name, _)| group_name == name)
            .map(|(_, indices)| indices.as_slice())
    }

    /// Adds a group of zero-based atom indices.
    pub fn insert(&mut self, name: &str, indices: Vec<usize>) {
        self.groups.push((name.to_string(), indices));
    }

    /// Parses an NDX file, validating the atom indices against `structure`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed headers, non-numeric indices, or indices
    /// outside the structure.
    pub fn read_from(reader: &mut impl BufRead, structure: &Structure) -> Result<Self, NdxError> {
        let atom_count = structure.atom_count();
        let mut table = GroupTable::new();
        let mut current: Option<(String, Vec<usize>)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| NdxError::InvalidHeader {
                        line: line_num,
                        content: trimmed.to_string(),
                    })?;
                if let Some((group_name, indices)) = current.take() {
                    table.groups.push((group_name, indices));
                }
                current = Some((name.to_string(), Vec::new()));
                continue;
            }

            let (_, indices) = current
                .as_mut()
                .ok_or(NdxError::IndexOutsideGroup { line: line_num })?;
            for value in trimmed.split_whitespace() {
                let index: usize = value.parse().map_err(|_| NdxError::InvalidIndex {
                    line: line_num,
                    value: value.to_string(),
                })?;
                if index == 0 || index > atom_count {
                    return Err(NdxError::IndexOutOfRange {
                        line: line_num,
                        index,
                        atom_count,
                    });
                }
                indices.push(index - 1);
            }
        }

        if let Some((group_name, indices)) = current.take() {
            table.groups.push((group_name, indices));
        }
        Ok(table)
    }

    /// Parses an NDX file from a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_from_path<P: AsRef<Path>>(
        path: P,
        structure: &Structure,
    ) -> Result<Self, NdxError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, structure)
    }

    /// Reads an NDX file, returning an empty table if it cannot be read.
    ///
    /// Named groups are optional: selections that only use structural keywords
    /// keep working without them, so a missing or malformed index file is not
    /// an error.
    pub fn read_or_empty<P: AsRef<Path>>(path: P, structure: &Structure) -> Self {
        let path = path.as_ref();
        match Self::read_from_path(path, structure) {
            Ok(table) => {
                debug!(
                    groups = table.len(),
                    "Read index groups from {}.",
                    path.display()
                );
                table
            }
            Err(e) => {
                info!(
                    "Index file {} could not be read ({}); continuing without named groups.",
                    path.display(),
                    e
                );
                Self::new()
            }
        }
    }
}
