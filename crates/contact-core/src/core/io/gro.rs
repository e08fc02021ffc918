use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::structure::{SimBox, Structure};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: GroParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum GroParseErrorKind {
    #[error("Invalid atom count (value: '{0}')")]
    InvalidAtomCount(String),
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an atom record (must be at least 44 chars)")]
    LineTooShort,
    #[error("Box line must contain 3 or 9 values, found {0}")]
    InvalidBox(usize),
}

/// Upper bound on the atom buffer reserved from an unverified count line.
const MAX_PREALLOCATED_ATOMS: usize = 1 << 20;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// A single frame of a GRO file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroFrame {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub sim_box: SimBox,
    pub time: Option<f64>,
    pub step: Option<u64>,
}

impl GroFrame {
    pub fn into_structure(self) -> Structure {
        let mut structure = Structure::new(&self.title, self.atoms, self.sim_box);
        structure.time = self.time.unwrap_or(0.0);
        structure.step = self.step.unwrap_or(0);
        structure
    }
}

/// Line reader that keeps track of the current line number across frames.
pub(crate) struct GroLines<R> {
    reader: R,
    line_num: usize,
}

impl<R: BufRead> GroLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, GroError> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        let trimmed_len = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(trimmed_len);
        Ok(Some(buffer))
    }

    fn require_line(&mut self, record: &str) -> Result<String, GroError> {
        self.next_line()?
            .ok_or_else(|| GroError::MissingRecord(record.to_string()))
    }

    /// Reads the next frame.
    ///
    /// # Return
    ///
    /// Returns `Ok(None)` if the input is exhausted before a title line.
    pub fn read_frame(&mut self) -> Result<Option<GroFrame>, GroError> {
        let title = match self.next_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let (time, step) = parse_title(&title);

        let count_line = match self.next_line()? {
            Some(line) => line,
            // trailing blank line at the end of a trajectory
            None if title.trim().is_empty() => return Ok(None),
            None => return Err(GroError::MissingRecord("atom count".into())),
        };
        let atom_count: usize = count_line.trim().parse().map_err(|_| GroError::Parse {
            line: self.line_num,
            kind: GroParseErrorKind::InvalidAtomCount(count_line.trim().to_string()),
        })?;

        let mut atoms = Vec::with_capacity(atom_count.min(MAX_PREALLOCATED_ATOMS));
        for _ in 0..atom_count {
            let line = self.require_line("atom record")?;
            atoms.push(parse_atom_line(&line, self.line_num)?);
        }

        let box_line = self.require_line("box vectors")?;
        let sim_box = parse_box_line(&box_line, self.line_num)?;

        Ok(Some(GroFrame {
            title: title.trim().to_string(),
            atoms,
            sim_box,
            time,
            step,
        }))
    }
}

fn parse_title(title: &str) -> (Option<f64>, Option<u64>) {
    let mut time = None;
    let mut step = None;
    let mut tokens = title.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "t=" => time = tokens.next().and_then(|v| v.parse().ok()),
            "step=" => step = tokens.next().and_then(|v| v.parse().ok()),
            _ => {}
        }
    }
    (time, step)
}

fn parse_float_field(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, GroError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| GroError::Parse {
        line: line_num,
        kind: GroParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, GroError> {
    if line.len() < 44 {
        return Err(GroError::Parse {
            line: line_num,
            kind: GroParseErrorKind::LineTooShort,
        });
    }

    let res_num_str = slice_and_trim(line, 0, 5);
    let res_name = slice_and_trim(line, 5, 10);
    let atom_name = slice_and_trim(line, 10, 15);
    let atom_num_str = slice_and_trim(line, 15, 20);

    let residue_number: isize = res_num_str.parse().map_err(|_| GroError::Parse {
        line: line_num,
        kind: GroParseErrorKind::InvalidInt {
            columns: "1-5".into(),
            value: res_num_str.into(),
        },
    })?;
    let atom_number: usize = atom_num_str.parse().map_err(|_| GroError::Parse {
        line: line_num,
        kind: GroParseErrorKind::InvalidInt {
            columns: "16-20".into(),
            value: atom_num_str.into(),
        },
    })?;

    let x = parse_float_field(line, 20, 28, line_num)?;
    let y = parse_float_field(line, 28, 36, line_num)?;
    let z = parse_float_field(line, 36, 44, line_num)?;

    Ok(Atom::new(atom_number, atom_name, residue_number, res_name)
        .with_position(Point3::new(x, y, z)))
}

fn parse_box_line(line: &str, line_num: usize) -> Result<SimBox, GroError> {
    let values = line
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>().map_err(|_| GroError::Parse {
                line: line_num,
                kind: GroParseErrorKind::InvalidFloat {
                    columns: "box".into(),
                    value: v.into(),
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [x, y, z] => Ok(SimBox::orthorhombic(*x, *y, *z)),
        // v1(x) v2(y) v3(z) v1(y) v1(z) v2(x) v2(z) v3(x) v3(y)
        [v1x, v2y, v3z, v1y, v1z, v2x, v2z, v3x, v3y] => Ok(SimBox::from_vectors([
            [*v1x, *v1y, *v1z],
            [*v2x, *v2y, *v2z],
            [*v3x, *v3y, *v3z],
        ])),
        other => Err(GroError::Parse {
            line: line_num,
            kind: GroParseErrorKind::InvalidBox(other.len()),
        }),
    }
}

/// The Gromacs GRO structure format.
pub struct GroFile;

impl StructureFile for GroFile {
    type Error = GroError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut lines = GroLines::new(reader);
        let frame = lines
            .read_frame()?
            .ok_or_else(|| GroError::MissingRecord("title".into()))?;
        if frame.atoms.is_empty() {
            return Err(GroError::MissingRecord("atom records".into()));
        }
        Ok(frame.into_structure())
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let title = structure.title.split(" t=").next().unwrap_or_default();
        writeln!(
            writer,
            "{} t= {:.5} step= {}",
            title, structure.time, structure.step
        )?;
        writeln!(writer, "{:>5}", structure.atom_count())?;
        for atom in structure.atoms() {
            writeln!(
                writer,
                "{:>5}{:<5}{:>5}{:>5}{:>8.3}{:>8.3}{:>8.3}",
                atom.residue_number % 100_000,
                atom.residue_name,
                atom.name,
                atom.atom_number % 100_000,
                atom.position.x,
                atom.position.y,
                atom.position.z
            )?;
        }
        let lengths = structure.sim_box.lengths();
        writeln!(
            writer,
            "{:>10.5}{:>10.5}{:>10.5}",
            lengths.x, lengths.y, lengths.z
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::io::Cursor;

    const SIMPLE_GRO: &str = "\
Test system t= 10.00000 step= 5000
    3
    1ALA      N    1   0.000   0.100   0.200
    1ALA     CA    2   1.000   1.100   1.200
    2SOL     OW    3   2.500   2.600   2.700
   5.00000   6.00000   7.00000
";

    fn read(content: &str) -> Result<Structure, GroError> {
        GroFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_atoms_box_and_title_metadata() {
        let structure = read(SIMPLE_GRO).unwrap();

        assert_eq!(structure.title, "Test system t= 10.00000 step= 5000");
        assert_eq!(structure.atom_count(), 3);
        assert_eq!(structure.time, 10.0);
        assert_eq!(structure.step, 5000);
        assert_eq!(structure.sim_box.lengths(), &Vector3::new(5.0, 6.0, 7.0));

        let ca = &structure.atoms()[1];
        assert_eq!(ca.atom_number, 2);
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.residue_number, 1);
        assert_eq!(ca.residue_name, "ALA");
        assert_eq!(ca.position, Point3::new(1.0, 1.1, 1.2));

        let ow = &structure.atoms()[2];
        assert_eq!(ow.residue_name, "SOL");
        assert_eq!(ow.residue_number, 2);
    }

    #[test]
    fn title_without_time_defaults_to_zero() {
        let content = SIMPLE_GRO.replacen("Test system t= 10.00000 step= 5000", "Plain title", 1);
        let structure = read(&content).unwrap();
        assert_eq!(structure.time, 0.0);
        assert_eq!(structure.step, 0);
    }

    #[test]
    fn reads_triclinic_box() {
        let content = SIMPLE_GRO.replace(
            "   5.00000   6.00000   7.00000",
            "   5.00000   6.00000   7.00000   0.00000   0.00000   1.00000   0.00000   0.50000   0.50000",
        );
        let structure = read(&content).unwrap();
        assert_eq!(structure.sim_box.lengths(), &Vector3::new(5.0, 6.0, 7.0));
        assert!(structure.sim_box.is_triclinic());
    }

    #[test]
    fn invalid_atom_count_reports_line() {
        let content = SIMPLE_GRO.replacen("    3\n", "  abc\n", 1);
        match read(&content) {
            Err(GroError::Parse {
                line: 2,
                kind: GroParseErrorKind::InvalidAtomCount(value),
            }) => assert_eq!(value, "abc"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_coordinate_reports_columns() {
        let content = SIMPLE_GRO.replacen("   1.000   1.100", "   x.xxx   1.100", 1);
        match read(&content) {
            Err(GroError::Parse {
                line: 4,
                kind: GroParseErrorKind::InvalidFloat { columns, .. },
            }) => assert_eq!(columns, "21-28"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn short_atom_line_is_rejected() {
        let content = SIMPLE_GRO.replacen("    2SOL     OW    3   2.500   2.600   2.700", "    2SOL", 1);
        assert!(matches!(
            read(&content),
            Err(GroError::Parse {
                kind: GroParseErrorKind::LineTooShort,
                ..
            })
        ));
    }

    #[test]
    fn truncated_file_reports_missing_record() {
        let content = "Title\n    2\n    1ALA      N    1   0.000   0.100   0.200\n";
        assert!(matches!(read(content), Err(GroError::MissingRecord(_))));
    }

    #[test]
    fn huge_atom_count_without_records_is_an_error() {
        let result = read("huge\n99999999999999\n");
        assert!(matches!(result, Err(GroError::MissingRecord(ref record)) if record == "atom record"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(read(""), Err(GroError::MissingRecord(_))));
    }

    #[test]
    fn invalid_box_is_rejected() {
        let content = SIMPLE_GRO.replace("   5.00000   6.00000   7.00000", "   5.00000   6.00000");
        assert!(matches!(
            read(&content),
            Err(GroError::Parse {
                kind: GroParseErrorKind::InvalidBox(2),
                ..
            })
        ));
    }

    #[test]
    fn written_structure_can_be_read_back() {
        let original = read(SIMPLE_GRO).unwrap();
        let mut buffer = Vec::new();
        GroFile::write_to(&original, &mut buffer).unwrap();

        let reread = read(std::str::from_utf8(&buffer).unwrap()).unwrap();
        assert_eq!(reread.atom_count(), original.atom_count());
        assert_eq!(reread.step, original.step);
        for (a, b) in reread.atoms().iter().zip(original.atoms()) {
            assert_eq!(a.atom_number, b.atom_number);
            assert_eq!(a.name, b.name);
            assert!((a.position - b.position).norm() < 1e-9);
        }
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GroFile::read_from_path(dir.path().join("missing.gro"));
        assert!(matches!(result, Err(GroError::Io(_))));
    }
}
