use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Prefix of the line holding the column labels.
const COLUMN_LABEL_PREFIX: &str = "       ";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: invalid value '{value}'")]
    InvalidValue { line: usize, value: String },
    #[error("Line {line}: expected {expected} values, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Report has no column labels")]
    MissingColumns,
}

/// Identifies the program that produced a report and how it was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub program: String,
    pub version: String,
    pub command_line: Vec<String>,
}

impl Provenance {
    pub fn new(program: &str, version: &str, command_line: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            version: version.to_string(),
            command_line,
        }
    }
}

/// A normalized contact-frequency table.
///
/// Columns are labeled with the atom numbers of selection A and rows with
/// those of selection B. Values are stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactReport {
    column_labels: Vec<usize>,
    row_labels: Vec<usize>,
    values: Vec<f64>,
}

impl ContactReport {
    /// Creates a report from labels and row-major values.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold one entry per (row, column) pair.
    pub fn new(column_labels: Vec<usize>, row_labels: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            column_labels.len() * row_labels.len(),
            "report values do not match its labels"
        );
        Self {
            column_labels,
            row_labels,
            values,
        }
    }

    pub fn column_labels(&self) -> &[usize] {
        &self.column_labels
    }

    pub fn row_labels(&self) -> &[usize] {
        &self.row_labels
    }

    /// Returns the frequency in row `row` (selection B) and column `column` (selection A).
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.row_labels.len() || column >= self.column_labels.len() {
            return None;
        }
        self.values.get(row * self.column_labels.len() + column).copied()
    }

    /// Returns the values of one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let width = self.column_labels.len();
        let start = row.checked_mul(width)?;
        self.values.get(start..start + width)
    }

    /// Writes the report with its provenance header.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_to(&self, provenance: &Provenance, writer: &mut impl Write) -> io::Result<()> {
        writeln!(
            writer,
            "# Generated with {} {}.",
            provenance.program, provenance.version
        )?;
        writeln!(writer, "# Command line: {}", provenance.command_line.join(" "))?;

        write!(writer, "{COLUMN_LABEL_PREFIX}")?;
        for label in &self.column_labels {
            write!(writer, "{label:6} ")?;
        }
        writeln!(writer)?;

        for (row, label) in self.row_labels.iter().enumerate() {
            write!(writer, "{label:6} ")?;
            for value in self.row(row).unwrap_or_default() {
                write!(writer, "{value:6.3} ")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Parses a report previously written by [`write_to`](Self::write_to).
    ///
    /// Comment lines and blank lines are skipped. The line starting with seven
    /// spaces holds the column labels; every other line is a row label
    /// followed by one value per column.
    ///
    /// # Errors
    ///
    /// Returns an error if a label or value cannot be parsed or a row has the
    /// wrong number of values.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, ReportError> {
        let mut column_labels: Option<Vec<usize>> = None;
        let mut row_labels = Vec::new();
        let mut values = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if line.starts_with(COLUMN_LABEL_PREFIX) {
                let labels = trimmed
                    .split_whitespace()
                    .map(|v| parse_value(v, line_num))
                    .collect::<Result<Vec<usize>, _>>()?;
                column_labels = Some(labels);
                continue;
            }

            let width = column_labels
                .as_ref()
                .map(Vec::len)
                .ok_or(ReportError::MissingColumns)?;
            let mut fields = trimmed.split_whitespace();
            let label = fields
                .next()
                .map(|v| parse_value(v, line_num))
                .transpose()?
                .unwrap_or_default();
            let row = fields
                .map(|v| parse_value(v, line_num))
                .collect::<Result<Vec<f64>, _>>()?;
            if row.len() != width {
                return Err(ReportError::RowLength {
                    line: line_num,
                    expected: width,
                    found: row.len(),
                });
            }
            row_labels.push(label);
            values.extend(row);
        }

        let column_labels = column_labels.ok_or(ReportError::MissingColumns)?;
        Ok(Self {
            column_labels,
            row_labels,
            values,
        })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let file = File::open(path)?;
        Self::read_from(&mut BufReader::new(file))
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, line: usize) -> Result<T, ReportError> {
    value.parse().map_err(|_| ReportError::InvalidValue {
        line,
        value: value.to_string(),
    })
}
