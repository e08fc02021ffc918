use crate::error::{CliError, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// An output file that only replaces its destination once it is committed.
///
/// Data is written to a temporary file next to the destination. Dropping the
/// `OutputFile` without calling [`commit`](Self::commit) removes the temporary
/// file and leaves any existing destination untouched.
pub struct OutputFile {
    destination: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl OutputFile {
    /// Creates the temporary file in the destination's directory.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] if the directory is not writable.
    pub fn create(destination: &Path) -> Result<Self> {
        let directory = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file = tempfile::Builder::new()
            .prefix(".contact-")
            .suffix(".tmp")
            .tempfile_in(directory)
            .map_err(|source| CliError::Output {
                path: destination.to_path_buf(),
                source,
            })?;
        debug!("Writing output through temporary file {:?}", file.path());

        Ok(Self {
            destination: destination.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn writer(&mut self) -> &mut impl Write {
        &mut self.writer
    }

    /// Flushes the data and atomically moves it to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] if flushing or renaming fails.
    pub fn commit(self) -> Result<()> {
        let destination = self.destination;
        let output_error = |source| CliError::Output {
            path: destination.clone(),
            source,
        };

        let file = self
            .writer
            .into_inner()
            .map_err(|e| output_error(e.into_error()))?;
        file.persist(&destination)
            .map_err(|e| output_error(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn commit_writes_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("contacts.dat");

        let mut output = OutputFile::create(&destination).unwrap();
        writeln!(output.writer(), "matrix").unwrap();
        output.commit().unwrap();

        assert_eq!(fs::read_to_string(&destination).unwrap(), "matrix\n");
        assert_eq!(entries(dir.path()), vec!["contacts.dat"]);
    }

    #[test]
    fn dropping_without_commit_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("contacts.dat");
        fs::write(&destination, "previous").unwrap();

        {
            let mut output = OutputFile::create(&destination).unwrap();
            writeln!(output.writer(), "partial").unwrap();
        }

        assert_eq!(fs::read_to_string(&destination).unwrap(), "previous");
        assert_eq!(entries(dir.path()), vec!["contacts.dat"]);
    }

    #[test]
    fn missing_directory_fails_at_creation() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("missing").join("contacts.dat");
        assert!(matches!(
            OutputFile::create(&destination),
            Err(CliError::Output { .. })
        ));
    }
}
