use crate::core::trajectory::InMemoryTrajectory;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for loading a trajectory file format into memory.
///
/// Implementors handle format-specific parsing and produce an
/// [`InMemoryTrajectory`] whose topology comes from the file itself.
pub trait TrajectoryFile {
    /// The error type for parse and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads every frame from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<InMemoryTrajectory, Self::Error>;

    /// Reads every frame from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryTrajectory, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
