use crate::core::models::conformer::Conformer;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing single-conformer geometry files.
///
/// Implementors handle format-specific parsing and serialization; the path-based
/// helpers take care of opening and buffering files.
pub trait GeometryFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a conformer from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Conformer, Self::Error>;

    /// Writes a conformer to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(conformer: &Conformer, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a conformer from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Conformer, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a conformer to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(conformer: &Conformer, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(conformer, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
