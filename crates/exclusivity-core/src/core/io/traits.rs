use crate::core::models::system::MolecularSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A coordinate file format that can be loaded into, and saved from, a [`MolecularSystem`].
///
/// Formats implement the stream methods; the `*_path` helpers add buffering around a file.
pub trait MolecularFile {
    type Error: Error + From<io::Error>;

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error>;

    fn write_to(system: &MolecularSystem, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Fails if the file cannot be opened or its contents do not parse.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MolecularSystem, Self::Error> {
        Self::read_from(&mut BufReader::new(File::open(path)?))
    }

    /// Saves `system` to `path`, replacing any existing file.
    ///
    /// The buffer is flushed before returning, so a full disk surfaces here rather than
    /// being lost on drop.
    fn write_to_path<P: AsRef<Path>>(system: &MolecularSystem, path: P) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to(system, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
