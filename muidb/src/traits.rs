//! Traits for format-agnostic parsing and serialization in muidb.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one file of a given format.
///
/// # Example
///
/// ```rust,no_run
/// use muidb::traits::Parser;
/// use muidb::formats::ResxEntry;
///
/// let entries = Vec::<ResxEntry>::read_from("Strings.de.resx")?;
/// entries.write_to("Strings.copy.resx")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// The file is decoded BOM-aware, so UTF-16 files written by Windows
    /// tooling load the same as UTF-8 ones.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_str(&read_decoded(path)?)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(Error::Io)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Reads a whole file into a string, honoring a UTF-8 or UTF-16 BOM.
pub fn read_decoded<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(decoded)
}
