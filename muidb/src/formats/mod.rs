//! Exchange file formats MuiDB can import from and export to.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod resx;
pub mod xliff;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use resx::ResxEntry;
pub use xliff::{Format as XliffFormat, TransUnit};

use crate::Error;

/// Represents all supported exchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// .NET `.resx` resource file, one language per file.
    Resx,
    /// XLIFF 1.2 translation file (read only).
    Xliff,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use muidb::formats::FormatType;
/// assert_eq!(FormatType::Resx.to_string(), "resx");
/// assert_eq!(FormatType::Xliff.to_string(), "xliff");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Resx => write!(f, "resx"),
            FormatType::Xliff => write!(f, "xliff"),
        }
    }
}

/// Accepts `resx`, `xliff` and `xlf`, case-insensitive.
///
/// Returns [`crate::error::Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use muidb::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("ResX").unwrap(), FormatType::Resx);
/// assert_eq!(FormatType::from_str("xlf").unwrap(), FormatType::Xliff);
/// assert!(FormatType::from_str("csv").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "resx" => Ok(FormatType::Resx),
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Resx => "resx",
            FormatType::Xliff => "xlf",
        }
    }

    /// Infers the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Whether files of this format can be written.
    pub fn is_writable(&self) -> bool {
        matches!(self, FormatType::Resx)
    }
}
