//! All error types for the muidb crate.
//!
//! Every fallible operation of the store, the state converter and the
//! interchange formats returns [`Error`]. The library never prints; callers
//! format these themselves.

use std::{fmt, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Blank input or a violated precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A non-blank workflow state that belongs to no known vocabulary.
    #[error("the state '{state}' is unknown and can not be converted to a valid {target} state")]
    UnrecognizedState { state: String, target: &'static str },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("{}", format_missing(.0))]
    MissingTranslations(Vec<MissingTranslation>),

    #[error("'{0}' is not a configured language.")]
    UnconfiguredLanguage(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument(message.into())
    }

    /// Returns the offending pairs if this is a missing-translations failure.
    pub fn missing_translations(&self) -> Option<&[MissingTranslation]> {
        match self {
            Error::MissingTranslations(missing) => Some(missing),
            _ => None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(quick_xml::Error::InvalidAttr(value))
    }
}

/// An item that lacks a resolvable text for one language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissingTranslation {
    pub id: String,
    pub language: String,
}

impl MissingTranslation {
    pub fn new(id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
        }
    }
}

impl fmt::Display for MissingTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.language)
    }
}

fn format_missing(missing: &[MissingTranslation]) -> String {
    missing
        .iter()
        .map(|m| {
            format!(
                "'{}' misses a translation in language '{}'.",
                m.id, m.language
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
