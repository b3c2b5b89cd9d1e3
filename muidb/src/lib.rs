#![forbid(unsafe_code)]
//! Localization database toolkit for Rust.
//!
//! A MuiDB document keeps every text of a project in one XML file: the
//! configured languages, and per item a text and workflow state for each
//! language plus a comment. From there, `.resx` resource files are exported
//! per language, and translations coming back as `.resx` or XLIFF files are
//! merged in.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use muidb::{ExportOptions, MuiDbFile, OpenMode};
//!
//! let mut db = MuiDbFile::open("Strings.xml", OpenMode::CreateIfMissing)?;
//! db.set_languages(["de", "en"]);
//! db.add_or_update_string("hello", "en", "Hello", "final", Some("Start page greeting"))?;
//! db.import_xliff("translations/de.xlf", "de")?;
//!
//! db.validate()?;
//! db.export_resx("Strings.de.resx", "de", &ExportOptions::new().with_sort_entries(true))?;
//! db.save()?;
//! # Ok::<(), muidb::Error>(())
//! ```
//!
//! # Workflow states
//!
//! Texts are stored with one of the MuiDB states `new`, `translated`,
//! `reviewed` and `final`. States from XLIFF 1.2 and XLIFF 2.0 are converted
//! on the way in, see [`state`].

pub mod document;
pub mod error;
mod exchange;
pub mod formats;
pub mod options;
pub mod schema;
pub mod state;
pub mod store;
pub mod traits;
pub mod types;
mod xml;

// Re-export most used types for easy consumption
pub use crate::{
    error::{Error, MissingTranslation},
    formats::FormatType,
    options::{ExportOptions, OpenMode},
    state::{MuiDbState, Vocabulary, Xliff12State, Xliff20State},
    store::MuiDbFile,
    types::{
        AddOrUpdateResult, DesignerFile, DesignerVisibility, Document, ImportResult, Item,
        NEUTRAL_LANGUAGE, Settings, Stats, TargetFile, TextItem,
    },
};
