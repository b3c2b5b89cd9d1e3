use std::path::{Path, PathBuf};

use muidb::{ExportOptions, FormatType, MuiDbFile, OpenMode};
use tracing::{debug, info};

use crate::validation::{validate_file_path, validate_language_code, validate_output_path};

/// Merges one exchange file into the database and saves it. A missing
/// database is created.
pub fn import_file(db_path: &str, input: &str, format: FormatType, lang: &str) -> Result<(), String> {
    validate_file_path(input)?;
    validate_language_code(lang)?;

    let mut db = MuiDbFile::open(db_path, OpenMode::CreateIfMissing).map_err(|e| e.to_string())?;
    debug!("adding/updating resources for language '{}' from '{}'", lang, input);

    let result = db
        .import_file(input, format, lang)
        .map_err(|e| e.to_string())?;
    for id in &result.added {
        debug!("added '{}'", id);
    }
    for id in &result.updated {
        debug!("updated '{}'", id);
    }

    db.save().map_err(|e| e.to_string())?;
    info!(
        "imported {} resources ({} added, {} updated) into '{}'",
        result.total(),
        result.added.len(),
        result.updated.len(),
        db_path
    );
    Ok(())
}

/// Exports every target file declared in the database, relative to the
/// database's directory.
pub fn export_all(db_path: &str) -> Result<Vec<PathBuf>, String> {
    let db = MuiDbFile::open(db_path, OpenMode::OpenExisting).map_err(|e| e.to_string())?;
    let base_dir = match Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    for target in db.target_files() {
        debug!(
            "exporting language '{}' into file '{}'",
            target.lang,
            base_dir.join(&target.path).display()
        );
    }

    db.export_target_files(&base_dir).map_err(|e| e.to_string())
}

/// Exports one language into one file.
pub fn export_file(
    db_path: &str,
    output: &str,
    format: FormatType,
    lang: &str,
    include_comments: bool,
) -> Result<(), String> {
    validate_language_code(lang)?;
    validate_output_path(output)?;

    let db = MuiDbFile::open(db_path, OpenMode::OpenExisting).map_err(|e| e.to_string())?;
    let options = ExportOptions::new().with_comments(include_comments);

    debug!("exporting language '{}' into file '{}'", lang, output);
    db.export_file(output, format, lang, &options)
        .map_err(|e| e.to_string())
}

/// Re-saves the database in canonical form.
pub fn format(db_path: &str) -> Result<(), String> {
    let mut db = MuiDbFile::open(db_path, OpenMode::OpenExisting).map_err(|e| e.to_string())?;
    db.save().map_err(|e| e.to_string())?;
    debug!("formatted '{}'", db_path);
    Ok(())
}

/// Checks shape and completeness of the database.
pub fn validate(db_path: &str) -> Result<(), String> {
    let db = MuiDbFile::open(db_path, OpenMode::OpenExisting).map_err(|e| e.to_string())?;
    db.validate().map_err(|e| e.to_string())?;
    debug!("'{}' is valid", db_path);
    Ok(())
}
