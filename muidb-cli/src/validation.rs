use muidb::{FormatType, NEUTRAL_LANGUAGE};
use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is a file
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate language code format using unic-langid.
///
/// The neutral marker `*` is accepted as well.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    if lang == NEUTRAL_LANGUAGE {
        return Ok(());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Resolves the exchange format from `--format`, or from the file extension
/// when no format was given.
pub fn resolve_format(format: Option<&str>, path: &str) -> Result<FormatType, String> {
    match format {
        Some(name) => name.parse::<FormatType>().map_err(|_| {
            format!(
                "Unsupported format: {}. Supported formats: resx, xliff",
                name
            )
        }),
        None => FormatType::from_path(path).ok_or_else(|| {
            format!(
                "Cannot infer the format of {}. Pass --format resx or --format xliff",
                path
            )
        }),
    }
}
