use std::collections::HashSet;

use glob::glob;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Expand glob patterns among the database arguments into concrete file paths.
///
/// Plain paths are passed through untouched so a missing file surfaces as a
/// not-found error later. A pattern matching no file is an error. Duplicates
/// are dropped, keeping the first occurrence.
pub fn expand_db_globs(inputs: &[String]) -> Result<Vec<String>, String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut results: Vec<String> = Vec::with_capacity(inputs.len());

    for input in inputs {
        if !has_glob_meta(input) {
            if seen.insert(input.clone()) {
                results.push(input.clone());
            }
            continue;
        }

        let paths = glob(input).map_err(|e| format!("Invalid glob pattern '{}': {}", input, e))?;
        let mut matched = false;
        for entry in paths {
            let path = entry.map_err(|e| format!("Cannot read '{}': {}", input, e))?;
            if !path.is_file() {
                continue;
            }
            matched = true;
            let s = path.to_string_lossy().to_string();
            if seen.insert(s.clone()) {
                results.push(s);
            }
        }

        if !matched {
            return Err(format!("No files match '{}'", input));
        }
    }

    Ok(results)
}
