//! Value parsers for CLI file arguments

use std::fs;
use std::path::PathBuf;

fn validate_readable_file(path_str: &str, what: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("{} does not exist: '{}'", what, path_str));
    }

    if !path.is_file() {
        return Err(format!("{} is not a file: '{}'", what, path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read {} '{}': {}", what.to_lowercase(), path_str, e)),
    }
}

/// Configuration file must exist and be readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file(path_str, "Configuration file")
}

/// Fixture and request files must exist, be readable and end in `.json`
pub fn validate_json_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = validate_readable_file(path_str, "Input file")?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(path),
        _ => Err(format!("Input file must be a .json file: '{}'", path_str)),
    }
}
