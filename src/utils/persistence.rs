//! JSON helpers for files under ~/.robot-runner/.
//!
//! Only reads happen here. The game keeps no state between sessions; the
//! directory holds the optional tuning file and the log.

use crate::constants::DATA_DIR_NAME;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Get the ~/.robot-runner/ directory path, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.robot-runner/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(data_dir()?.join(filename))
}

/// Load a JSON file from ~/.robot-runner/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    let path = match data_path(filename) {
        Ok(p) => p,
        Err(_) => return T::default(),
    };
    match fs::read_to_string(&path) {
        Ok(json) => parse_json_or_default(&json, &path.display().to_string()),
        Err(_) => T::default(),
    }
}

/// Parse JSON text, logging and falling back to `T::default()` on a malformed file.
pub fn parse_json_or_default<T: Default + serde::de::DeserializeOwned>(
    json: &str,
    source: &str,
) -> T {
    match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", source, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_exists() {
        let dir = data_dir().expect("data_dir should succeed");
        assert!(dir.exists());
        assert!(dir.ends_with(".robot-runner"));
    }

    #[test]
    fn test_data_path_format() {
        let path = data_path("test.json").expect("data_path should succeed");
        assert!(path.to_string_lossy().ends_with(".robot-runner/test.json"));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let val: Vec<String> = load_json_or_default("nonexistent_test_file_12345.json");
        assert!(val.is_empty());
    }

    #[test]
    fn test_parse_malformed_returns_default() {
        let val: Vec<u32> = parse_json_or_default("{not json", "inline");
        assert!(val.is_empty());

        let val: Vec<u32> = parse_json_or_default("[1, 2]", "inline");
        assert_eq!(val, vec![1, 2]);
    }
}
