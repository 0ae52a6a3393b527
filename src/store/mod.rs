use std::path::Path;

use serde_json::Value;

pub mod movies;
pub mod recommendations;
pub mod users;

pub use movies::MovieStore;
pub use recommendations::RecStore;
pub use users::UserStore;

/// Reads and parses one JSON data artifact
///
/// Missing or malformed files degrade to `None` with a log line instead of an
/// error, so the API keeps serving whatever artifacts are present.
pub(crate) fn load_json(path: &Path) -> Option<Value> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "Data file not readable");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!(path = %path.display(), error = %error, "Failed to parse data file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_json(&dir.path().join("absent.json")).is_none());
    }

    #[test]
    fn test_load_json_malformed_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_json(&path).is_none());
    }

    #[test]
    fn test_load_json_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.json");
        std::fs::write(&path, r#"[1, 2, 3]"#).unwrap();
        let value = load_json(&path).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }
}
