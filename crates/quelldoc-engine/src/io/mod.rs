//! File-level plumbing: locating the input document and writing the JSON
//! artifact next to it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::SourceDescription;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("source document not found: {0}")]
    NotFound(PathBuf),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),
}

/// Path of the input document `<dir>/<name>.docx`.
pub fn source_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.docx"))
}

/// Path of the output artifact `<dir>/<name>.json`, alongside the input.
pub fn target_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Checks that the source document exists before any parsing starts.
pub fn require_source(dir: &Path, name: &str) -> Result<PathBuf, IoError> {
    let path = source_path(dir, name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(IoError::NotFound(path))
    }
}

/// Serializes the record fully in memory, then writes it in one step. A
/// serialization failure therefore never leaves a truncated file behind.
pub fn write_json(path: &Path, description: &SourceDescription) -> Result<(), IoError> {
    let json = description.to_json()?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn sample() -> SourceDescription {
        SourceDescription {
            siglum: "B".to_string(),
            is_missing: false,
            source_type: "Skizzen.".to_string(),
            location: "CH-Bps.".to_string(),
            description: "1 Blatt.".to_string(),
            categories: IndexMap::new(),
            contents: vec![],
        }
    }

    #[test]
    fn paths_share_the_directory_and_stem() {
        let dir = Path::new("/data/quellen");
        assert_eq!(source_path(dir, "A"), Path::new("/data/quellen/A.docx"));
        assert_eq!(target_path(dir, "A"), Path::new("/data/quellen/A.json"));
    }

    #[test]
    fn missing_source_is_reported_with_its_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = require_source(dir.path(), "A").unwrap_err();
        match err {
            IoError::NotFound(path) => assert_eq!(path, dir.path().join("A.docx")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn existing_source_is_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.docx"), b"stub").unwrap();
        assert!(require_source(dir.path(), "A").is_ok());
    }

    #[test]
    fn write_json_produces_the_serialized_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.json");
        write_json(&path, &sample()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, sample().to_json().unwrap());
        assert!(written.ends_with('\n'));
    }
}
