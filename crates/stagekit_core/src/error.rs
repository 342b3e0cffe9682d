//! Error type shared by every level operation

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading, editing or saving level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Malformed input in {context}: {message}")]
    Malformed { context: String, message: String },
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No screen named '{0}'")]
    ScreenNotFound(String),
    #[error("Position ({x}, {y}) is outside the {width}x{height} screen")]
    OutOfRange {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("Invalid join: {0}")]
    InvalidJoin(String),
    #[error("Tile id {id} is not in the tileset ({count} tiles)")]
    InvalidTileId { id: u32, count: usize },
    #[error("The name '{0}' is already in use")]
    DuplicateName(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Broad failure categories, for callers that only need to branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    NotFound,
    OutOfRange,
    InvalidReference,
    Unsupported,
    Io,
}

impl LevelError {
    pub fn malformed(context: impl Into<String>, message: impl ToString) -> Self {
        LevelError::Malformed {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LevelError::Malformed { .. } => ErrorKind::MalformedInput,
            LevelError::NotFound(_) | LevelError::ScreenNotFound(_) => ErrorKind::NotFound,
            LevelError::OutOfRange { .. } | LevelError::InvalidJoin(_) => ErrorKind::OutOfRange,
            LevelError::InvalidTileId { .. }
            | LevelError::DuplicateName(_)
            | LevelError::InvalidReference(_) => ErrorKind::InvalidReference,
            LevelError::Unsupported(_) => ErrorKind::Unsupported,
            LevelError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Read a whole file, reporting a missing file as [`LevelError::NotFound`]
pub(crate) fn read_to_string(path: &Path) -> Result<String, LevelError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LevelError::NotFound(path.to_path_buf()),
        _ => LevelError::Io(e),
    })
}

/// Write a file by way of a sibling temporary file, so a failed write never
/// leaves a truncated file behind
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), LevelError> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            LevelError::malformed("map.json", "missing field `tiles`").kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            LevelError::ScreenNotFound("Boss".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LevelError::InvalidTileId { id: 9, count: 2 }.kind(),
            ErrorKind::InvalidReference
        );
        assert_eq!(
            LevelError::Unsupported("remove tile").kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        match read_to_string(&missing) {
            Err(LevelError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp.path().join("out.txt.tmp").exists());
    }
}
