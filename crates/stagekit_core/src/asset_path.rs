//! Root-relative asset addressing
//!
//! Level files never store absolute paths. Every path on disk is relative to
//! the directory of the file that references it, and is resolved against
//! that directory when loaded. [`AssetPath`] keeps both forms in sync.
//!
//! All normalization is lexical: `.` and `..` segments and trailing
//! separators are folded without touching the filesystem, and symlinks are
//! not resolved. Case is never folded, so on case-insensitive filesystems two
//! spellings of one directory are treated as different directories.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A file location expressed both relative to a root directory and absolutely
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
    root: PathBuf,
    relative: String,
    absolute: PathBuf,
}

impl AssetPath {
    /// Build from an absolute location, deriving the path relative to `root`
    pub fn from_absolute(absolute: impl AsRef<Path>, root: impl AsRef<Path>) -> Self {
        let root = make_absolute(root.as_ref());
        let absolute = make_absolute(absolute.as_ref());
        let relative = relative_between(&absolute, &root);
        Self {
            root,
            relative,
            absolute,
        }
    }

    /// Build from a path relative to `root`
    ///
    /// Backslashes in `relative` are read as separators, so files written on
    /// any platform resolve the same way.
    pub fn from_relative(relative: &str, root: impl AsRef<Path>) -> Self {
        let root = make_absolute(root.as_ref());
        let relative = normalize_relative(relative);
        let absolute = normalize(&root.join(&relative));
        Self {
            root,
            relative,
            absolute,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Forward-slash relative form, as written to disk
    pub fn relative(&self) -> &str {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Keep the absolute location and recompute the relative form against a
    /// new root
    pub fn rebase(&mut self, new_root: impl AsRef<Path>) {
        self.root = make_absolute(new_root.as_ref());
        self.relative = relative_between(&self.absolute, &self.root);
    }

    /// A copy of this path rebased onto `new_root`
    pub fn rebased(&self, new_root: impl AsRef<Path>) -> Self {
        let mut path = self.clone();
        path.rebase(new_root);
        path
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative)
    }
}

/// Resolve a relative path against the current directory, lexically normalized
pub(crate) fn make_absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Fold `.` and `..` segments lexically
///
/// `..` never climbs above the filesystem root; leading `..` segments of a
/// relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

fn normalize_relative(relative: &str) -> String {
    let unified = relative.replace('\\', "/");
    let normalized = normalize(Path::new(&unified));
    to_forward_slashes(&normalized)
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn relative_between(absolute: &Path, root: &Path) -> String {
    let target: Vec<Component<'_>> = absolute.components().collect();
    let base: Vec<Component<'_>> = root.components().collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different volumes share nothing to climb out of
    if common == 0 {
        return to_forward_slashes(absolute);
    }

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base.len() {
        segments.push("..".to_string());
    }
    for component in &target[common..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}
