//! Path discovery: expanding origin arguments into flat file lists.
//!
//! Resolution happens once, up front. Each origin is tagged as a file or a
//! directory, directories are walked recursively, and the engine's worker
//! loop only ever sees flat file targets afterwards.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::XlinesError;
use crate::Result;

/// A filesystem object handed to the counting engine.
///
/// The file/directory distinction is resolved here, once, rather than probed
/// repeatedly inside the counting loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A regular file to count
    File(PathBuf),
    /// A directory whose immediate children the worker flattens one level
    Directory(PathBuf),
}

impl Target {
    /// Tag an existing path as a file or directory target.
    pub fn resolve(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.is_dir() {
            Ok(Target::Directory(path))
        } else if path.is_file() {
            Ok(Target::File(path))
        } else {
            Err(XlinesError::PathNotFound(path))
        }
    }
}

/// How discovered paths are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// Absolute paths (default)
    #[default]
    Absolute,
    /// Paths relative to the current directory, `./`-normalized
    Relative,
}

/// Discover every file under `origin`.
///
/// A single file resolves to itself. A directory is walked recursively with
/// `.git` subtrees skipped; unreadable entries are skipped, never fatal. The
/// result is deduplicated and sorted for determinism.
pub fn locate_files(origin: &Path, style: PathStyle) -> Result<Vec<PathBuf>> {
    let root = match Target::resolve(origin)? {
        Target::File(path) => return Ok(vec![style_path(&path, style)]),
        Target::Directory(path) => path,
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            !(e.file_type().is_dir() && e.file_name() == ".git")
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable filesystem entry");
                continue;
            }
        };

        if entry.file_type().is_file() {
            files.push(style_path(entry.path(), style));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn style_path(path: &Path, style: PathStyle) -> PathBuf {
    match style {
        PathStyle::Absolute => std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()),
        PathStyle::Relative => relpath_normalize(path),
    }
}

/// Prepend `./` to bare relative paths so the output reads as filesystem
/// syntax; paths already anchored (`/`, `./`, `../`) pass through.
fn relpath_normalize(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if path.is_absolute() || s.starts_with("./") || s.starts_with("../") {
        path.to_path_buf()
    } else {
        Path::new(".").join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join("README.md"), "readme\n").unwrap();
        fs::write(root.join("src/main.py"), "print()\n").unwrap();
        fs::write(root.join("src/util.py"), "x = 1\n").unwrap();
        fs::write(root.join("docs/guide.txt"), "guide\n").unwrap();
        fs::write(root.join(".git/objects/abc"), "blob\n").unwrap();
    }

    #[test]
    fn test_locate_files_walks_recursively() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let files = locate_files(temp.path(), PathStyle::Absolute).unwrap();

        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|p| p.ends_with("src/main.py")));
        assert!(files.iter().any(|p| p.ends_with("docs/guide.txt")));
    }

    #[test]
    fn test_locate_files_skips_git() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let files = locate_files(temp.path(), PathStyle::Absolute).unwrap();

        assert!(!files.iter().any(|p| p.to_string_lossy().contains(".git")));
    }

    #[test]
    fn test_locate_files_sorted() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let files = locate_files(temp.path(), PathStyle::Absolute).unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_locate_single_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("alone.txt");
        fs::write(&file, "one\n").unwrap();

        let files = locate_files(&file, PathStyle::Absolute).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("alone.txt"));
    }

    #[test]
    fn test_locate_missing_path() {
        let temp = tempdir().unwrap();
        let result = locate_files(&temp.path().join("nope"), PathStyle::Absolute);
        assert!(matches!(result, Err(XlinesError::PathNotFound(_))));
    }

    #[test]
    fn test_target_resolution() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("f.txt");
        fs::write(&file, "x\n").unwrap();

        assert!(matches!(
            Target::resolve(&file).unwrap(),
            Target::File(_)
        ));
        assert!(matches!(
            Target::resolve(temp.path()).unwrap(),
            Target::Directory(_)
        ));
        assert!(Target::resolve(temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_relpath_normalize() {
        assert_eq!(
            relpath_normalize(Path::new("src/main.py")),
            PathBuf::from("./src/main.py")
        );
        assert_eq!(
            relpath_normalize(Path::new("../up.txt")),
            PathBuf::from("../up.txt")
        );
        assert_eq!(
            relpath_normalize(Path::new("/abs/p.txt")),
            PathBuf::from("/abs/p.txt")
        );
    }
}
