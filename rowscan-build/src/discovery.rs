//! Input file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Expand input paths into an ordered list of Rust source files.
///
/// Files are taken as given; directories are walked recursively for `.rs`
/// files, skipping hidden entries and `target/`. Duplicates keep their first
/// position.
pub fn find_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(Error::NoInputPaths);
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingPath {
                path: path.to_path_buf(),
            });
        }

        let found = if path.is_dir() { walk_directory(path) } else { vec![path.to_path_buf()] };
        debug!("{}: {} file(s)", path.display(), found.len());

        for file in found {
            let key = file.canonicalize().unwrap_or_else(|_| file.clone());
            if seen.insert(key) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        return Err(Error::NoSourceFiles);
    }

    Ok(files)
}

fn walk_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !is_skipped(entry.file_name().to_string_lossy().as_ref())
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs")
        })
        .map(|entry| entry.into_path())
        .collect();

    // Sort for deterministic output
    files.sort();
    files
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || name == "target"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_paths() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(matches!(find_files(&paths), Err(Error::NoInputPaths)));
    }

    #[test]
    fn test_missing_paths() {
        let result = find_files(&["doesnt/exist", "not/here.txt"]);
        assert!(matches!(result, Err(Error::MissingPath { .. })));
    }

    #[test]
    fn test_walks_and_dedups() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("models/nested")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("models/b.rs"), "struct B {}").unwrap();
        fs::write(root.join("models/a.rs"), "struct A {}").unwrap();
        fs::write(root.join("models/nested/c.rs"), "struct C {}").unwrap();
        fs::write(root.join("models/notes.txt"), "not rust").unwrap();
        fs::write(root.join("target/out.rs"), "struct Out {}").unwrap();
        fs::write(root.join(".hidden/h.rs"), "struct H {}").unwrap();

        let files = find_files(&[root.to_path_buf(), root.join("models/a.rs")]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, ["models/a.rs", "models/b.rs", "models/nested/c.rs"]);
    }

    #[test]
    fn test_directory_without_sources() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("readme.md"), "# nothing").unwrap();
        assert!(matches!(find_files(&[temp_dir.path()]), Err(Error::NoSourceFiles)));
    }
}
