//! Input discovery
//!
//! Expands the paths given on the command line into the list of files to
//! rewrite. Directories are walked respecting `.gitignore` unless told
//! otherwise; only notebooks and Python sources are picked up from them.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::file_utils::SourceKind;

/// Configuration for input discovery.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    /// Include hidden and ignored files when walking directories.
    pub show_all: bool,
    /// Descend only this many levels below each directory argument.
    pub max_depth: Option<usize>,
}

/// Expand `paths` into files, in argument order; directory contents sorted.
pub fn collect_inputs(paths: &[PathBuf], config: &SourceConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = path.metadata().map_err(|e| Error::io(path, e))?;
        if metadata.is_dir() {
            files.extend(walk_directory(path, config));
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn walk_directory(root: &Path, config: &SourceConfig) -> Vec<PathBuf> {
    let filtering = !config.show_all;
    let walker = WalkBuilder::new(root)
        .hidden(filtering)
        .ignore(filtering)
        .git_ignore(filtering)
        .git_global(filtering)
        .git_exclude(filtering)
        // .gitignore applies even outside a git checkout
        .require_git(false)
        .max_depth(config.max_depth)
        .build();

    let mut files: Vec<PathBuf> = walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| SourceKind::is_discoverable(path))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nb/deep")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("a.py"), "import os").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("nb/b.ipynb"), "{}").unwrap();
        fs::write(root.join("nb/deep/c.py"), "").unwrap();
        fs::write(root.join("nb/scratch.py"), "").unwrap();
        fs::write(root.join(".hidden/d.py"), "").unwrap();
        fs::write(root.join(".gitignore"), "scratch.py\n").unwrap();
        dir
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walk_respects_gitignore_and_hidden() {
        let dir = setup();
        let files = collect_inputs(&[dir.path().to_path_buf()], &SourceConfig::default()).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["a.py", "nb/b.ipynb", "nb/deep/c.py"]);
    }

    #[test]
    fn test_walk_show_all() {
        let dir = setup();
        let config = SourceConfig {
            show_all: true,
            ..Default::default()
        };
        let files = collect_inputs(&[dir.path().to_path_buf()], &config).unwrap();
        let names = names(&files, dir.path());
        assert!(names.contains(&".hidden/d.py".to_string()));
        assert!(names.contains(&"nb/scratch.py".to_string()));
        assert!(!names.contains(&"README.md".to_string()));
    }

    #[test]
    fn test_walk_max_depth() {
        let dir = setup();
        let config = SourceConfig {
            max_depth: Some(2),
            ..Default::default()
        };
        let files = collect_inputs(&[dir.path().to_path_buf()], &config).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["a.py", "nb/b.ipynb"]);
    }

    #[test]
    fn test_explicit_files_kept_in_order() {
        let dir = setup();
        let readme = dir.path().join("README.md");
        let script = dir.path().join("a.py");
        let files = collect_inputs(&[readme.clone(), script.clone()], &SourceConfig::default())
            .unwrap();
        assert_eq!(files, vec![readme, script]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let result = collect_inputs(&[PathBuf::from("/nonexistent/dir")], &SourceConfig::default());
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
