//! Applying one rewrite to many files
//!
//! Files are independent, so they are opened, rewritten and (optionally)
//! written back in parallel. Reports come back in input order; a file that
//! fails does not stop the others.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cell::Cell;
use crate::document::Document;
use crate::error::Result;
use crate::file_utils::SourceKind;
use crate::rewrite::{CallDescriptor, CallRewriter, inject_filename};

/// What to do to each selected cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Rewrite method calls, see [`CallDescriptor`].
    Call(CallDescriptor),
    /// Point the first upload call at a file, see [`inject_filename`].
    InjectFilename {
        original: String,
        destination: String,
        filename: String,
    },
}

/// Configuration for a batch rewrite.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub operation: Operation,
    /// Only edit the cell at this absolute index.
    pub cell: Option<usize>,
    /// Write changed files back to disk.
    pub in_place: bool,
    /// Number of parallel workers.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}

impl RewriteConfig {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            cell: None,
            in_place: false,
            parallel_workers: 0,
        }
    }
}

/// A compiled [`Operation`], ready to run over cells.
#[derive(Debug, Clone)]
enum Editor {
    Call(CallRewriter),
    InjectFilename {
        original: String,
        destination: String,
        filename: String,
    },
}

impl Editor {
    fn new(operation: &Operation) -> Self {
        match operation {
            Operation::Call(descriptor) => Editor::Call(descriptor.compile()),
            Operation::InjectFilename {
                original,
                destination,
                filename,
            } => Editor::InjectFilename {
                original: original.clone(),
                destination: destination.clone(),
                filename: filename.clone(),
            },
        }
    }

    /// Only the first upload call of a document is redirected.
    fn first_only(&self) -> bool {
        matches!(self, Editor::InjectFilename { .. })
    }

    fn edit(&self, cell: &mut dyn Cell) -> usize {
        match self {
            Editor::Call(rewriter) => rewriter.apply(cell),
            Editor::InjectFilename {
                original,
                destination,
                filename,
            } => {
                let text = cell.get_text();
                let updated = inject_filename(&text, original, destination, filename);
                if updated == text {
                    0
                } else {
                    cell.set_text(updated);
                    1
                }
            }
        }
    }
}

/// Outcome of rewriting one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Changes {
    pub cells_changed: usize,
    /// Rewritten lines for call rewrites, redirected calls for uploads.
    pub edits: usize,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.edits == 0
    }
}

/// Apply `operation` to an already opened document.
pub fn rewrite_document(
    doc: &mut Document,
    operation: &Operation,
    cell: Option<usize>,
) -> Result<Changes> {
    let editor = Editor::new(operation);
    apply_editor(doc, &editor, cell)
}

fn apply_editor(doc: &mut Document, editor: &Editor, cell: Option<usize>) -> Result<Changes> {
    let (cells_changed, edits) =
        doc.edit_cells(cell, editor.first_only(), |c| editor.edit(c))?;
    Ok(Changes {
        cells_changed,
        edits,
    })
}

/// Report for one file of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub changes: Changes,
    /// Whether the file was written back.
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn process_file(path: &Path, editor: &Editor, config: &RewriteConfig) -> FileReport {
    let mut report = FileReport {
        path: path.to_path_buf(),
        kind: SourceKind::from_path(path),
        changes: Changes::default(),
        written: false,
        error: None,
    };

    let result = Document::open(path).and_then(|mut doc| {
        let changes = apply_editor(&mut doc, editor, config.cell)?;
        let write = config.in_place && !changes.is_empty();
        if write {
            doc.save(path)?;
        }
        Ok((changes, write))
    });

    match result {
        Ok((changes, written)) => {
            report.changes = changes;
            report.written = written;
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    report
}

/// Rewrite every file in `paths`, returning one report per file in order.
pub fn rewrite_files(paths: &[PathBuf], config: &RewriteConfig) -> Vec<FileReport> {
    let editor = Editor::new(&config.operation);
    let run = || -> Vec<FileReport> {
        paths
            .par_iter()
            .map(|path| process_file(path, &editor, config))
            .collect()
    };

    match config.parallel_workers {
        // Auto-detect: use rayon's default thread pool
        0 => run(),
        1 => paths
            .iter()
            .map(|path| process_file(path, &editor, config))
            .collect(),
        workers => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(run),
            // Fall back to rayon's global pool if custom pool creation fails
            Err(_) => run(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestDir, notebook_json};
    use std::fs;
    use tempfile::TempDir;

    fn call(original: &str, destination: &str) -> Operation {
        Operation::Call(CallDescriptor::new(original, destination))
    }

    #[test]
    fn test_rewrite_document_counts() {
        let mut doc = Document::parse("a = t.load(x)\nb = t.load(y)", SourceKind::Script).unwrap();
        let changes = rewrite_document(&mut doc, &call("load", "open"), None).unwrap();
        assert_eq!(
            changes,
            Changes {
                cells_changed: 1,
                edits: 2
            }
        );
    }

    #[test]
    fn test_inject_filename_document() {
        let mut doc = Document::parse("lrg = ginsim.upload()", SourceKind::Script).unwrap();
        let operation = Operation::InjectFilename {
            original: "ginsim.upload".to_string(),
            destination: "ginsim.open".to_string(),
            filename: "m.zginml".to_string(),
        };
        let changes = rewrite_document(&mut doc, &operation, None).unwrap();
        assert_eq!(changes.edits, 1);
        assert_eq!(doc.render().unwrap(), "lrg = ginsim.open(\"m.zginml\")");
    }

    #[test]
    fn test_inject_filename_ignores_unrelated_cells() {
        let json = notebook_json(&[("code", "x = f(\"a\",)"), ("code", "m = t.upload()")]);
        let mut doc = Document::parse(&json, SourceKind::Notebook).unwrap();
        let operation = Operation::InjectFilename {
            original: "t.upload".to_string(),
            destination: "t.open".to_string(),
            filename: "m.zginml".to_string(),
        };
        let changes = rewrite_document(&mut doc, &operation, None).unwrap();
        assert_eq!(
            changes,
            Changes {
                cells_changed: 1,
                edits: 1
            }
        );

        let Document::Notebook(nb) = &doc else {
            panic!("expected a notebook");
        };
        let sources: Vec<String> = nb.code_sources().collect();
        assert_eq!(sources, ["x = f(\"a\",)", "m = t.open(\"m.zginml\")"]);
    }

    #[test]
    fn test_unclosed_call_leaves_notebook_unwritten() {
        let dir = TestDir::new();
        let path = dir.add_notebook("a.ipynb", &["x.load(\n  path)"]);
        let before = dir.read("a.ipynb");

        let mut config = RewriteConfig::new(call("load", "open"));
        config.in_place = true;
        let reports = rewrite_files(std::slice::from_ref(&path), &config);

        assert!(reports[0].changes.is_empty());
        assert!(!reports[0].written);
        assert_eq!(dir.read("a.ipynb"), before);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "m = t.load(f)").unwrap();

        let config = RewriteConfig::new(call("load", "open"));
        let reports = rewrite_files(std::slice::from_ref(&path), &config);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].changes.edits, 1);
        assert!(!reports[0].written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "m = t.load(f)");
    }

    #[test]
    fn test_in_place_writes_changed_files_only() {
        let dir = TempDir::new().unwrap();
        let changed = dir.path().join("a.py");
        let untouched = dir.path().join("b.py");
        fs::write(&changed, "m = t.load(f)").unwrap();
        fs::write(&untouched, "print(1)").unwrap();

        let mut config = RewriteConfig::new(call("load", "open"));
        config.in_place = true;
        config.parallel_workers = 2;
        let reports = rewrite_files(&[changed.clone(), untouched.clone()], &config);

        assert_eq!(reports[0].path, changed);
        assert!(reports[0].written);
        assert!(!reports[1].written);
        assert_eq!(fs::read_to_string(&changed).unwrap(), "m = t.open(f)");
    }

    #[test]
    fn test_errors_are_reported_per_file() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.py");
        let bad = dir.path().join("bad.ipynb");
        fs::write(&good, "t.load()").unwrap();
        fs::write(&bad, "{ not json").unwrap();

        let mut config = RewriteConfig::new(call("load", "open"));
        config.parallel_workers = 1;
        let reports = rewrite_files(&[bad, good], &config);

        assert!(reports[0].is_error());
        assert_eq!(reports[0].kind, SourceKind::Notebook);
        assert!(!reports[1].is_error());
        assert_eq!(reports[1].changes.edits, 1);
    }

    #[test]
    fn test_report_json_shape() {
        let report = FileReport {
            path: PathBuf::from("a.py"),
            kind: SourceKind::Script,
            changes: Changes {
                cells_changed: 1,
                edits: 3,
            },
            written: true,
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "script");
        assert_eq!(json["edits"], 3);
        assert_eq!(json["cells_changed"], 1);
        assert!(json.get("error").is_none());
    }
}
