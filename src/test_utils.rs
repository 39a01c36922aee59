//! Test utilities for creating temporary notebook directories.
//!
//! This module is only compiled for tests and benchmarks.

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::string_utils::split_lines_inclusive;

/// A temporary directory of notebooks and scripts for testing.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a notebook with one code cell per source, stored as line lists.
    pub fn add_notebook(&self, path: &str, code_cells: &[&str]) -> PathBuf {
        let cells: Vec<(&str, &str)> = code_cells.iter().map(|src| ("code", *src)).collect();
        self.add_notebook_cells(path, &cells)
    }

    /// Add a notebook from `(cell_type, source)` pairs.
    pub fn add_notebook_cells(&self, path: &str, cells: &[(&str, &str)]) -> PathBuf {
        self.add_file(path, &notebook_json(cells))
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }

    /// Source of every cell of a notebook in the directory, joined per cell.
    pub fn read_notebook_sources(&self, path: &str) -> Vec<String> {
        let doc: Value = serde_json::from_str(&self.read(path)).expect("Invalid notebook JSON");
        doc["cells"]
            .as_array()
            .expect("Notebook without cells")
            .iter()
            .map(|cell| match &cell["source"] {
                Value::Array(parts) => parts.iter().filter_map(Value::as_str).collect(),
                Value::String(text) => text.clone(),
                _ => String::new(),
            })
            .collect()
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the JSON text of an nbformat 4 notebook.
pub fn notebook_json(cells: &[(&str, &str)]) -> String {
    let cells: Vec<Value> = cells
        .iter()
        .map(|(kind, source)| {
            let mut cell = json!({
                "cell_type": kind,
                "metadata": {},
                "source": split_lines_inclusive(source),
            });
            if *kind == "code" {
                cell["execution_count"] = Value::Null;
                cell["outputs"] = json!([]);
            }
            cell
        })
        .collect();

    let doc = json!({
        "cells": cells,
        "metadata": {
            "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    });
    serde_json::to_string_pretty(&doc).expect("Failed to serialize notebook")
}
