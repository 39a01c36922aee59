//! A file opened for rewriting: a notebook or a plain source file
//!
//! Both kinds expose their editable text as [`Cell`]s. A plain source file
//! is one cell; a notebook is one cell per code cell.

use std::path::Path;

use crate::cell::{Cell, TextCell};
use crate::error::{Error, Result};
use crate::file_utils::{SourceKind, read_source_file};
use crate::notebook::Notebook;

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Notebook(Notebook),
    Script(TextCell),
}

impl Document {
    /// Open `path`, choosing the representation from its extension.
    pub fn open(path: &Path) -> Result<Self> {
        let content = read_source_file(path)?;
        Self::parse(&content, SourceKind::from_path(path))
    }

    pub fn parse(content: &str, kind: SourceKind) -> Result<Self> {
        match kind {
            SourceKind::Notebook => Ok(Document::Notebook(Notebook::from_json(content)?)),
            SourceKind::Script => Ok(Document::Script(TextCell::new(content))),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Document::Notebook(_) => SourceKind::Notebook,
            Document::Script(_) => SourceKind::Script,
        }
    }

    /// Resolve the alias of `module` from the document's imports.
    pub fn detect_import(&self, module: &str) -> String {
        match self {
            Document::Notebook(nb) => nb.detect_import(module),
            Document::Script(cell) => crate::alias::detect_import(cell, module),
        }
    }

    /// Run `edit` over the selected cells, in document order.
    ///
    /// With `cell_index`, only that cell is edited (plain sources only have
    /// cell 0). `edit` returns how many edits it made; iteration stops early
    /// when `first_only` is set and a cell was edited. Returns
    /// `(cells_changed, edits)`.
    pub fn edit_cells<F>(
        &mut self,
        cell_index: Option<usize>,
        first_only: bool,
        mut edit: F,
    ) -> Result<(usize, usize)>
    where
        F: FnMut(&mut dyn Cell) -> usize,
    {
        let mut cells_changed = 0;
        let mut edits = 0;

        match self {
            Document::Script(cell) => {
                if let Some(index) = cell_index.filter(|&i| i != 0) {
                    return Err(Error::CellOutOfRange { index, count: 1 });
                }
                let n = edit(cell as &mut dyn Cell);
                if n > 0 {
                    cells_changed = 1;
                    edits = n;
                }
            }
            Document::Notebook(nb) => {
                if let Some(index) = cell_index {
                    let mut cell = nb.cell_mut(index)?;
                    let n = edit(&mut cell as &mut dyn Cell);
                    if n > 0 {
                        cells_changed = 1;
                        edits = n;
                    }
                } else {
                    for mut cell in nb.code_cells_mut() {
                        let n = edit(&mut cell as &mut dyn Cell);
                        if n > 0 {
                            cells_changed += 1;
                            edits += n;
                            if first_only {
                                break;
                            }
                        }
                    }
                }
            }
        }

        Ok((cells_changed, edits))
    }

    /// The document as it would be written to disk.
    pub fn render(&self) -> Result<String> {
        match self {
            Document::Notebook(nb) => nb.to_json(),
            Document::Script(cell) => Ok(cell.get_text()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::CallDescriptor;

    const NOTEBOOK: &str = r#"{
 "cells": [
  {"cell_type": "code", "metadata": {}, "outputs": [], "source": ["import biolqm as lqm\n", "m = lqm.load(\"a.sbml\")"]},
  {"cell_type": "markdown", "metadata": {}, "source": "m.load(x) in prose"},
  {"cell_type": "code", "metadata": {}, "outputs": [], "source": "n = lqm.load(\"b.sbml\")"}
 ],
 "metadata": {},
 "nbformat": 4,
 "nbformat_minor": 5
}"#;

    #[test]
    fn test_script_is_single_cell() {
        let mut doc = Document::parse("a = x.load(1)\nb = x.load(2)", SourceKind::Script).unwrap();
        let rewriter = CallDescriptor::new("load", "open").compile();
        let (cells, edits) = doc.edit_cells(None, false, |c| rewriter.apply(c)).unwrap();
        assert_eq!((cells, edits), (1, 2));
        assert_eq!(doc.render().unwrap(), "a = x.open(1)\nb = x.open(2)");
    }

    #[test]
    fn test_script_rejects_other_cells() {
        let mut doc = Document::parse("x", SourceKind::Script).unwrap();
        let result = doc.edit_cells(Some(1), false, |_| 0);
        assert!(matches!(result, Err(Error::CellOutOfRange { index: 1, count: 1 })));
    }

    #[test]
    fn test_notebook_skips_markdown() {
        let mut doc = Document::parse(NOTEBOOK, SourceKind::Notebook).unwrap();
        let rewriter = CallDescriptor::new("load", "open").compile();
        let (cells, edits) = doc.edit_cells(None, false, |c| rewriter.apply(c)).unwrap();
        assert_eq!((cells, edits), (2, 2));
        let rendered = doc.render().unwrap();
        assert!(rendered.contains("m.load(x) in prose"));
        assert!(rendered.contains("lqm.open(\\\"b.sbml\\\")"));
    }

    #[test]
    fn test_notebook_single_cell() {
        let mut doc = Document::parse(NOTEBOOK, SourceKind::Notebook).unwrap();
        let rewriter = CallDescriptor::new("load", "open").compile();
        let (cells, _) = doc.edit_cells(Some(2), false, |c| rewriter.apply(c)).unwrap();
        assert_eq!(cells, 1);
        let rendered = doc.render().unwrap();
        assert!(rendered.contains("lqm.load(\\\"a.sbml\\\")"));
        assert!(rendered.contains("lqm.open(\\\"b.sbml\\\")"));
    }

    #[test]
    fn test_first_only_stops_after_first_change() {
        let mut doc = Document::parse(NOTEBOOK, SourceKind::Notebook).unwrap();
        let rewriter = CallDescriptor::new("load", "open").compile();
        let (cells, _) = doc.edit_cells(None, true, |c| rewriter.apply(c)).unwrap();
        assert_eq!(cells, 1);
        assert!(doc.render().unwrap().contains("lqm.load(\\\"b.sbml\\\")"));
    }

    #[test]
    fn test_detect_import() {
        let doc = Document::parse(NOTEBOOK, SourceKind::Notebook).unwrap();
        assert_eq!(doc.detect_import("biolqm"), "lqm");
        let doc = Document::parse("import biolqm", SourceKind::Script).unwrap();
        assert_eq!(doc.detect_import("biolqm"), "biolqm");
    }
}
