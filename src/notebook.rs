//! Notebook documents (`.ipynb`)
//!
//! A notebook is kept as the JSON value it was read from so that metadata,
//! outputs and fields this crate knows nothing about survive a rewrite
//! untouched. Only the `source` of code cells is ever modified.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::alias;
use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::string_utils::split_lines_inclusive;

#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    doc: Value,
}

impl Notebook {
    /// Parse a notebook from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        if !doc.is_object() {
            return Err(Error::NotANotebook("top level is not an object".to_string()));
        }
        let problem = match doc.get("cells") {
            Some(Value::Array(_)) => None,
            Some(_) => Some("'cells' is not a list"),
            None if doc.get("worksheets").is_some() => {
                Some("nbformat 3 notebooks are not supported")
            }
            None => Some("missing 'cells'"),
        };
        match problem {
            Some(reason) => Err(Error::NotANotebook(reason.to_string())),
            None => Ok(Self { doc }),
        }
    }

    /// Read a notebook file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    /// Serialize the way Jupyter writes notebooks: one-space indent, final newline.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.doc.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    fn cells(&self) -> &[Value] {
        self.doc
            .get("cells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn cells_mut(&mut self) -> &mut [Value] {
        match self.doc.get_mut("cells").and_then(Value::as_array_mut) {
            Some(cells) => cells.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Number of cells of any kind.
    pub fn len(&self) -> usize {
        self.cells().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells().is_empty()
    }

    /// The `cell_type` of the cell at `index` (`code`, `markdown`, `raw`).
    pub fn cell_kind(&self, index: usize) -> Option<&str> {
        self.cells().get(index)?.get("cell_type")?.as_str()
    }

    /// Source text of every code cell, in document order.
    pub fn code_sources(&self) -> impl Iterator<Item = String> + '_ {
        self.cells()
            .iter()
            .filter_map(Value::as_object)
            .filter(|cell| is_code(cell))
            .map(source_text)
    }

    /// Every code cell, in document order.
    pub fn code_cells_mut(&mut self) -> impl Iterator<Item = NotebookCell<'_>> {
        self.cells_mut()
            .iter_mut()
            .enumerate()
            .filter_map(|(index, value)| {
                let cell = value.as_object_mut()?;
                is_code(cell).then_some(NotebookCell { index, cell })
            })
    }

    /// The code cell at absolute position `index`.
    pub fn cell_mut(&mut self, index: usize) -> Result<NotebookCell<'_>> {
        let count = self.len();
        let kind = self.cell_kind(index).map(str::to_string);
        let cell = self
            .cells_mut()
            .get_mut(index)
            .and_then(Value::as_object_mut)
            .ok_or(Error::CellOutOfRange { index, count })?;
        match kind.as_deref() {
            Some("code") => Ok(NotebookCell { index, cell }),
            other => Err(Error::NotACodeCell {
                index,
                kind: other.unwrap_or("unknown").to_string(),
            }),
        }
    }

    /// Alias of `module` from the first code cell importing it.
    pub fn detect_import(&self, module: &str) -> String {
        self.code_sources()
            .find_map(|source| alias::find_alias(&source, module))
            .unwrap_or_else(|| module.to_string())
    }
}

fn is_code(cell: &Map<String, Value>) -> bool {
    cell.get("cell_type").and_then(Value::as_str) == Some("code")
}

fn source_text(cell: &Map<String, Value>) -> String {
    match cell.get("source") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// One code cell of a [`Notebook`], borrowed for editing.
#[derive(Debug)]
pub struct NotebookCell<'a> {
    index: usize,
    cell: &'a mut Map<String, Value>,
}

impl NotebookCell<'_> {
    /// Absolute position of the cell in the notebook.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Cell for NotebookCell<'_> {
    fn get_text(&self) -> String {
        source_text(&*self.cell)
    }

    /// Keeps the stored representation: list sources stay lists of lines.
    fn set_text(&mut self, text: String) {
        let source = match self.cell.get("source") {
            Some(Value::Array(_)) => Value::Array(
                split_lines_inclusive(&text)
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
            _ => Value::String(text),
        };
        self.cell.insert("source".to_string(), source);
    }
}
