//! The cell abstraction every rewrite operates on
//!
//! A cell is whatever holds the source text of one notebook cell. The
//! rewriters only ever read the text, compute new text, and write it back;
//! they never hold on to the cell between calls.

/// A block of editable source text owned by someone else.
pub trait Cell {
    /// Current source text of the cell.
    fn get_text(&self) -> String;

    /// Replace the source text of the cell.
    fn set_text(&mut self, text: String);
}

/// In-memory cell backed by an owned `String`.
///
/// Used for plain source files, stdin, and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextCell {
    text: String,
}

impl TextCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl Cell for TextCell {
    fn get_text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

impl From<String> for TextCell {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for TextCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
