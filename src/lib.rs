//! Cellsmith - regex surgery for notebook cells
//!
//! Resolves import aliases, rewrites method calls, points upload calls at
//! files and propagates aliases into menu snippets, over plain sources and
//! Jupyter notebooks alike.

pub mod alias;
pub mod batch;
pub mod cell;
pub mod document;
pub mod error;
pub mod file_utils;
pub mod notebook;
pub mod output;
pub mod rewrite;
pub mod snippets;
pub mod source;
pub mod string_utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alias::{detect_import, find_alias, resolve_alias};
pub use batch::{Changes, FileReport, Operation, RewriteConfig, rewrite_document, rewrite_files};
pub use cell::{Cell, TextCell};
pub use document::Document;
pub use error::{Error, Result};
pub use notebook::{Notebook, NotebookCell};
pub use output::{OutputConfig, Summary, print_json, print_reports};
pub use rewrite::{CallDescriptor, CallRewriter, inject_filename, replace_call, rewrite_call};
pub use snippets::{
    MenuEntry, MenuFile, MenuItem, Snippet, load_menu, parse_menu, parse_menu_file, rename_module,
};
pub use source::{SourceConfig, collect_inputs};
