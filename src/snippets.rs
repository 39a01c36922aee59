//! Menu snippet declarations and alias propagation
//!
//! Tools declare their notebook menu as data: entries carry a label and a
//! code snippet (or a link), and can nest sub-menus. Snippets are written
//! against the canonical module name; once the user's import alias is known
//! every snippet is renamed so that inserted code runs as-is.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Label used for separators between menu entries.
pub const DIVIDER: &str = "---";

/// One item of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuItem {
    /// A bare string: a divider (`---`) or a disabled label.
    Label(String),
    /// A clickable entry.
    Entry(MenuEntry),
}

impl MenuItem {
    pub fn is_divider(&self) -> bool {
        matches!(self, MenuItem::Label(label) if label == DIVIDER)
    }

    pub fn as_entry(&self) -> Option<&MenuEntry> {
        match self {
            MenuItem::Entry(entry) => Some(entry),
            MenuItem::Label(_) => None,
        }
    }
}

/// Which side a sub-menu opens on. Anything but `"left"` opens right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(if value == "left" {
            Direction::Left
        } else {
            Direction::Right
        })
    }
}

/// Code inserted by a menu entry: one string or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snippet {
    Code(String),
    Lines(Vec<String>),
}

impl Snippet {
    /// The snippet as it is inserted into a cell.
    pub fn code(&self) -> String {
        match self {
            Snippet::Code(code) => code.clone(),
            Snippet::Lines(lines) => lines.join("\n"),
        }
    }

    fn parts_mut(&mut self) -> std::slice::IterMut<'_, String> {
        match self {
            Snippet::Code(code) => std::slice::from_mut(code).iter_mut(),
            Snippet::Lines(lines) => lines.iter_mut(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
    #[serde(
        rename = "internal-link",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_link: Option<String>,
    #[serde(
        rename = "external-link",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external_link: Option<String>,
    #[serde(rename = "sub-menu", default, skip_serializing_if = "Vec::is_empty")]
    pub sub_menu: Vec<MenuItem>,
    #[serde(
        rename = "sub-menu-direction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_menu_direction: Option<Direction>,
    #[serde(
        rename = "menu-direction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub menu_direction: Option<Direction>,
    /// Compact rendering for space-saving sub-menus.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub overlay: bool,
}

impl MenuEntry {
    /// A top-level menu named `label` holding `items`.
    pub fn menu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            name: label.into(),
            sub_menu: items,
            ..Default::default()
        }
    }

    /// An entry inserting `snippet` when clicked.
    pub fn with_snippet(name: impl Into<String>, snippet: Snippet) -> Self {
        Self {
            name: name.into(),
            snippet: Some(snippet),
            ..Default::default()
        }
    }

    pub fn snippet_code(&self) -> Option<String> {
        self.snippet.as_ref().map(Snippet::code)
    }
}

/// A menu declaration file: a single item or a list of items.
///
/// Serializes back in the shape it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuFile {
    Many(Vec<MenuItem>),
    One(MenuItem),
}

impl MenuFile {
    pub fn items(&self) -> &[MenuItem] {
        match self {
            MenuFile::Many(items) => items,
            MenuFile::One(item) => std::slice::from_ref(item),
        }
    }

    pub fn items_mut(&mut self) -> &mut [MenuItem] {
        match self {
            MenuFile::Many(items) => items,
            MenuFile::One(item) => std::slice::from_mut(item),
        }
    }

    pub fn into_items(self) -> Vec<MenuItem> {
        match self {
            MenuFile::Many(items) => items,
            MenuFile::One(item) => vec![item],
        }
    }
}

/// Parse a menu declaration, keeping its shape.
pub fn parse_menu_file(json: &str) -> Result<MenuFile> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a menu declaration into its list of items.
pub fn parse_menu(json: &str) -> Result<Vec<MenuItem>> {
    parse_menu_file(json).map(MenuFile::into_items)
}

/// Read and parse a menu declaration file.
pub fn load_menu(path: &Path) -> Result<MenuFile> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_menu_file(&json)
}

/// Rename every whole-word `module` in the snippets of `items` to `alias`.
///
/// Sub-menus are renamed recursively. Nothing happens when `alias` is empty
/// or equal to `module`. Returns how many snippet strings changed.
pub fn rename_module(items: &mut [MenuItem], module: &str, alias: &str) -> usize {
    if alias.is_empty() || alias == module {
        return 0;
    }
    let word = Regex::new(&format!(r"\b{}\b", regex::escape(module)))
        .expect("escaped module pattern is invalid");
    rename_in_items(items, &word, alias)
}

fn rename_in_items(items: &mut [MenuItem], word: &Regex, alias: &str) -> usize {
    let mut changed = 0;
    for item in items.iter_mut() {
        let MenuItem::Entry(entry) = item else {
            continue;
        };
        if let Some(snippet) = entry.snippet.as_mut() {
            for part in snippet.parts_mut() {
                if word.is_match(part) {
                    *part = word.replace_all(part, NoExpand(alias)).into_owned();
                    changed += 1;
                }
            }
        }
        changed += rename_in_items(&mut entry.sub_menu, word, alias);
    }
    changed
}
