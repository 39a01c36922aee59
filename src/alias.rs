//! Import alias detection
//!
//! Finds the local name under which a module is bound by a plain
//! `import` statement in a cell, so that generated code and menu snippets
//! can refer to the module the same way the user does.

use regex::Regex;
use std::sync::LazyLock;

use crate::cell::Cell;

static IMPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^import\s").expect("IMPORT_LINE regex is invalid"));

static LINE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\r?\n").expect("LINE_CONTINUATION regex is invalid")
});

/// Join physical lines ending with a backslash into one logical line.
pub fn join_continuations(source: &str) -> String {
    LINE_CONTINUATION.replace_all(source, "").into_owned()
}

/// Pattern matching a single import target of the form `<module> as <name>`.
fn alias_pattern(module: &str) -> Regex {
    // The module is escaped, so the pattern is always valid.
    Regex::new(&format!(r"^{}\s+as\s+(\w+)$", regex::escape(module)))
        .expect("escaped alias pattern is invalid")
}

/// Find the alias of `module` from the first `import` statement naming it.
///
/// Returns `None` when no `import` line mentions the module. Lines are
/// scanned top to bottom and comma-separated targets left to right.
pub fn find_alias(source: &str, module: &str) -> Option<String> {
    let joined = join_continuations(source);
    let as_alias = alias_pattern(module);

    for line in joined.split('\n') {
        let Some(keyword) = IMPORT_LINE.find(line) else {
            continue;
        };

        for target in line[keyword.end()..].split(',') {
            let target = target.trim();
            if target == module {
                return Some(module.to_string());
            }
            if let Some(caps) = as_alias.captures(target) {
                return caps.get(1).map(|m| m.as_str().to_string());
            }
        }
    }

    None
}

/// Resolve the local alias of `module`, falling back to the module name.
///
/// # Example
///
/// ```
/// use cellsmith::alias::resolve_alias;
///
/// assert_eq!(resolve_alias("import numpy, pandas as pd", "pandas"), "pd");
/// assert_eq!(resolve_alias("import numpy", "pandas"), "pandas");
/// ```
pub fn resolve_alias(source: &str, module: &str) -> String {
    find_alias(source, module).unwrap_or_else(|| module.to_string())
}

/// Resolve the alias of `module` from the text of a cell.
pub fn detect_import<C: Cell + ?Sized>(cell: &C, module: &str) -> String {
    resolve_alias(&cell.get_text(), module)
}
