//! Call-site rewriting in cell source
//!
//! Rewrites method calls such as `.load(path)` into another method, optionally
//! appending arguments and keeping the original line as a comment. Argument
//! text is captured up to the first closing parenthesis: nested calls inside
//! the arguments are not understood and may be truncated.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::string_utils::quote_literal;

/// One rewrite rule: which method to replace, by what, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    /// Method name to look for, matched literally (`load`, `io.load`).
    pub original: String,
    /// Method name written in its place.
    pub destination: String,
    /// Arguments appended after the original ones, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
    /// Keep the original line above the rewritten one, commented out.
    #[serde(default)]
    pub preserve_as_comment: bool,
}

impl CallDescriptor {
    pub fn new(original: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            destination: destination.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn commented(mut self, preserve: bool) -> Self {
        self.preserve_as_comment = preserve;
        self
    }

    /// Build the regexes for this rule once, for reuse across many cells.
    pub fn compile(&self) -> CallRewriter {
        CallRewriter::new(self)
    }
}

/// Result of rewriting one block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Number of source lines that were rewritten or commented.
    pub lines_changed: usize,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        self.lines_changed > 0
    }
}

/// A compiled [`CallDescriptor`].
#[derive(Debug, Clone)]
pub struct CallRewriter {
    detect: Regex,
    replace: Regex,
    destination: String,
    appended: String,
    preserve_as_comment: bool,
}

impl CallRewriter {
    fn new(descriptor: &CallDescriptor) -> Self {
        let method = regex::escape(&descriptor.original);
        // Both patterns are built from escaped text and cannot be invalid.
        let detect =
            Regex::new(&format!(r"\.{method}\(")).expect("escaped call pattern is invalid");
        let replace = Regex::new(&format!(r"\.{method}\(\s*([^\)]*)?\)"))
            .expect("escaped call replacer is invalid");

        let appended = if descriptor.extra_args.is_empty() {
            String::new()
        } else {
            format!(", {}", descriptor.extra_args.join(", "))
        };

        Self {
            detect,
            replace,
            destination: descriptor.destination.clone(),
            appended,
            preserve_as_comment: descriptor.preserve_as_comment,
        }
    }

    /// Rewrite every line containing the call, returning the rebuilt text.
    pub fn rewrite(&self, source: &str) -> RewriteOutcome {
        let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
        let mut lines_changed = 0;

        for line in lines.iter_mut() {
            if !self.detect.is_match(line) {
                continue;
            }

            let rewritten = self
                .replace
                .replacen(line, 1, |caps: &Captures| {
                    let args = caps.get(1).map_or("", |m| m.as_str());
                    format!(".{}({}{})", self.destination, args, self.appended)
                })
                .into_owned();

            // A call whose `)` sits on a later line is left as it is
            if !self.preserve_as_comment && rewritten == *line {
                continue;
            }
            lines_changed += 1;

            *line = if self.preserve_as_comment {
                format!("#{}\n{}", line, rewritten)
            } else {
                rewritten
            };
        }

        RewriteOutcome {
            text: lines.join("\n"),
            lines_changed,
        }
    }

    /// Rewrite the text of a cell in place. Returns the number of lines changed.
    pub fn apply<C: Cell + ?Sized>(&self, cell: &mut C) -> usize {
        let outcome = self.rewrite(&cell.get_text());
        if outcome.changed() {
            cell.set_text(outcome.text);
        }
        outcome.lines_changed
    }
}

/// Rewrite calls to `.original(...)` into `.destination(..., extra_args)`.
///
/// Lines are processed independently; the full text is always rebuilt and
/// returned, unchanged when nothing matches. When the original call has no
/// arguments and `extra_args` is not empty, the result starts its argument
/// list with `, ` (kept as-is for compatibility).
///
/// # Example
///
/// ```
/// use cellsmith::rewrite::rewrite_call;
///
/// let out = rewrite_call("m = x.load(path)", "load", "load_file", &["verbose=True"], false);
/// assert_eq!(out, "m = x.load_file(path, verbose=True)");
/// ```
pub fn rewrite_call<S: AsRef<str>>(
    source: &str,
    original: &str,
    destination: &str,
    extra_args: &[S],
    preserve_as_comment: bool,
) -> String {
    CallDescriptor::new(original, destination)
        .with_args(extra_args.iter().map(|a| a.as_ref()))
        .commented(preserve_as_comment)
        .compile()
        .rewrite(source)
        .text
}

/// Rewrite the call described by `descriptor` in the text of `cell`.
pub fn replace_call<C: Cell + ?Sized>(cell: &mut C, descriptor: &CallDescriptor) -> usize {
    descriptor.compile().apply(cell)
}

/// Point the first `original(...)` call at an uploaded file.
///
/// `tool.upload()` becomes `tool.open("model.zginml")` and
/// `tool.upload(fmt="sbml")` becomes `tool.open("model.zginml",fmt="sbml")`.
/// Only keyword arguments are carried over; the call must appear as-is in
/// the text, otherwise the text is returned unchanged.
pub fn inject_filename(source: &str, original: &str, destination: &str, filename: &str) -> String {
    let pattern = Regex::new(&format!(
        r"\b{}\(\s*((\w+)=[^\)]*)?\)",
        regex::escape(original)
    ))
    .expect("escaped upload pattern is invalid");

    let literal = quote_literal(filename);
    pattern
        .replacen(source, 1, |caps: &Captures| {
            match caps.get(1) {
                Some(kwargs) => format!("{}({},{})", destination, literal, kwargs.as_str()),
                None => format!("{}({})", destination, literal),
            }
        })
        .into_owned()
}
