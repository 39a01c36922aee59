//! String utility functions shared by the rewriters and the notebook model.

/// Quote a string as a double-quoted literal.
///
/// Backslashes, double quotes and control line breaks are escaped, which
/// gives a literal that Python and JSON read back as the same text.
///
/// # Example
///
/// ```
/// use cellsmith::string_utils::quote_literal;
///
/// assert_eq!(quote_literal("model.zginml"), "\"model.zginml\"");
/// assert_eq!(quote_literal("a\"b"), "\"a\\\"b\"");
/// ```
pub fn quote_literal(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Split text into lines, keeping each `\n` on the line it ends.
///
/// This is how notebook files store cell source as a list. The last
/// element has no terminator unless the text is empty after it, in which
/// case no trailing empty element is produced.
///
/// # Example
///
/// ```
/// use cellsmith::string_utils::split_lines_inclusive;
///
/// assert_eq!(split_lines_inclusive("a\nb"), vec!["a\n", "b"]);
/// assert_eq!(split_lines_inclusive("a\n"), vec!["a\n"]);
/// assert!(split_lines_inclusive("").is_empty());
/// ```
pub fn split_lines_inclusive(s: &str) -> Vec<String> {
    s.split_inclusive('\n').map(str::to_string).collect()
}
