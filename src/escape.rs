//! Escaping for text placed inside literal string tokens `( ... )`.

/// Escapes the characters that are significant inside a literal string token.
///
/// A backslash is inserted before every `\`, `(` and `)`. Backslashes are handled first so the
/// ones introduced for parentheses are not escaped a second time. Everything else, including
/// non-ASCII characters, passes through untouched.
pub fn escape_pdf_string(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}
