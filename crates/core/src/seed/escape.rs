//! MySQL string escaping.

use core::fmt;

/// Text that is safe to place between single quotes in a MySQL statement.
///
/// Built with [`Escaped::mysql`] (same rules as `mysql_real_escape_string`
/// for single-byte-safe charsets) or from an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    /// Escape NUL, `\n`, `\r`, `\`, `'`, `"` and Ctrl-Z.
    #[must_use]
    pub fn mysql(raw: &str) -> Self {
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' => escaped.push_str("\\\\"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\u{1a}' => escaped.push_str("\\Z"),
                _ => escaped.push(c),
            }
        }
        Self(escaped)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Escaped {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
