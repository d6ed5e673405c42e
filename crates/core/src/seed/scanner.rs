//! Line scanner for the SQL dump.
//!
//! The dump is not parsed as SQL. A statement starts on a line beginning
//! with `INSERT INTO ` and ends on the first line ending with `);`. Lines
//! outside a statement (`CREATE TABLE`, comments, blank lines) are skipped.
//!
//! The scanner assumes `);` only appears at a line end as a statement
//! terminator; a string literal that ends a line with `);` cuts the
//! statement short.
//!
//! # Example
//!
//! ```
//! use oc_install_core::seed::SeedScanner;
//!
//! let mut scanner = SeedScanner::new();
//! assert_eq!(scanner.feed("INSERT INTO `oc_country` VALUES"), None);
//! assert_eq!(
//!     scanner.feed("(1, 'Afghanistan');").as_deref(),
//!     Some("INSERT INTO `oc_country` VALUES\n(1, 'Afghanistan');\n")
//! );
//! ```

/// Marker that opens a statement; must start the line.
pub const STATEMENT_START: &str = "INSERT INTO ";

/// Marker that closes a statement; must end the line.
pub const STATEMENT_END: &str = ");";

/// Table prefix the dump is written with.
pub const SOURCE_PREFIX: &str = "oc_";

/// Where the scanner is between two lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Outside any statement
    #[default]
    Idle,
    /// Inside a statement; `buffer` holds its lines so far, newline-terminated
    Recording { buffer: String },
}

/// Turns dump lines into complete `INSERT INTO` statements.
#[derive(Debug, Default)]
pub struct SeedScanner {
    state: ScanState,
    abandoned: usize,
}

impl SeedScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its newline).
    ///
    /// Returns the complete statement when `line` terminates one. A start
    /// marker while a statement is still open throws the open statement away
    /// and starts over.
    pub fn feed(&mut self, line: &str) -> Option<String> {
        if line.starts_with(STATEMENT_START) {
            if matches!(self.state, ScanState::Recording { .. }) {
                self.abandoned += 1;
            }
            self.state = ScanState::Recording {
                buffer: String::new(),
            };
        }

        let ScanState::Recording { buffer } = &mut self.state else {
            return None;
        };

        buffer.push_str(line);
        buffer.push('\n');

        if !line.ends_with(STATEMENT_END) {
            return None;
        }

        let statement = std::mem::take(buffer);
        self.state = ScanState::Idle;
        Some(statement)
    }

    #[must_use]
    pub const fn state(&self) -> &ScanState {
        &self.state
    }

    /// Statements dropped so far because another one started before their
    /// terminator.
    #[must_use]
    pub const fn abandoned(&self) -> usize {
        self.abandoned
    }

    /// End of input. Returns the unterminated statement, if any; it is never
    /// meant to be executed.
    #[must_use]
    pub fn finish(self) -> Option<String> {
        match self.state {
            ScanState::Idle => None,
            ScanState::Recording { buffer } => Some(buffer),
        }
    }
}

/// Replace every `` INSERT INTO `oc_ `` with `` INSERT INTO `<prefix> ``.
#[must_use]
pub fn rewrite_prefix(statement: &str, prefix: &str) -> String {
    if prefix == SOURCE_PREFIX {
        return statement.to_owned();
    }
    statement.replace(
        &format!("{STATEMENT_START}`{SOURCE_PREFIX}"),
        &format!("{STATEMENT_START}`{prefix}"),
    )
}
