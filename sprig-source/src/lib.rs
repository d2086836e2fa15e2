//! Source text and diagnostics shared by every stage of the pipeline.

use std::{cell::RefCell, fmt};

/// A piece of source text being compiled, together with the diagnostics found in it.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a `Source` with no errors yet.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if no stage has reported an error for this source.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A 1-based line and column in the source code.
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Maps byte offsets in the source code to [`Position`]s.
pub struct LineIndex<'a> {
    content: &'a str,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self {
            content,
            line_starts,
        }
    }

    /// Returns the [`Position`] of the byte at `offset`.
    /// Offsets past the end of the content are clamped to the end.
    ///
    /// # Example
    /// ```
    /// use sprig_source::{LineIndex, Position};
    /// let index = LineIndex::new("let x;\nlet y;");
    /// assert_eq!(index.position(0), Position { line: 1, column: 1 });
    /// assert_eq!(index.position(11), Position { line: 2, column: 5 });
    /// ```
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1, // line_starts[0] == 0 so next_line >= 1
        };
        let line_start = self.line_starts[line];
        let column = self
            .content
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position {
            line: line + 1,
            column: column + 1,
        }
    }

    /// Returns the [`Position`] just past the last character.
    pub fn end(&self) -> Position {
        self.position(self.content.len())
    }
}

/// The pipeline stage that produced a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Lexer,
    Parse,
    Runtime,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Lexer => write!(f, "Lexer"),
            ReportKind::Parse => write!(f, "Parse"),
            ReportKind::Runtime => write!(f, "Runtime"),
        }
    }
}

/// A human readable diagnostic.
///
/// Renders as `[<Kind> Error] Line <n>[:<col>] - <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl Report {
    /// Create a new report at `line`, without a column.
    pub fn new(kind: ReportKind, line: usize, message: impl ToString) -> Self {
        Self {
            kind,
            line,
            column: None,
            message: message.to_string(),
        }
    }

    /// Attach a column to the report.
    pub fn with_column(self, column: usize) -> Self {
        Self {
            column: Some(column),
            ..self
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} Error] Line {}", self.kind, self.line)?;
        if let Some(column) = self.column {
            write!(f, ":{}", column)?;
        }
        write!(f, " - {}", self.message)
    }
}

/// Errors that can be turned into a [`Report`].
pub trait ToReport {
    fn to_report(&self) -> Report;
}

/// Collects [`Report`]s in the order they were produced.
pub struct ErrorReporter {
    errors: RefCell<Vec<Report>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Records `error`. Takes `&self` so that passes holding a shared `&Source` can report.
    pub fn add_error(&self, error: &impl ToReport) {
        self.errors.borrow_mut().push(error.to_report());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns a copy of all the accumulated reports, in the order they were added.
    pub fn reports(&self) -> Vec<Report> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in self.errors.borrow().iter() {
            writeln!(f, "{}", report)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unexpected;

    impl ToReport for Unexpected {
        fn to_report(&self) -> Report {
            Report::new(ReportKind::Parse, 3, "Expect expression.").with_column(7)
        }
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(1), Position { line: 1, column: 2 }); // the newline itself
        assert_eq!(index.position(2), Position { line: 2, column: 1 });
        assert_eq!(index.position(3), Position { line: 2, column: 2 });
        assert_eq!(index.position(5), Position { line: 3, column: 1 });
        assert_eq!(index.position(6), Position { line: 4, column: 1 });
        assert_eq!(index.end(), Position { line: 4, column: 2 });
        assert_eq!(index.position(100), index.end());
    }

    #[test]
    fn test_line_index_counts_chars() {
        let index = LineIndex::new("\"héllo\" x");
        // `é` is two bytes long
        assert_eq!(index.position(9), Position { line: 1, column: 9 });
    }

    #[test]
    fn test_report_display() {
        let report = Report::new(ReportKind::Runtime, 12, "Undefined variable 'x'.");
        assert_eq!(
            report.to_string(),
            "[Runtime Error] Line 12 - Undefined variable 'x'."
        );
        let report = Report::new(ReportKind::Lexer, 1, "Unterminated string.").with_column(4);
        assert_eq!(
            report.to_string(),
            "[Lexer Error] Line 1:4 - Unterminated string."
        );
    }

    #[test]
    fn test_error_reporter() {
        let source: Source = "1 +".into();
        assert!(source.has_no_errors());
        source.errors.add_error(&Unexpected);
        assert!(!source.has_no_errors());
        assert_eq!(source.errors.len(), 1);
        assert_eq!(
            source.errors.to_string(),
            "[Parse Error] Line 3:7 - Expect expression.\n"
        );
    }
}
