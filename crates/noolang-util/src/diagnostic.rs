//! Rendering [`NoolangError`]s for human consumption.
//!
//! Grounded on `faxc-util::diagnostic`'s `Level`/`DiagnosticBuilder`
//! pair, trimmed to what the REPL's `.error-detail`/`.error-context`
//! toggles need: a one-line message, or a message plus a `^^^`-underlined
//! source excerpt.

use crate::error::NoolangError;
use crate::span::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("error")
    }
}

/// Renders an error to a single line: `error: <kind>: <message>`.
pub fn render_plain(err: &NoolangError) -> String {
    format!("{}: {}", Level::Error, err)
}

/// Renders an error with source context: the offending line underlined at
/// the error's starting column, plus the kind name and message.
pub fn render_with_context(err: &NoolangError, sources: &SourceMap, file_index: usize) -> String {
    let mut out = render_plain(err);
    if let Some(span) = err.info().span {
        if let Some(line) = sources.line(file_index, span.start.line) {
            let col = span.start.column.saturating_sub(1) as usize;
            let caret_len = if span.start.line == span.end.line {
                (span.end.column.saturating_sub(span.start.column)).max(1) as usize
            } else {
                1
            };
            out.push_str(&format!("\n  --> {}\n", span));
            out.push_str(&format!("  | {line}\n"));
            out.push_str(&format!("  | {}{}\n", " ".repeat(col), "^".repeat(caret_len)));
        }
    }
    if let Some(context) = &err.info().context {
        out.push_str(&format!("  = note: {context}\n"));
    }
    if let Some(suggestion) = &err.info().suggestion {
        out.push_str(&format!("  = help: {suggestion}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorInfo, RuntimeError};
    use crate::span::{Position, Span};

    #[test]
    fn plain_render_includes_kind_and_message() {
        let err = NoolangError::Runtime(RuntimeError::new("Division by zero"));
        let rendered = render_plain(&err);
        assert!(rendered.contains("Division by zero"));
    }

    #[test]
    fn context_render_underlines_the_span() {
        let mut sources = SourceMap::new();
        let idx = sources.add_file("main.noo", "1 / 0\n");
        let err = NoolangError::Runtime(RuntimeError {
            message: "Division by zero".into(),
            info: ErrorInfo::at(Span::new(Position::new(1, 1), Position::new(1, 6))),
        });
        let rendered = render_with_context(&err, &sources, idx);
        assert!(rendered.contains("1 / 0"));
        assert!(rendered.contains('^'));
    }
}
