//! Execution trace (spec.md §4.E: "records each top-level statement's
//! source, result, and position; the REPL prints this trace when it
//! contains more than one entry").

use noolang_util::Span;

use crate::value::Value;

#[derive(Clone)]
pub struct TraceEntry {
    pub source: String,
    pub result: Value,
    pub span: Span,
}
