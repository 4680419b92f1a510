//! Patterns used by `match` (spec.md §3).

use noolang_util::{Span, Symbol};

use crate::expr::Literal;
use crate::index::PatternId;

#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: PatternId,
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Constructor(Symbol, Vec<Pattern>),
    Variable(Symbol),
    Literal(Literal),
    Wildcard,
    Tuple(Vec<Pattern>),
    /// Record patterns match by field name regardless of source order
    /// (spec.md §4.E), so this is a `Vec` of `(field, pattern)` pairs
    /// rather than an ordered map: source order is kept for printing, but
    /// matching looks fields up by name.
    Record(Vec<(Symbol, Pattern)>),
}
