//! The parser's top-level output (spec.md §4.P): `Program := statement
//! (';' statement)*`, where `;` separates statements rather than building a
//! `Binary(Sequence, ...)` node.

use noolang_util::Span;

use crate::expr::Expr;

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Expr>,
    pub span: Span,
}
