//! Node identifiers used to decorate the AST during type inference.
//!
//! The typer cannot mutate `Expr`/`Pattern` nodes in place through shared
//! `Box` trees without interior mutability, so — grounded on
//! `faxc-sem/src/types.rs`'s `expr_types: HashMap<ExprId, Type>` side
//! table — every node carries a stable id and the typer decorates a side
//! table keyed by that id instead. "Decoration" (spec.md §4.T) then means:
//! after inference, every id reachable from the program has an entry in
//! that table.

use noolang_util::define_idx;

define_idx!(
    /// Identifies an `Expr` node for the purpose of type decoration.
    ExprId
);

define_idx!(
    /// Identifies a `Pattern` node for the purpose of type decoration.
    PatternId
);

/// Hands out fresh, increasing ids. Owned by the parser; a fresh generator
/// per parse keeps ids dense and deterministic, matching spec.md §5's
/// fully-deterministic evaluation-order invariant.
#[derive(Default)]
pub struct NodeIdGen {
    next_expr: u32,
    next_pattern: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_expr(&mut self) -> ExprId {
        let id = ExprId(self.next_expr);
        self.next_expr += 1;
        id
    }

    pub fn next_pattern(&mut self) -> PatternId {
        let id = PatternId(self.next_pattern);
        self.next_pattern += 1;
        id
    }
}
