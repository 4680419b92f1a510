//! noolang-ast - the AST and type data model shared by the parser, typer,
//! and evaluator (spec.md §3, component A).
//!
//! Grounded on the *shape* of `faxc-par/src/ast.rs` (boxed recursive `Expr`
//! tree, a `Span` on every node) and `faxc-sem/src/types.rs` (a single
//! recursive `Type` enum, typed-index substitution targets), re-targeted at
//! Noolang's expression-oriented, row/effect/trait-extended data model.

pub mod effect;
pub mod expr;
pub mod index;
pub mod pattern;
pub mod program;
pub mod types;

pub use effect::{Effect, EffectSet};
pub use expr::{
    BinaryOp, ConstraintFunctionSig, Expr, ExprKind, ImplementFunction, Literal, MatchCase,
};
pub use index::{ExprId, NodeIdGen, PatternId};
pub use pattern::{Pattern, PatternKind};
pub use program::Program;
pub use types::{Constraint, ConstructorDef, Primitive, Scheme, Type};
