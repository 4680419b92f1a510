//! noolang-sem — the Typer (spec.md §4.T, component T, 35% of the core):
//! Hindley-Milner inference extended with row/record constraints, effect
//! sets, and trait resolution, plus the Trait Registry (component R) and
//! the type-time half of the module loader (component M).
//!
//! Grounded on `faxc-sem`'s crate shape — a threaded mutable state object,
//! a substitution module, a scope-nested environment — generalized from
//! Rust's monomorphic borrow-checked type system to Noolang's
//! let-polymorphic, effect-and-constraint-extended one.

pub mod env;
pub mod generalize;
pub mod infer;
pub mod module;
pub mod pattern;
pub mod registry;
pub mod state;
pub mod stdlib;
pub mod unify;

use std::path::Path;

use noolang_ast::{EffectSet, Program, Type};
use noolang_util::NoolangError;

pub use env::{Binding, TypeEnv};
pub use generalize::{generalize, instantiate};
pub use registry::{head_name, ConstraintDef, Implementation, TraitRegistry};
pub use state::{AdtInfo, AdtRegistry, DecoratedTypes, TypeState};
pub use unify::{discharge, resolve, unify};

/// Types an entire program: every statement in sequence, threading one
/// `TypeState` through all of them so later statements see earlier
/// definitions (spec.md §4.T). Returns the last statement's type (a bare
/// expression statement's value is what the REPL and `--eval` report) and
/// the union of every statement's effects.
///
/// `base` is the path the program's source came from, if any — threaded
/// through so `import` inside it resolves relative paths (spec.md §4.M).
pub fn check_program(
    state: &mut TypeState,
    program: &Program,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let mut last_ty = Type::Unit;
    let mut effects = EffectSet::new();

    for stmt in &program.statements {
        let (ty, eff) = infer::infer_expr(state, stmt, base)?;
        last_ty = ty;
        effects = effects.union(&eff);
    }

    let last_ty = resolve(state, &last_ty);
    finalize_decorations(state);
    Ok((last_ty, effects))
}

/// Types a single standalone expression — the REPL's per-input entry point
/// (spec.md §6: each REPL input is typed and evaluated independently,
/// against the persisted environment from prior inputs).
pub fn check_expr(
    state: &mut TypeState,
    expr: &noolang_ast::Expr,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let (ty, effects) = infer::infer_expr(state, expr, base)?;
    let ty = resolve(state, &ty);
    finalize_decorations(state);
    Ok((ty, effects))
}

/// Re-resolves every decorated node's type through the completed
/// substitution. Must run after a program (or REPL input) finishes
/// checking, since inference decorates each node as it's visited, before
/// later unifications can still refine its variables further.
fn finalize_decorations(state: &mut TypeState) {
    let mut decorations = std::mem::take(&mut state.decorations);
    decorations.finalize(|ty| resolve(state, ty));
    state.decorations = decorations;
}
