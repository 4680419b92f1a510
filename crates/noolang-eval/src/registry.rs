//! The runtime trait registry (spec.md §4.E/§9): implementation bodies as
//! closures, indexed by `(constraint name, head value tag)`, fully
//! decoupled from `noolang-sem`'s type-level registry — the typer only
//! needs signatures and `given` clauses, the evaluator only needs bodies
//! to call.

use indexmap::IndexMap;
use noolang_util::Symbol;

use crate::value::Value;

#[derive(Clone)]
pub struct RuntimeImplementation {
    pub head_name: Symbol,
    pub functions: IndexMap<Symbol, Value>,
}

#[derive(Clone, Default)]
pub struct RuntimeTraitRegistry {
    implementations: IndexMap<(Symbol, Symbol), Vec<RuntimeImplementation>>,
    /// Every function name a constraint declares, so the evaluator knows
    /// how many arguments a `TraitFunction` value needs to collect before
    /// it can dispatch (spec.md §4.E: "collects applied arguments until
    /// the trait's head parameter is bound").
    pub arities: rustc_hash::FxHashMap<(Symbol, Symbol), usize>,
}

impl RuntimeTraitRegistry {
    pub fn add_implementation(&mut self, constraint: Symbol, imp: RuntimeImplementation) {
        self.implementations.entry((constraint, imp.head_name)).or_default().push(imp);
    }

    pub fn function_for(&self, constraint: Symbol, head: Symbol, function: Symbol) -> Option<Value> {
        self.implementations
            .get(&(constraint, head))?
            .iter()
            .find_map(|imp| imp.functions.get(&function).cloned())
    }

    pub fn set_arity(&mut self, constraint: Symbol, function: Symbol, arity: usize) {
        self.arities.insert((constraint, function), arity);
    }

    pub fn arity_of(&self, constraint: Symbol, function: Symbol) -> Option<usize> {
        self.arities.get(&(constraint, function)).copied()
    }
}
