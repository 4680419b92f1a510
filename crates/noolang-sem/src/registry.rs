//! The Trait Registry (spec.md §4.R): stores constraint (trait)
//! definitions and their implementations, indexed for dispatch by head
//! constructor name. This is the *type-level* registry the typer uses to
//! check `is`/`implements`/custom constraints and to type-check
//! `implement` bodies against declared signatures; `noolang-eval` keeps a
//! separate, runtime-dispatch registry of implementation bodies.

use indexmap::IndexMap;
use noolang_ast::{Constraint, Type};
use noolang_util::Symbol;

#[derive(Debug, Clone)]
pub struct ConstraintDef {
    pub name: Symbol,
    pub type_param: Symbol,
    pub functions: IndexMap<Symbol, Type>,
}

#[derive(Debug, Clone)]
pub struct Implementation {
    pub constraint_name: Symbol,
    pub head: Type,
    pub head_name: Symbol,
    pub given: Option<Constraint>,
    pub functions: IndexMap<Symbol, Type>,
}

#[derive(Debug, Clone, Default)]
pub struct TraitRegistry {
    constraints: IndexMap<Symbol, ConstraintDef>,
    /// Indexed by `(constraint name, head constructor name)`; insertion
    /// order preserved within each bucket for stable diagnostics.
    implementations: IndexMap<(Symbol, Symbol), Vec<Implementation>>,
}

/// The head constructor name used as a trait-dispatch key: primitive
/// names, `List`, `Tuple`, `Record`, or an ADT/variant's own name.
pub fn head_name(ty: &Type) -> Option<Symbol> {
    match ty {
        Type::Primitive(p) => Some(Symbol::intern(match p {
            noolang_ast::Primitive::Float => "Float",
            noolang_ast::Primitive::String => "String",
            noolang_ast::Primitive::Bool => "Bool",
        })),
        Type::List(_) => Some(Symbol::intern("List")),
        Type::Tuple(_) => Some(Symbol::intern("Tuple")),
        Type::Record(_) => Some(Symbol::intern("Record")),
        Type::Unit => Some(Symbol::intern("Unit")),
        Type::Variant(name, _) => Some(*name),
        Type::Adt { name, .. } => Some(*name),
        Type::Function { .. } => Some(Symbol::intern("Function")),
        Type::Variable(_, _) | Type::Union(_) | Type::Unknown => None,
    }
}

impl TraitRegistry {
    /// Idempotent per program: redefining the same constraint name is a
    /// no-op rather than an error, since `constraint` blocks may be
    /// re-evaluated across REPL inputs.
    pub fn define_constraint(&mut self, def: ConstraintDef) {
        self.constraints.entry(def.name).or_insert(def);
    }

    pub fn constraint(&self, name: Symbol) -> Option<&ConstraintDef> {
        self.constraints.get(&name)
    }

    pub fn knows(&self, name: Symbol) -> bool {
        self.constraints.contains_key(&name)
    }

    pub fn add_implementation(&mut self, imp: Implementation) {
        self.implementations
            .entry((imp.constraint_name, imp.head_name))
            .or_default()
            .push(imp);
    }

    /// First implementation whose head matches, ignoring `given` clauses
    /// (used by constraint discharge, which only needs to know *an*
    /// implementation exists for the head).
    pub fn implementation_for(&self, constraint: Symbol, head: Symbol) -> Option<&Implementation> {
        self.implementations.get(&(constraint, head)).and_then(|v| v.first())
    }

    /// All candidates for a head, for callers that need to report
    /// ambiguity themselves (spec.md §4.R: "the caller must handle
    /// ambiguity as a type error").
    pub fn candidates(&self, constraint: Symbol, head: Symbol) -> &[Implementation] {
        self.implementations.get(&(constraint, head)).map(Vec::as_slice).unwrap_or(&[])
    }
}
