//! The type environment: maps names to type schemes, in nested scopes
//! (spec.md §3: "The type environment maps names -> type schemes ... Both
//! environments preserve insertion order for diagnostics").

use indexmap::IndexMap;
use std::collections::HashSet;

use noolang_ast::{Constraint, Scheme, Type};
use noolang_util::Symbol;

#[derive(Clone)]
pub struct Binding {
    pub scheme: Scheme,
    pub mutable: bool,
}

#[derive(Clone)]
pub struct TypeEnv {
    scopes: Vec<IndexMap<Symbol, Binding>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv { scopes: vec![IndexMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        if self.scopes.is_empty() {
            self.scopes.push(IndexMap::new());
        }
    }

    pub fn define(&mut self, name: Symbol, scheme: Scheme) {
        self.scopes.last_mut().unwrap().insert(name, Binding { scheme, mutable: false });
    }

    pub fn define_mutable(&mut self, name: Symbol, scheme: Scheme) {
        self.scopes.last_mut().unwrap().insert(name, Binding { scheme, mutable: true });
    }

    pub fn lookup(&self, name: Symbol) -> Option<&Binding> {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.get(&name) {
                return Some(binding);
            }
        }
        None
    }

    /// Every name bound directly in the innermost scope, for the REPL's
    /// `.types` command. The REPL's persisted state never pushes beyond the
    /// outermost scope between inputs, so this is the full persisted set.
    pub fn names(&self) -> Vec<Symbol> {
        self.scopes.last().map(|scope| scope.keys().copied().collect()).unwrap_or_default()
    }

    /// Free type variables of the *entire* environment — used by
    /// generalization to decide which of a value's free variables may be
    /// quantified (those not also free in an enclosing binder's type).
    pub fn free_vars(&self) -> HashSet<Symbol> {
        let mut out = HashSet::new();
        for scope in &self.scopes {
            for binding in scope.values() {
                let mut scheme_vars = HashSet::new();
                free_vars_of(&binding.scheme.ty, &mut scheme_vars);
                for v in &binding.scheme.vars {
                    scheme_vars.remove(v);
                }
                out.extend(scheme_vars);
            }
        }
        out
    }
}

/// Free type variables of a monotype (ignoring any `Scheme` quantifiers —
/// callers subtract those separately).
pub fn free_vars_of(ty: &Type, out: &mut HashSet<Symbol>) {
    match ty {
        Type::Variable(name, constraints) => {
            out.insert(*name);
            for c in constraints {
                free_vars_of_constraint(c, out);
            }
        }
        Type::Function { params, ret, constraints, .. } => {
            for p in params {
                free_vars_of(p, out);
            }
            free_vars_of(ret, out);
            for c in constraints {
                free_vars_of_constraint(c, out);
            }
        }
        Type::List(elem) => free_vars_of(elem, out),
        Type::Tuple(elems) => elems.iter().for_each(|t| free_vars_of(t, out)),
        Type::Record(fields) => fields.values().for_each(|t| free_vars_of(t, out)),
        Type::Variant(_, args) => args.iter().for_each(|t| free_vars_of(t, out)),
        Type::Adt { constructors, .. } => {
            for c in constructors {
                c.params.iter().for_each(|t| free_vars_of(t, out));
            }
        }
        Type::Union(tys) => tys.iter().for_each(|t| free_vars_of(t, out)),
        Type::Primitive(_) | Type::Unit | Type::Unknown => {}
    }
}

fn free_vars_of_constraint(c: &Constraint, out: &mut HashSet<Symbol>) {
    match c {
        Constraint::Is(a, _) | Constraint::Implements(a, _) => {
            out.insert(*a);
        }
        Constraint::HasField(a, _, t) => {
            out.insert(*a);
            free_vars_of(t, out);
        }
        Constraint::HasStructure(a, fields) => {
            out.insert(*a);
            for (_, t) in fields {
                free_vars_of(t, out);
            }
        }
        Constraint::Custom(a, _, args) => {
            out.insert(*a);
            args.iter().for_each(|t| free_vars_of(t, out));
        }
        Constraint::And(l, r) | Constraint::Or(l, r) => {
            free_vars_of_constraint(l, out);
            free_vars_of_constraint(r, out);
        }
        Constraint::Paren(inner) => free_vars_of_constraint(inner, out),
    }
}
