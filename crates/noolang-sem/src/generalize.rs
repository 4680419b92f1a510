//! Generalization and instantiation (spec.md §3/§4.T).

use std::collections::HashMap;

use noolang_ast::{Constraint, Scheme, Type};
use noolang_util::Symbol;

use crate::env::free_vars_of;
use crate::state::TypeState;
use crate::unify::resolve;

/// Computes the free variables of `ty` (after resolving through the
/// current substitution) that are *not* free in the enclosing
/// environment — the standard let-polymorphism rule — and quantifies
/// them, carrying along any constraints pending on those variables.
pub fn generalize(state: &mut TypeState, ty: &Type) -> Scheme {
    let resolved = resolve(state, ty);
    let mut ty_vars = std::collections::HashSet::new();
    free_vars_of(&resolved, &mut ty_vars);

    let env_vars = state.env.free_vars();
    let mut quantified: Vec<Symbol> = ty_vars.difference(&env_vars).copied().collect();
    quantified.sort_by_key(|s| s.as_str().to_string());

    let mut constraints = Vec::new();
    for var in &quantified {
        if let Some(cs) = state.pending_constraints.get(var) {
            constraints.extend(cs.iter().cloned());
        }
    }

    Scheme { vars: quantified, constraints, ty: resolved }
}

/// Replaces each quantified variable in `scheme` with a fresh unification
/// variable, cloning the scheme's constraints onto the fresh instances
/// (spec.md §4.T: "Instantiation replaces each quantified variable with a
/// fresh unification variable and clones attached constraints onto the
/// instances").
pub fn instantiate(state: &mut TypeState, scheme: &Scheme) -> Type {
    let mut mapping: HashMap<Symbol, Type> = HashMap::new();
    for var in &scheme.vars {
        mapping.insert(*var, state.fresh_var());
    }
    for constraint in &scheme.constraints {
        let renamed = rename_constraint(constraint, &mapping);
        if let Some(var) = constraint_subject(&renamed) {
            state.pending_constraints.entry(var).or_default().push(renamed);
        }
    }
    substitute_vars(&scheme.ty, &mapping)
}

fn constraint_subject(c: &Constraint) -> Option<Symbol> {
    match c {
        Constraint::Is(a, _)
        | Constraint::Implements(a, _)
        | Constraint::HasField(a, _, _)
        | Constraint::HasStructure(a, _)
        | Constraint::Custom(a, _, _) => Some(*a),
        Constraint::And(l, _) | Constraint::Or(l, _) | Constraint::Paren(l) => constraint_subject(l),
    }
}

fn substitute_vars(ty: &Type, mapping: &HashMap<Symbol, Type>) -> Type {
    match ty {
        Type::Variable(name, constraints) => mapping.get(name).cloned().unwrap_or_else(|| {
            Type::Variable(*name, constraints.iter().map(|c| rename_constraint(c, mapping)).collect())
        }),
        Type::Function { params, ret, effects, constraints } => Type::Function {
            params: params.iter().map(|p| substitute_vars(p, mapping)).collect(),
            ret: Box::new(substitute_vars(ret, mapping)),
            effects: effects.clone(),
            constraints: constraints.iter().map(|c| rename_constraint(c, mapping)).collect(),
        },
        Type::List(elem) => Type::List(Box::new(substitute_vars(elem, mapping))),
        Type::Tuple(elems) => Type::Tuple(elems.iter().map(|t| substitute_vars(t, mapping)).collect()),
        Type::Record(fields) => {
            let mut out = indexmap::IndexMap::new();
            for (k, v) in fields {
                out.insert(*k, substitute_vars(v, mapping));
            }
            Type::Record(out)
        }
        Type::Variant(name, args) => {
            Type::Variant(*name, args.iter().map(|t| substitute_vars(t, mapping)).collect())
        }
        Type::Adt { name, type_params, constructors } => Type::Adt {
            name: *name,
            type_params: type_params.clone(),
            constructors: constructors
                .iter()
                .map(|c| noolang_ast::ConstructorDef {
                    name: c.name,
                    params: c.params.iter().map(|t| substitute_vars(t, mapping)).collect(),
                })
                .collect(),
        },
        Type::Union(tys) => Type::Union(tys.iter().map(|t| substitute_vars(t, mapping)).collect()),
        Type::Primitive(_) | Type::Unit | Type::Unknown => ty.clone(),
    }
}

fn rename_constraint(c: &Constraint, mapping: &HashMap<Symbol, Type>) -> Constraint {
    let rename_var = |a: &Symbol| -> Symbol {
        match mapping.get(a) {
            Some(Type::Variable(name, _)) => *name,
            _ => *a,
        }
    };
    match c {
        Constraint::Is(a, class) => Constraint::Is(rename_var(a), *class),
        Constraint::Implements(a, tr) => Constraint::Implements(rename_var(a), *tr),
        Constraint::HasField(a, f, t) => {
            Constraint::HasField(rename_var(a), *f, Box::new(substitute_vars(t, mapping)))
        }
        Constraint::HasStructure(a, fields) => Constraint::HasStructure(
            rename_var(a),
            fields.iter().map(|(f, t)| (*f, substitute_vars(t, mapping))).collect(),
        ),
        Constraint::Custom(a, class, args) => Constraint::Custom(
            rename_var(a),
            *class,
            args.iter().map(|t| substitute_vars(t, mapping)).collect(),
        ),
        Constraint::And(l, r) => Constraint::And(
            Box::new(rename_constraint(l, mapping)),
            Box::new(rename_constraint(r, mapping)),
        ),
        Constraint::Or(l, r) => Constraint::Or(
            Box::new(rename_constraint(l, mapping)),
            Box::new(rename_constraint(r, mapping)),
        ),
        Constraint::Paren(inner) => Constraint::Paren(Box::new(rename_constraint(inner, mapping))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noolang_ast::Type;

    #[test]
    fn generalize_quantifies_a_free_variable_not_in_the_environment() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        let scheme = generalize(&mut state, &var);
        assert_eq!(scheme.vars.len(), 1);
    }

    #[test]
    fn generalize_does_not_quantify_variables_still_free_in_the_environment() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        state.env.define(Symbol::intern("x"), Scheme::monomorphic(var.clone()));
        let scheme = generalize(&mut state, &var);
        assert!(scheme.vars.is_empty(), "a variable still bound by the env must not be quantified");
    }

    #[test]
    fn two_instantiations_of_the_same_scheme_are_independent() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        let scheme = generalize(&mut state, &var);

        let a = instantiate(&mut state, &scheme);
        let b = instantiate(&mut state, &scheme);
        assert_ne!(a, b, "each instantiation must allocate its own fresh variable");

        // Binding one instance must not affect the other.
        crate::unify::unify(&mut state, &a, &Type::float(), noolang_util::Span::default()).unwrap();
        let b_resolved = resolve(&state, &b);
        assert_ne!(b_resolved, Type::float());
    }

    #[test]
    fn instantiate_clones_constraints_onto_the_fresh_variable() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        let name = match &var {
            Type::Variable(name, _) => *name,
            _ => unreachable!(),
        };
        state.pending_constraints.insert(name, vec![Constraint::Is(name, Symbol::intern("Num"))]);
        let scheme = generalize(&mut state, &var);
        assert_eq!(scheme.constraints.len(), 1);

        let instance = instantiate(&mut state, &scheme);
        let instance_name = match &instance {
            Type::Variable(name, _) => *name,
            _ => unreachable!(),
        };
        assert_ne!(instance_name, name, "instantiation must rename the quantified variable");
        assert!(state.pending_constraints.contains_key(&instance_name));
    }
}
