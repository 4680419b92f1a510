//! Unification, occurs check, and constraint discharge (spec.md §4.T).

use noolang_ast::{Constraint, Type};
use noolang_util::{ErrorInfo, Span, TypeError, TypeErrorKind};

use crate::registry::head_name;
use crate::state::TypeState;

/// Applies the current substitution to `ty`, following chains to a fixed
/// point and re-materializing any pending constraints onto unbound
/// variables it bottoms out at (spec.md §3: "Substitutions must be
/// idempotent after composition").
pub fn resolve(state: &TypeState, ty: &Type) -> Type {
    match ty {
        Type::Variable(name, _) => {
            if let Some(bound) = state.subst.get(*name) {
                resolve(state, &bound.clone())
            } else {
                let constraints =
                    state.pending_constraints.get(name).cloned().unwrap_or_default();
                Type::Variable(*name, constraints)
            }
        }
        Type::Function { params, ret, effects, constraints } => Type::Function {
            params: params.iter().map(|p| resolve(state, p)).collect(),
            ret: Box::new(resolve(state, ret)),
            effects: effects.clone(),
            constraints: constraints.clone(),
        },
        Type::List(elem) => Type::List(Box::new(resolve(state, elem))),
        Type::Tuple(elems) => Type::Tuple(elems.iter().map(|t| resolve(state, t)).collect()),
        Type::Record(fields) => {
            let mut out = indexmap::IndexMap::new();
            for (k, v) in fields {
                out.insert(*k, resolve(state, v));
            }
            Type::Record(out)
        }
        Type::Variant(name, args) => {
            Type::Variant(*name, args.iter().map(|t| resolve(state, t)).collect())
        }
        Type::Adt { name, type_params, constructors } => Type::Adt {
            name: *name,
            type_params: type_params.clone(),
            constructors: constructors.clone(),
        },
        Type::Union(tys) => Type::Union(tys.iter().map(|t| resolve(state, t)).collect()),
        Type::Primitive(_) | Type::Unit | Type::Unknown => ty.clone(),
    }
}

fn occurs(state: &TypeState, var: noolang_util::Symbol, ty: &Type) -> bool {
    match ty {
        Type::Variable(name, _) => {
            if *name == var {
                return true;
            }
            if let Some(bound) = state.subst.get(*name) {
                occurs(state, var, &bound.clone())
            } else {
                false
            }
        }
        Type::Function { params, ret, .. } => {
            params.iter().any(|p| occurs(state, var, p)) || occurs(state, var, ret)
        }
        Type::List(elem) => occurs(state, var, elem),
        Type::Tuple(elems) => elems.iter().any(|t| occurs(state, var, t)),
        Type::Record(fields) => fields.values().any(|t| occurs(state, var, t)),
        Type::Variant(_, args) => args.iter().any(|t| occurs(state, var, t)),
        Type::Union(tys) => tys.iter().any(|t| occurs(state, var, t)),
        Type::Adt { .. } | Type::Primitive(_) | Type::Unit | Type::Unknown => false,
    }
}

fn type_name(ty: &Type) -> String {
    ty.to_string()
}

fn mismatch(a: &Type, b: &Type, span: Span) -> TypeError {
    TypeError::at(
        TypeErrorKind::Unification { expected: type_name(a), found: type_name(b) },
        span,
    )
}

/// Binds unification variable `var` (carrying `constraints`) to `ty`,
/// discharging its constraints immediately if `ty` is concrete, or
/// propagating them onto `ty`'s variable if it's still unbound.
fn bind(
    state: &mut TypeState,
    var: noolang_util::Symbol,
    constraints: Vec<Constraint>,
    ty: Type,
    span: Span,
) -> Result<(), TypeError> {
    if let Type::Variable(other, other_constraints) = &ty {
        let other = *other;
        state.subst.insert(var, Type::Variable(other, Vec::new()));
        let mut merged = state.pending_constraints.remove(&other).unwrap_or_default();
        merged.extend(other_constraints.iter().cloned());
        merged.extend(constraints);
        if !merged.is_empty() {
            state.pending_constraints.insert(other, merged);
        }
        return Ok(());
    }
    for c in &constraints {
        discharge(state, c, &ty, span)?;
    }
    state.subst.insert(var, ty);
    Ok(())
}

/// Checks a single constraint against a concrete type head. `Or` is kept
/// as a connective (not flattened into `And` during solving, per spec.md
/// §9's explicit instruction) and evaluated disjunctively here.
pub fn discharge(
    state: &mut TypeState,
    constraint: &Constraint,
    ty: &Type,
    span: Span,
) -> Result<(), TypeError> {
    match constraint {
        Constraint::Is(_, class) | Constraint::Implements(_, class) => {
            let head = head_name(ty).ok_or_else(|| {
                TypeError::at(
                    TypeErrorKind::ConstraintNotSatisfied {
                        description: format!("{} is {class}", type_name(ty)),
                    },
                    span,
                )
            })?;
            if state.registry.implementation_for(*class, head).is_some() {
                Ok(())
            } else {
                Err(TypeError::at(
                    TypeErrorKind::ConstraintNotSatisfied {
                        description: format!("no implementation of `{class}` for `{head}`"),
                    },
                    span,
                ))
            }
        }
        Constraint::HasField(_, field, expected) => {
            require_field(state, ty, *field, expected, span)
        }
        Constraint::HasStructure(_, fields) => {
            for (field, expected) in fields {
                require_field(state, ty, *field, expected, span)?;
            }
            Ok(())
        }
        Constraint::Custom(_, class, _args) => {
            let head = head_name(ty);
            match head.and_then(|h| state.registry.implementation_for(*class, h)) {
                Some(_) => Ok(()),
                None if state.registry.knows(*class) => Err(TypeError::at(
                    TypeErrorKind::ConstraintNotSatisfied {
                        description: format!(
                            "no implementation of `{class}` for `{}`",
                            type_name(ty)
                        ),
                    },
                    span,
                )),
                // An undeclared custom constraint is accepted optimistically;
                // there is nothing registered to check it against.
                None => Ok(()),
            }
        }
        Constraint::And(l, r) => {
            discharge(state, l, ty, span)?;
            discharge(state, r, ty, span)
        }
        Constraint::Or(l, r) => {
            let saved = state.subst.clone();
            if discharge(state, l, ty, span).is_ok() {
                return Ok(());
            }
            state.subst = saved;
            discharge(state, r, ty, span)
        }
        Constraint::Paren(inner) => discharge(state, inner, ty, span),
    }
}

fn require_field(
    state: &mut TypeState,
    ty: &Type,
    field: noolang_util::Symbol,
    expected: &Type,
    span: Span,
) -> Result<(), TypeError> {
    let resolved = resolve(state, ty);
    match &resolved {
        Type::Record(fields) => match fields.get(&field) {
            Some(found) => unify(state, found, expected, span),
            None => Err(TypeError::at(
                TypeErrorKind::ConstraintNotSatisfied {
                    description: format!("record has no field `{field}`"),
                },
                span,
            )),
        },
        Type::Unknown => Ok(()),
        other => Err(TypeError::at(
            TypeErrorKind::ConstraintNotSatisfied {
                description: format!("`{}` is not a record with field `{field}`", type_name(other)),
            },
            span,
        )),
    }
}

/// Unifies two types, applying the current substitution to both sides
/// first (spec.md §4.T: "Unifying a variable against a type first applies
/// the current substitution to both sides").
pub fn unify(state: &mut TypeState, a: &Type, b: &Type, span: Span) -> Result<(), TypeError> {
    let a = resolve(state, a);
    let b = resolve(state, b);

    match (&a, &b) {
        (Type::Unknown, _) | (_, Type::Unknown) => Ok(()),
        (Type::Variable(v1, c1), Type::Variable(v2, c2)) if v1 == v2 => {
            let mut merged = c1.clone();
            merged.extend(c2.iter().cloned());
            if !merged.is_empty() {
                state.pending_constraints.insert(*v1, merged);
            }
            Ok(())
        }
        (Type::Variable(v, constraints), other) | (other, Type::Variable(v, constraints)) => {
            if occurs(state, *v, other) {
                return Err(TypeError::at(
                    TypeErrorKind::OccursCheck { var: v.to_string(), ty: type_name(other) },
                    span,
                ));
            }
            bind(state, *v, constraints.clone(), other.clone(), span)
        }
        (Type::Primitive(p1), Type::Primitive(p2)) => {
            if p1 == p2 {
                Ok(())
            } else {
                Err(mismatch(&a, &b, span))
            }
        }
        (Type::Unit, Type::Unit) => Ok(()),
        (Type::List(e1), Type::List(e2)) => unify(state, e1, e2, span),
        (Type::Tuple(t1), Type::Tuple(t2)) => {
            if t1.len() != t2.len() {
                return Err(mismatch(&a, &b, span));
            }
            for (x, y) in t1.iter().zip(t2) {
                unify(state, x, y, span)?;
            }
            Ok(())
        }
        (Type::Record(f1), Type::Record(f2)) => {
            if f1.len() != f2.len() || !f1.keys().all(|k| f2.contains_key(k)) {
                return Err(mismatch(&a, &b, span));
            }
            for (k, t1) in f1 {
                unify(state, t1, &f2[k], span)?;
            }
            Ok(())
        }
        (Type::Variant(n1, a1), Type::Variant(n2, a2)) => {
            if n1 != n2 || a1.len() != a2.len() {
                return Err(mismatch(&a, &b, span));
            }
            for (x, y) in a1.iter().zip(a2) {
                unify(state, x, y, span)?;
            }
            Ok(())
        }
        (
            Type::Function { params: p1, ret: r1, effects: e1, .. },
            Type::Function { params: p2, ret: r2, effects: e2, .. },
        ) => {
            if p1.len() != p2.len() {
                return Err(mismatch(&a, &b, span));
            }
            for (x, y) in p1.iter().zip(p2) {
                unify(state, x, y, span)?;
            }
            unify(state, r1, r2, span)?;
            let _ = (e1, e2); // effects are a lower bound, not unified structurally
            Ok(())
        }
        _ => Err(mismatch(&a, &b, span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ConstraintDef, Implementation};
    use indexmap::IndexMap;
    use noolang_util::Symbol;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn unifying_two_floats_succeeds() {
        let mut state = TypeState::new();
        assert!(unify(&mut state, &Type::float(), &Type::float(), span()).is_ok());
    }

    #[test]
    fn unifying_a_float_with_a_string_is_a_mismatch() {
        let mut state = TypeState::new();
        let err = unify(&mut state, &Type::float(), &Type::string(), span()).unwrap_err();
        assert!(matches!(err.kind, TypeErrorKind::Unification { .. }));
    }

    #[test]
    fn unifying_a_variable_binds_it_in_the_substitution() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        unify(&mut state, &var, &Type::bool(), span()).unwrap();
        assert_eq!(resolve(&state, &var), Type::bool());
    }

    #[test]
    fn occurs_check_rejects_a_self_referential_binding() {
        let mut state = TypeState::new();
        let var = state.fresh_var();
        let list_of_self = Type::List(Box::new(var.clone()));
        let err = unify(&mut state, &var, &list_of_self, span()).unwrap_err();
        assert!(matches!(err.kind, TypeErrorKind::OccursCheck { .. }));
    }

    #[test]
    fn record_unification_requires_identical_field_sets() {
        let mut state = TypeState::new();
        let mut a = IndexMap::new();
        a.insert(Symbol::intern("x"), Type::float());
        let mut b = IndexMap::new();
        b.insert(Symbol::intern("y"), Type::float());
        let err = unify(&mut state, &Type::Record(a), &Type::Record(b), span()).unwrap_err();
        assert!(matches!(err.kind, TypeErrorKind::Unification { .. }));
    }

    #[test]
    fn or_constraint_succeeds_if_either_disjunct_is_satisfied() {
        let mut state = TypeState::new();
        let class_a = Symbol::intern("HasA");
        let class_b = Symbol::intern("HasB");
        state.registry.define_constraint(ConstraintDef {
            name: class_b,
            type_param: Symbol::intern("a"),
            functions: IndexMap::new(),
        });
        state.registry.add_implementation(Implementation {
            constraint_name: class_b,
            head: Type::float(),
            head_name: Symbol::intern("Float"),
            given: None,
            functions: IndexMap::new(),
        });

        let var = Symbol::intern("t");
        let constraint = Constraint::Or(
            Box::new(Constraint::Is(var, class_a)),
            Box::new(Constraint::Is(var, class_b)),
        );
        // `class_a` has no implementation for Float; `class_b` does, so the
        // disjunction as a whole must still succeed.
        assert!(discharge(&mut state, &constraint, &Type::float(), span()).is_ok());
    }

    #[test]
    fn or_constraint_fails_if_neither_disjunct_is_satisfied() {
        let mut state = TypeState::new();
        let var = Symbol::intern("t");
        let constraint = Constraint::Or(
            Box::new(Constraint::Is(var, Symbol::intern("Nope1"))),
            Box::new(Constraint::Is(var, Symbol::intern("Nope2"))),
        );
        assert!(discharge(&mut state, &constraint, &Type::float(), span()).is_err());
    }
}
