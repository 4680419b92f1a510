//! Pattern typing for `match` arms and destructuring definitions
//! (spec.md §4.T: "bind pattern variables into a nested scope with types
//! derived from the scrutinee's constructor signatures").

use indexmap::IndexMap;
use noolang_ast::{Literal, Pattern, PatternKind, Scheme, Type};
use noolang_util::{Span, TypeError, TypeErrorKind};

use crate::generalize::instantiate;
use crate::state::TypeState;
use crate::unify::{resolve, unify};

/// Binds every variable in `pattern` into the current (innermost) scope of
/// `state.env`, unifying the pattern's shape against `scrutinee`.
pub fn bind_pattern(
    state: &mut TypeState,
    pattern: &Pattern,
    scrutinee: &Type,
) -> Result<(), TypeError> {
    match &pattern.kind {
        PatternKind::Variable(name) => {
            state.env.define(*name, Scheme::monomorphic(scrutinee.clone()));
            Ok(())
        }
        PatternKind::Wildcard => Ok(()),
        PatternKind::Literal(lit) => {
            let lit_ty = literal_type(lit);
            unify(state, scrutinee, &lit_ty, pattern.span)
        }
        PatternKind::Constructor(name, args) => {
            bind_constructor_pattern(state, *name, args, scrutinee, pattern.span)
        }
        PatternKind::Tuple(elements) => {
            let fresh: Vec<Type> = elements.iter().map(|_| state.fresh_var()).collect();
            unify(state, scrutinee, &Type::Tuple(fresh.clone()), pattern.span)?;
            for (elem_pattern, elem_ty) in elements.iter().zip(fresh.iter()) {
                bind_pattern(state, elem_pattern, elem_ty)?;
            }
            Ok(())
        }
        PatternKind::Record(fields) => {
            let resolved = resolve(state, scrutinee);
            match &resolved {
                Type::Record(record_fields) => {
                    for (name, field_pattern) in fields {
                        let field_ty = record_fields.get(name).cloned().ok_or_else(|| {
                            TypeError::at(
                                TypeErrorKind::ConstraintNotSatisfied {
                                    description: format!("record has no field `{name}`"),
                                },
                                pattern.span,
                            )
                        })?;
                        bind_pattern(state, field_pattern, &field_ty)?;
                    }
                    Ok(())
                }
                Type::Variable(_, _) => {
                    let mut synthesized = IndexMap::new();
                    let mut field_tys = Vec::new();
                    for (name, field_pattern) in fields {
                        let fresh = state.fresh_var();
                        synthesized.insert(*name, fresh.clone());
                        field_tys.push((field_pattern, fresh));
                    }
                    unify(state, scrutinee, &Type::Record(synthesized), pattern.span)?;
                    for (field_pattern, ty) in field_tys {
                        bind_pattern(state, field_pattern, &ty)?;
                    }
                    Ok(())
                }
                other => Err(TypeError::at(
                    TypeErrorKind::Unification {
                        expected: "record".into(),
                        found: other.to_string(),
                    },
                    pattern.span,
                )),
            }
        }
    }
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Number(_) => Type::float(),
        Literal::String(_) => Type::string(),
        Literal::Bool(_) => Type::bool(),
        Literal::Unit => Type::Unit,
    }
}

fn bind_constructor_pattern(
    state: &mut TypeState,
    name: noolang_util::Symbol,
    args: &[Pattern],
    scrutinee: &Type,
    span: Span,
) -> Result<(), TypeError> {
    let scheme = state
        .env
        .lookup(name)
        .map(|b| b.scheme.clone())
        .ok_or_else(|| TypeError::at(TypeErrorKind::UnknownConstructor { name: name.to_string() }, span))?;

    let ctor_ty = instantiate(state, &scheme);
    let (params, ret) = uncurry(&ctor_ty, args.len());
    if params.len() != args.len() {
        return Err(TypeError::at(
            TypeErrorKind::ArityMismatch { expected: params.len(), found: args.len() },
            span,
        ));
    }
    unify(state, scrutinee, &ret, span)?;
    for (arg_pattern, param_ty) in args.iter().zip(params.iter()) {
        bind_pattern(state, arg_pattern, param_ty)?;
    }
    Ok(())
}

/// Peels up to `n` curried single-parameter arrows off a (possibly
/// nullary) constructor type, returning the parameter types peeled and
/// the final result type. Constructors are always built as a chain of
/// single-param arrows (spec.md §4.T: "an n-ary constructor is a curried
/// function"), so each step consumes exactly one parameter.
fn uncurry(ty: &Type, n: usize) -> (Vec<Type>, Type) {
    let mut params = Vec::new();
    let mut current = ty.clone();
    for _ in 0..n {
        match current {
            Type::Function { params: p, ret, .. } if p.len() == 1 => {
                params.push(p[0].clone());
                current = *ret;
            }
            _ => break,
        }
    }
    (params, current)
}
