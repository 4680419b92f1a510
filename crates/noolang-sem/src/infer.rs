//! Algorithm W, extended with row/effect/trait solving (spec.md §4.T). One
//! function, `infer_expr`, walks every `ExprKind` and returns the node's
//! type together with the effects it produces; it decorates `state`'s
//! `DecoratedTypes` map as it goes so a later finalization pass can
//! re-resolve every node through the completed substitution.
//!
//! Grounded on `faxc-sem/src/infer.rs`'s shape (one recursive function
//! threading a mutable inference state through the tree), generalized from
//! Rust's declaration-first type checking to Noolang's expression-oriented
//! Algorithm W with effects and constraints layered on top.

use std::path::Path;

use indexmap::IndexMap;

use noolang_ast::{
    BinaryOp, Constraint, ConstructorDef, Effect, EffectSet, Expr, ExprKind, Literal, Scheme, Type,
};
use noolang_util::{NoolangError, Span, TypeError, TypeErrorKind};

use crate::generalize::{generalize, instantiate};
use crate::pattern::bind_pattern;
use crate::registry::{head_name, ConstraintDef, Implementation};
use crate::state::{AdtInfo, TypeState};
use crate::unify::{discharge, resolve, unify};

/// Infers `expr`'s type and the effects it produces, decorating
/// `state.decorations` with the (possibly still-unresolved) type for this
/// node. `base` is the path of the file `expr` came from, threaded through
/// so `import` can resolve relative paths (spec.md §4.M).
pub fn infer_expr(
    state: &mut TypeState,
    expr: &Expr,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let (ty, effects) = infer_kind(state, expr, base)?;
    state.decorations.set(expr.id, ty.clone());
    Ok((ty, effects))
}

fn infer_kind(
    state: &mut TypeState,
    expr: &Expr,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let span = expr.span;
    match &expr.kind {
        ExprKind::Literal(lit) => Ok((literal_type(lit), EffectSet::new())),

        ExprKind::Variable(name) => {
            let binding = state
                .env
                .lookup(*name)
                .cloned()
                .ok_or_else(|| type_err(TypeErrorKind::UndefinedVariable { name: name.to_string() }, span))?;
            Ok((instantiate(state, &binding.scheme), EffectSet::new()))
        }

        ExprKind::Function { params, body } => {
            state.env.push_scope();
            let mut param_tys = Vec::with_capacity(params.len());
            for p in params {
                let pty = state.fresh_var();
                state.env.define(*p, Scheme::monomorphic(pty.clone()));
                param_tys.push(pty);
            }
            let (body_ty, body_effects) = infer_expr(state, body, base)?;
            state.env.pop_scope();

            let mut result = body_ty;
            for pty in param_tys.into_iter().rev() {
                result = Type::Function {
                    params: vec![pty],
                    ret: Box::new(result),
                    effects: body_effects.clone(),
                    constraints: Vec::new(),
                };
            }
            Ok((result, EffectSet::new()))
        }

        ExprKind::Application { func, args } => apply_call(state, func, args, span, base),

        ExprKind::Binary { op, lhs, rhs } => infer_binary(state, *op, lhs, rhs, span, base),

        ExprKind::If { cond, then_branch, else_branch } => {
            let (cond_ty, cond_eff) = infer_expr(state, cond, base)?;
            unify(state, &cond_ty, &Type::bool(), span)?;
            let (then_ty, then_eff) = infer_expr(state, then_branch, base)?;
            let (else_ty, else_eff) = infer_expr(state, else_branch, base)?;
            unify(state, &then_ty, &else_ty, span)?;
            Ok((then_ty, cond_eff.union(&then_eff).union(&else_eff)))
        }

        ExprKind::Definition { name, value } => {
            let self_ty = state.fresh_var();
            state.env.define(*name, Scheme::monomorphic(self_ty.clone()));
            let (value_ty, effects) = infer_expr(state, value, base)?;
            unify(state, &self_ty, &value_ty, span)?;
            let scheme = generalize(state, &self_ty);
            state.env.define(*name, scheme);
            Ok((Type::Unit, effects))
        }

        ExprKind::MutableDefinition { name, value } => {
            let (value_ty, effects) = infer_expr(state, value, base)?;
            state.env.define_mutable(*name, Scheme::monomorphic(value_ty));
            Ok((Type::Unit, effects))
        }

        ExprKind::Mutation { name, value } => {
            let binding = state.env.lookup(*name).cloned().ok_or_else(|| {
                type_err(TypeErrorKind::UndefinedVariable { name: name.to_string() }, span)
            })?;
            if !binding.mutable {
                return Err(type_err(
                    TypeErrorKind::ConstraintNotSatisfied {
                        description: format!("`{name}` was not declared with `mut` and cannot be reassigned"),
                    },
                    span,
                )
                .into());
            }
            let (value_ty, effects) = infer_expr(state, value, base)?;
            unify(state, &binding.scheme.ty, &value_ty, span)?;
            Ok((Type::Unit, with_effect(effects, Effect::State)))
        }

        ExprKind::TupleDestructuring { pattern, value } => {
            let (value_ty, effects) = infer_expr(state, value, base)?;
            bind_pattern(state, pattern, &value_ty)?;
            Ok((Type::Unit, effects))
        }

        ExprKind::RecordDestructuring { pattern, value } => {
            let (value_ty, effects) = infer_expr(state, value, base)?;
            bind_pattern(state, pattern, &value_ty)?;
            Ok((Type::Unit, effects))
        }

        ExprKind::Import { path } => {
            let module_ty = crate::module::type_import(state, base, path)?;
            Ok((module_ty, EffectSet::single(Effect::Read)))
        }

        ExprKind::Record(fields) => {
            let mut out = IndexMap::new();
            let mut effects = EffectSet::new();
            for (name, value) in fields {
                let (ty, eff) = infer_expr(state, value, base)?;
                effects = effects.union(&eff);
                out.insert(*name, ty);
            }
            Ok((Type::Record(out), effects))
        }

        ExprKind::Tuple(elements) => {
            let mut tys = Vec::with_capacity(elements.len());
            let mut effects = EffectSet::new();
            for e in elements {
                let (ty, eff) = infer_expr(state, e, base)?;
                effects = effects.union(&eff);
                tys.push(ty);
            }
            Ok((Type::Tuple(tys), effects))
        }

        ExprKind::Unit => Ok((Type::Unit, EffectSet::new())),

        ExprKind::Accessor(field) => {
            let a = state.fresh_var();
            let r = state.fresh_var();
            let r_name = var_name(&r);
            let constraint = Constraint::HasField(r_name, *field, Box::new(a.clone()));
            state.pending_constraints.entry(r_name).or_default().push(constraint);
            let fn_ty = Type::Function {
                params: vec![r],
                ret: Box::new(a),
                effects: EffectSet::new(),
                constraints: Vec::new(),
            };
            Ok((fn_ty, EffectSet::new()))
        }

        ExprKind::List(elements) => {
            if elements.is_empty() {
                return Ok((Type::List(Box::new(state.fresh_var())), EffectSet::new()));
            }
            let mut iter = elements.iter();
            let first = iter.next().unwrap();
            let (mut elem_ty, mut effects) = infer_expr(state, first, base)?;
            for e in iter {
                let (ty, eff) = infer_expr(state, e, base)?;
                unify(state, &elem_ty, &ty, span)?;
                effects = effects.union(&eff);
                elem_ty = resolve(state, &elem_ty);
            }
            Ok((Type::List(Box::new(elem_ty)), effects))
        }

        ExprKind::Where { main, definitions } => {
            state.env.push_scope();
            let mut effects = EffectSet::new();
            for def in definitions {
                let (_, eff) = infer_expr(state, def, base)?;
                effects = effects.union(&eff);
            }
            let (main_ty, main_eff) = infer_expr(state, main, base)?;
            state.env.pop_scope();
            Ok((main_ty, effects.union(&main_eff)))
        }

        ExprKind::Typed { expr: inner, ty } => {
            let (inferred, effects) = infer_expr(state, inner, base)?;
            unify(state, &inferred, ty, span)?;
            Ok((resolve(state, ty), effects))
        }

        ExprKind::Constrained { expr: inner, ty, constraint } => {
            let (inferred, effects) = infer_expr(state, inner, base)?;
            unify(state, &inferred, ty, span)?;
            let resolved = resolve(state, ty);
            match &resolved {
                Type::Variable(name, _) => {
                    state.pending_constraints.entry(*name).or_default().push(constraint.clone());
                }
                concrete => discharge(state, constraint, concrete, span)?,
            }
            Ok((resolved, effects))
        }

        ExprKind::TypeDefinition { name, type_params, constructors } => {
            state.adts.register(AdtInfo {
                name: *name,
                type_params: type_params.clone(),
                constructors: constructors.clone(),
            });
            let result_ty = Type::Variant(
                *name,
                type_params.iter().map(|p| Type::Variable(*p, Vec::new())).collect(),
            );
            for ctor in constructors {
                let mut ty = result_ty.clone();
                for param in ctor.params.iter().rev() {
                    ty = Type::Function {
                        params: vec![param.clone()],
                        ret: Box::new(ty),
                        effects: EffectSet::new(),
                        constraints: Vec::new(),
                    };
                }
                state.env.define(
                    ctor.name,
                    Scheme { vars: type_params.clone(), constraints: Vec::new(), ty },
                );
            }
            Ok((Type::Unit, EffectSet::new()))
        }

        ExprKind::Match { scrutinee, cases } => {
            let (scrutinee_ty, mut effects) = infer_expr(state, scrutinee, base)?;
            let answer = state.fresh_var();
            let mut covered: Vec<noolang_util::Symbol> = Vec::new();
            let mut has_catch_all = false;

            for case in cases {
                state.env.push_scope();
                bind_pattern(state, &case.pattern, &scrutinee_ty)?;
                let (body_ty, body_eff) = infer_expr(state, &case.body, base)?;
                state.env.pop_scope();
                unify(state, &answer, &body_ty, case.body.span)?;
                effects = effects.union(&body_eff);

                match &case.pattern.kind {
                    noolang_ast::PatternKind::Constructor(name, _) => covered.push(*name),
                    noolang_ast::PatternKind::Variable(_) | noolang_ast::PatternKind::Wildcard => {
                        has_catch_all = true;
                    }
                    _ => {}
                }
            }

            if !has_catch_all {
                check_exhaustive(state, &scrutinee_ty, &covered, span)?;
            }

            Ok((resolve(state, &answer), effects))
        }

        ExprKind::ConstraintDefinition { name, type_param, functions } => {
            let mut funcs = IndexMap::new();
            for sig in functions {
                funcs.insert(sig.name, sig.signature.clone());
                let constrained_sig = attach_constraint(&sig.signature, *type_param, *name);
                state.env.define(
                    sig.name,
                    Scheme { vars: vec![*type_param], constraints: Vec::new(), ty: constrained_sig },
                );
            }
            state.registry.define_constraint(ConstraintDef { name: *name, type_param: *type_param, functions: funcs });
            Ok((Type::Unit, EffectSet::new()))
        }

        ExprKind::ImplementDefinition { constraint_name, type_expr, given, functions } => {
            let def = state.registry.constraint(*constraint_name).cloned().ok_or_else(|| {
                type_err(TypeErrorKind::UnknownConstraint { name: constraint_name.to_string() }, span)
            })?;
            let head = head_name(type_expr).ok_or_else(|| {
                type_err(
                    TypeErrorKind::ConstraintNotSatisfied {
                        description: format!("cannot dispatch `{constraint_name}` on this type"),
                    },
                    span,
                )
            })?;

            let mut effects = EffectSet::new();
            let mut funcs = IndexMap::new();
            for function in functions {
                let declared = def.functions.get(&function.name).cloned().ok_or_else(|| {
                    type_err(
                        TypeErrorKind::ConstraintNotSatisfied {
                            description: format!(
                                "`{constraint_name}` declares no function named `{}`",
                                function.name
                            ),
                        },
                        span,
                    )
                })?;
                let expected = substitute_param(&declared, def.type_param, type_expr);

                state.env.push_scope();
                let (body_ty, body_eff) = infer_expr(state, &function.body, base)?;
                state.env.pop_scope();
                unify(state, &body_ty, &expected, function.body.span)?;
                effects = effects.union(&body_eff);
                funcs.insert(function.name, expected);
            }

            state.registry.add_implementation(Implementation {
                constraint_name: *constraint_name,
                head: type_expr.clone(),
                head_name: head,
                given: given.clone(),
                functions: funcs,
            });
            Ok((Type::Unit, effects))
        }

        ExprKind::Ffi { .. } => Ok((Type::Unknown, EffectSet::single(Effect::Ffi))),
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

fn var_name(ty: &Type) -> noolang_util::Symbol {
    match ty {
        Type::Variable(name, _) => *name,
        _ => unreachable!("fresh_var always produces Type::Variable"),
    }
}

fn with_effect(mut effects: EffectSet, e: Effect) -> EffectSet {
    effects.insert(e);
    effects
}

fn type_err(kind: TypeErrorKind, span: Span) -> TypeError {
    TypeError::at(kind, span)
}

/// Substitutes every occurrence of `param` in `ty` with `replacement` — the
/// targeted one-variable substitution an `implement` block needs to turn a
/// constraint's declared signature into the concrete type its functions
/// must match (spec.md §4.T).
fn substitute_param(ty: &Type, param: noolang_util::Symbol, replacement: &Type) -> Type {
    match ty {
        Type::Variable(name, constraints) if *name == param => {
            let mut out = replacement.clone();
            if !constraints.is_empty() {
                if let Type::Variable(_, existing) = &mut out {
                    existing.extend(constraints.iter().cloned());
                }
            }
            out
        }
        Type::Variable(_, _) => ty.clone(),
        Type::Function { params, ret, effects, constraints } => Type::Function {
            params: params.iter().map(|p| substitute_param(p, param, replacement)).collect(),
            ret: Box::new(substitute_param(ret, param, replacement)),
            effects: effects.clone(),
            constraints: constraints.clone(),
        },
        Type::List(elem) => Type::List(Box::new(substitute_param(elem, param, replacement))),
        Type::Tuple(elems) => {
            Type::Tuple(elems.iter().map(|t| substitute_param(t, param, replacement)).collect())
        }
        Type::Record(fields) => {
            let mut out = IndexMap::new();
            for (k, v) in fields {
                out.insert(*k, substitute_param(v, param, replacement));
            }
            Type::Record(out)
        }
        Type::Variant(name, args) => {
            Type::Variant(*name, args.iter().map(|t| substitute_param(t, param, replacement)).collect())
        }
        Type::Adt { name, type_params, constructors } => Type::Adt {
            name: *name,
            type_params: type_params.clone(),
            constructors: constructors
                .iter()
                .map(|c| ConstructorDef {
                    name: c.name,
                    params: c.params.iter().map(|t| substitute_param(t, param, replacement)).collect(),
                })
                .collect(),
        },
        Type::Union(tys) => {
            Type::Union(tys.iter().map(|t| substitute_param(t, param, replacement)).collect())
        }
        Type::Primitive(_) | Type::Unit | Type::Unknown => ty.clone(),
    }
}

/// Attaches `constraint implements Trait` to every free occurrence of
/// `type_param` in a constraint function's declared signature, so looking
/// the function up from the environment carries its trait obligation.
fn attach_constraint(ty: &Type, type_param: noolang_util::Symbol, trait_name: noolang_util::Symbol) -> Type {
    match ty {
        Type::Variable(name, constraints) if *name == type_param => {
            let mut constraints = constraints.clone();
            constraints.push(Constraint::Implements(type_param, trait_name));
            Type::Variable(*name, constraints)
        }
        Type::Variable(_, _) => ty.clone(),
        Type::Function { params, ret, effects, constraints } => Type::Function {
            params: params.iter().map(|p| attach_constraint(p, type_param, trait_name)).collect(),
            ret: Box::new(attach_constraint(ret, type_param, trait_name)),
            effects: effects.clone(),
            constraints: constraints.clone(),
        },
        Type::List(elem) => Type::List(Box::new(attach_constraint(elem, type_param, trait_name))),
        Type::Tuple(elems) => {
            Type::Tuple(elems.iter().map(|t| attach_constraint(t, type_param, trait_name)).collect())
        }
        Type::Record(fields) => {
            let mut out = IndexMap::new();
            for (k, v) in fields {
                out.insert(*k, attach_constraint(v, type_param, trait_name));
            }
            Type::Record(out)
        }
        Type::Variant(name, args) => {
            Type::Variant(*name, args.iter().map(|t| attach_constraint(t, type_param, trait_name)).collect())
        }
        other => other.clone(),
    }
}

/// Checks that every constructor of the ADT `scrutinee_ty` resolves to has
/// a covering pattern, erroring hard if not (spec.md §9's open-question
/// resolution: non-exhaustive matches are a type error, not a warning).
/// Scrutinees that don't resolve to a known ADT (record/tuple/list
/// matches, or a still-unbound variable) are accepted without a check —
/// only constructor matches are checked for coverage.
fn check_exhaustive(
    state: &TypeState,
    scrutinee_ty: &Type,
    covered: &[noolang_util::Symbol],
    span: Span,
) -> Result<(), NoolangError> {
    let resolved = resolve(state, scrutinee_ty);
    let adt_name = match &resolved {
        Type::Variant(name, _) => *name,
        _ => return Ok(()),
    };
    let Some(info) = state.adts.adts.get(&adt_name) else {
        return Ok(());
    };
    let missing: Vec<String> = info
        .constructors
        .iter()
        .filter(|c| !covered.contains(&c.name))
        .map(|c| c.name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(type_err(TypeErrorKind::NonExhaustiveMatch { missing }, span).into())
    }
}

fn infer_binary(
    state: &mut TypeState,
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    span: Span,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    match op {
        BinaryOp::Sequence => {
            let (_, lhs_eff) = infer_expr(state, lhs, base)?;
            let (rhs_ty, rhs_eff) = infer_expr(state, rhs, base)?;
            Ok((rhs_ty, lhs_eff.union(&rhs_eff)))
        }

        // `f $ x` is sugar for `f x`: the left side is the callable, the
        // right side a single argument expression.
        BinaryOp::Apply => apply_call(state, lhs, std::slice::from_ref(rhs), span, base),

        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            let (lhs_ty, lhs_eff) = infer_expr(state, lhs, base)?;
            let (rhs_ty, rhs_eff) = infer_expr(state, rhs, base)?;
            unify(state, &lhs_ty, &Type::float(), span)?;
            unify(state, &rhs_ty, &Type::float(), span)?;
            Ok((Type::float(), lhs_eff.union(&rhs_eff)))
        }

        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
            let (lhs_ty, lhs_eff) = infer_expr(state, lhs, base)?;
            let (rhs_ty, rhs_eff) = infer_expr(state, rhs, base)?;
            unify(state, &lhs_ty, &rhs_ty, span)?;
            Ok((Type::bool(), lhs_eff.union(&rhs_eff)))
        }

        BinaryOp::Pipe | BinaryOp::PipeForward => {
            let (lhs_ty, lhs_eff) = infer_expr(state, lhs, base)?;
            apply_inferred(state, rhs, lhs_ty, lhs_eff, span, base)
        }

        BinaryOp::PipeBackward => {
            let (rhs_ty, rhs_eff) = infer_expr(state, rhs, base)?;
            apply_inferred(state, lhs, rhs_ty, rhs_eff, span, base)
        }

        BinaryOp::PipeOption => {
            let (lhs_ty, lhs_eff) = infer_expr(state, lhs, base)?;
            let (rhs_ty, rhs_eff) = infer_expr(state, rhs, base)?;

            let a = state.fresh_var();
            let b = state.fresh_var();
            let option_name = noolang_util::Symbol::intern("Option");
            unify(state, &lhs_ty, &Type::Variant(option_name, vec![a.clone()]), span)?;

            let expected_fn = Type::Function {
                params: vec![a],
                ret: Box::new(Type::Variant(option_name, vec![b.clone()])),
                effects: EffectSet::new(),
                constraints: Vec::new(),
            };
            let mut effects = lhs_eff.union(&rhs_eff);
            if let Type::Function { effects: declared, .. } = resolve(state, &rhs_ty) {
                effects = effects.union(&declared);
            }
            unify(state, &rhs_ty, &expected_fn, span)?;
            Ok((Type::Variant(option_name, vec![resolve(state, &b)]), effects))
        }
    }
}

/// Applies an already-inferred callee value to a single argument expression
/// (used by the pipe operators, which evaluate their function operand
/// separately from the value they feed it).
fn apply_inferred(
    state: &mut TypeState,
    callee: &Expr,
    arg_ty: Type,
    mut effects: EffectSet,
    span: Span,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let (fn_ty, fn_eff) = infer_expr(state, callee, base)?;
    effects = effects.union(&fn_eff);
    if let Type::Function { effects: declared, .. } = resolve(state, &fn_ty) {
        effects = effects.union(&declared);
    }
    let ret = state.fresh_var();
    let expected = Type::Function {
        params: vec![arg_ty],
        ret: Box::new(ret.clone()),
        effects: EffectSet::new(),
        constraints: Vec::new(),
    };
    unify(state, &fn_ty, &expected, span)?;
    Ok((resolve(state, &ret), effects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TypeState;

    fn check(source: &str) -> Result<(Type, EffectSet), NoolangError> {
        let program = noolang_par::parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let mut state = TypeState::new();
        crate::check_program(&mut state, &program, None)
    }

    #[test]
    fn arithmetic_has_no_effects_and_is_a_float() {
        let (ty, effects) = check("1 + 2 * 3").unwrap();
        assert_eq!(ty.to_string(), "Float");
        assert!(effects.is_empty());
    }

    #[test]
    fn curried_functions_type_check_through_application() {
        let (ty, _) = check("add = fn x y => x + y; add 2 3").unwrap();
        assert_eq!(ty.to_string(), "Float");
    }

    #[test]
    fn map_over_a_list_literal_preserves_element_type() {
        let (ty, _) = check("[1, 2, 3] | map (fn x => x * 2)").unwrap();
        assert_eq!(ty.to_string(), "List Float");
    }

    #[test]
    fn recursive_function_definitions_type_check() {
        let (ty, _) =
            check("factorial = fn n => if n == 0 then 1 else n * factorial (n - 1); factorial 5").unwrap();
        assert_eq!(ty.to_string(), "Float");
    }

    #[test]
    fn if_branches_must_unify() {
        let err = check("if True then 1 else \"no\"").unwrap_err();
        assert!(matches!(err, NoolangError::Type(_)));
    }

    #[test]
    fn undefined_variable_is_a_type_error_not_a_panic() {
        let err = check("thisNameDoesNotExist").unwrap_err();
        match err {
            NoolangError::Type(e) => assert!(matches!(e.kind, TypeErrorKind::UndefinedVariable { .. })),
            other => panic!("expected a TypeError, got {other:?}"),
        }
    }

    #[test]
    fn non_exhaustive_match_over_an_adt_is_a_hard_error() {
        let err = check(
            "type Color = Red | Green | Blue; match Red with ( Red => 1; Green => 2 )",
        )
        .unwrap_err();
        match err {
            NoolangError::Type(e) => {
                assert!(matches!(e.kind, TypeErrorKind::NonExhaustiveMatch { .. }))
            }
            other => panic!("expected a TypeError, got {other:?}"),
        }
    }

    #[test]
    fn exhaustive_match_over_an_adt_type_checks() {
        let (ty, _) = check(
            "type Color = Red | Green | Blue; match Red with ( Red => 1; Green => 2; Blue => 3 )",
        )
        .unwrap();
        assert_eq!(ty.to_string(), "Float");
    }

    #[test]
    fn a_catch_all_pattern_makes_a_match_exhaustive_even_with_no_constructors_covered() {
        let (ty, _) =
            check("type Color = Red | Green | Blue; match Red with ( _ => 0 )").unwrap();
        assert_eq!(ty.to_string(), "Float");
    }

    #[test]
    fn applying_a_function_to_too_many_arguments_is_a_type_error() {
        let err = check("f = fn x => x; f 1 2").unwrap_err();
        assert!(matches!(err, NoolangError::Type(_)));
    }

    #[test]
    fn generalized_bindings_can_be_instantiated_at_different_types() {
        // `identity` is let-polymorphic: using it at `Float` and then at
        // `Bool` in the same program must not make the two uses conflict
        // (spec.md §8's "generalization is sound" testable property).
        let (ty, _) = check(
            "identity = fn x => x; a = identity 1; b = identity True; b",
        )
        .unwrap();
        assert_eq!(ty.to_string(), "Bool");
    }

    #[test]
    fn print_has_the_write_effect() {
        let (_, effects) = check("print 42").unwrap();
        assert!(effects.contains(Effect::Write) || effects.contains(Effect::Log));
    }
}

fn apply_call(
    state: &mut TypeState,
    func: &Expr,
    args: &[Expr],
    span: Span,
    base: Option<&Path>,
) -> Result<(Type, EffectSet), NoolangError> {
    let (mut fn_ty, mut effects) = infer_expr(state, func, base)?;
    for arg in args {
        let (arg_ty, arg_eff) = infer_expr(state, arg, base)?;
        effects = effects.union(&arg_eff);
        if let Type::Function { effects: declared, .. } = resolve(state, &fn_ty) {
            effects = effects.union(&declared);
        }
        let ret = state.fresh_var();
        let expected = Type::Function {
            params: vec![arg_ty],
            ret: Box::new(ret.clone()),
            effects: EffectSet::new(),
            constraints: Vec::new(),
        };
        unify(state, &fn_ty, &expected, span)?;
        fn_ty = ret;
    }
    Ok((fn_ty, effects))
}
