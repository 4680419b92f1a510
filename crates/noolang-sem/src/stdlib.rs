//! Installs the built-in operators, functions, and the `Option` ADT that
//! every Noolang program starts with. The real standard-library source is
//! out of scope for the core (spec.md §1) — this only covers the names
//! the evaluator's built-ins (spec.md §4.E) and the binary-operator
//! desugaring (spec.md §4.T) need bound in the initial type environment.

use noolang_ast::{ConstructorDef, Effect, EffectSet, Scheme, Type};
use noolang_util::Symbol;

use crate::state::{AdtInfo, TypeState};

fn func(params: Vec<Type>, ret: Type, effects: &[Effect]) -> Type {
    Type::Function { params, ret: Box::new(ret), effects: effects.iter().copied().collect(), constraints: Vec::new() }
}

fn var(state: &mut TypeState) -> Type {
    state.fresh_var()
}

pub fn install(state: &mut TypeState) {
    install_option(state);

    let a = var(state);
    state.env.define(
        Symbol::intern("print"),
        Scheme { vars: scheme_vars(&a), constraints: Vec::new(), ty: func(vec![a.clone()], a, &[Effect::Write]) },
    );

    let a = var(state);
    state.env.define(
        Symbol::intern("println"),
        Scheme { vars: scheme_vars(&a), constraints: Vec::new(), ty: func(vec![a], Type::Unit, &[Effect::Write]) },
    );

    let a = var(state);
    state.env.define(
        Symbol::intern("log"),
        Scheme { vars: scheme_vars(&a), constraints: Vec::new(), ty: func(vec![a], Type::Unit, &[Effect::Log]) },
    );

    state.env.define(
        Symbol::intern("readFile"),
        Scheme::monomorphic(func(vec![Type::string()], Type::string(), &[Effect::Read])),
    );

    state.env.define(
        Symbol::intern("writeFile"),
        Scheme::monomorphic(func(
            vec![Type::string()],
            func(vec![Type::string()], Type::Unit, &[Effect::Write]),
            &[],
        )),
    );

    state.env.define(
        Symbol::intern("random"),
        Scheme::monomorphic(func(vec![Type::Unit], Type::float(), &[Effect::Rand])),
    );

    state.env.define(
        Symbol::intern("randomRange"),
        Scheme::monomorphic(func(
            vec![Type::float()],
            func(vec![Type::float()], Type::float(), &[Effect::Rand]),
            &[],
        )),
    );

    let a = var(state);
    let option_a = Type::Variant(Symbol::intern("Option"), vec![a.clone()]);
    state.env.define(
        Symbol::intern("head"),
        Scheme {
            vars: scheme_vars(&a),
            constraints: Vec::new(),
            ty: func(vec![Type::List(Box::new(a))], option_a, &[]),
        },
    );

    let a = var(state);
    state.env.define(
        Symbol::intern("tail"),
        Scheme {
            vars: scheme_vars(&a),
            constraints: Vec::new(),
            ty: func(vec![Type::List(Box::new(a.clone()))], Type::List(Box::new(a)), &[]),
        },
    );

    let a = var(state);
    let b = var(state);
    let mapper = func(vec![a.clone()], b.clone(), &[]);
    let mut vars = scheme_vars(&a);
    vars.extend(scheme_vars(&b));
    state.env.define(
        Symbol::intern("map"),
        Scheme {
            vars,
            constraints: Vec::new(),
            ty: func(
                vec![mapper],
                func(vec![Type::List(Box::new(a))], Type::List(Box::new(b)), &[]),
                &[],
            ),
        },
    );

    let a = var(state);
    let pred = func(vec![a.clone()], Type::bool(), &[]);
    state.env.define(
        Symbol::intern("filter"),
        Scheme {
            vars: scheme_vars(&a),
            constraints: Vec::new(),
            ty: func(
                vec![pred],
                func(vec![Type::List(Box::new(a.clone()))], Type::List(Box::new(a)), &[]),
                &[],
            ),
        },
    );

    let a = var(state);
    let b = var(state);
    let folder = func(vec![b.clone()], func(vec![a.clone()], b.clone(), &[]), &[]);
    let mut vars = scheme_vars(&a);
    vars.extend(scheme_vars(&b));
    state.env.define(
        Symbol::intern("reduce"),
        Scheme {
            vars,
            constraints: Vec::new(),
            ty: func(
                vec![folder],
                func(vec![b.clone()], func(vec![Type::List(Box::new(a))], b, &[]), &[]),
                &[],
            ),
        },
    );

    // `set @field record value` reuses the accessor's own function type
    // `r -> b` as its first parameter, so the same row variable `r` ties
    // the record argument and the result together (spec.md seed scenario
    // 8: `set @age user 31 |> @age` = `31`, and `user` unchanged).
    let r = var(state);
    let b = var(state);
    let accessor_fn = func(vec![r.clone()], b.clone(), &[]);
    let mut vars = scheme_vars(&r);
    vars.extend(scheme_vars(&b));
    state.env.define(
        Symbol::intern("set"),
        Scheme {
            vars,
            constraints: Vec::new(),
            ty: func(vec![accessor_fn], func(vec![r.clone()], func(vec![b], r, &[]), &[]), &[]),
        },
    );

    let a = var(state);
    state.env.define(
        Symbol::intern("length"),
        Scheme {
            vars: scheme_vars(&a),
            constraints: Vec::new(),
            ty: func(vec![Type::List(Box::new(a))], Type::float(), &[]),
        },
    );
}

fn install_option(state: &mut TypeState) {
    let a = Symbol::intern("a");
    let option_name = Symbol::intern("Option");
    let constructors = vec![
        ConstructorDef { name: Symbol::intern("Some"), params: vec![Type::Variable(a, Vec::new())] },
        ConstructorDef { name: Symbol::intern("None"), params: Vec::new() },
    ];
    state.adts.register(AdtInfo { name: option_name, type_params: vec![a], constructors: constructors.clone() });

    let fresh = state.fresh_var();
    let fresh_name = match &fresh {
        Type::Variable(name, _) => *name,
        _ => unreachable!(),
    };
    state.env.define(
        Symbol::intern("Some"),
        Scheme {
            vars: vec![fresh_name],
            constraints: Vec::new(),
            ty: Type::Function {
                params: vec![Type::Variable(fresh_name, Vec::new())],
                ret: Box::new(Type::Variant(option_name, vec![Type::Variable(fresh_name, Vec::new())])),
                effects: EffectSet::new(),
                constraints: Vec::new(),
            },
        },
    );

    let fresh2 = state.fresh_var();
    let fresh2_name = match &fresh2 {
        Type::Variable(name, _) => *name,
        _ => unreachable!(),
    };
    state.env.define(
        Symbol::intern("None"),
        Scheme {
            vars: vec![fresh2_name],
            constraints: Vec::new(),
            ty: Type::Variant(option_name, vec![Type::Variable(fresh2_name, Vec::new())]),
        },
    );
}

fn scheme_vars(ty: &Type) -> Vec<Symbol> {
    match ty {
        Type::Variable(name, _) => vec![*name],
        _ => Vec::new(),
    }
}
