//! The tree-walking evaluator proper (spec.md §4.E): a single
//! `eval_expr` recursion over the decorated AST, threading a mutable
//! `Evaluator` (environment, runtime trait registry, module cache, RNG
//! state) the way `noolang-sem::infer` threads a `TypeState` — generalized
//! from `faxc-runtime`'s GC/allocation shims (no counterpart once codegen
//! is dropped, see DESIGN.md) into the value-level half of the pipeline.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use noolang_ast::{BinaryOp, Expr, ExprKind, Literal, Program};
use noolang_util::{NoolangError, RuntimeError, Symbol};

use crate::builtins;
use crate::env::Env;
use crate::pattern::try_match;
use crate::registry::{RuntimeImplementation, RuntimeTraitRegistry};
use crate::trace::TraceEntry;
use crate::value::{Closure, ConstructorFn, Native, TraitFunction, Value};

/// The evaluator's threaded state. `env` is the environment active for the
/// expression currently being evaluated (swapped out and restored around
/// closure calls, `where` blocks, and `match` arms — see `apply`/`eval_kind`);
/// `module_cache`/`loading`/`base` back the module loader (spec.md §4.M).
pub struct Evaluator {
    pub env: Env,
    pub registry: RuntimeTraitRegistry,
    pub(crate) module_cache: HashMap<PathBuf, Value>,
    pub(crate) loading: Vec<PathBuf>,
    pub(crate) base: Option<PathBuf>,
    rng: u64,
}

/// A point-in-time copy of everything in [`Evaluator`] that isn't the
/// shared environment cell itself (see [`Evaluator::snapshot`]).
pub struct EvaluatorSnapshot {
    env_vars: rustc_hash::FxHashMap<Symbol, crate::value::Value>,
    registry: RuntimeTraitRegistry,
    module_cache: HashMap<PathBuf, crate::value::Value>,
    loading: Vec<PathBuf>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        let env = Env::root();
        builtins::install(&env);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e3779b97f4a7c15)
            | 1;
        Evaluator {
            env,
            registry: RuntimeTraitRegistry::default(),
            module_cache: HashMap::new(),
            loading: Vec::new(),
            base: None,
            rng: seed,
        }
    }

    /// Captures everything the REPL needs to roll back a failed input
    /// (spec.md §7: "the state is snapshotted before each input and
    /// restored on failure", extended from the type state to the value
    /// side). `env`'s own bindings are captured through [`Env::snapshot`]
    /// rather than cloned wholesale, since the environment is an `Rc`-shared
    /// cell, not owned data.
    pub fn snapshot(&self) -> EvaluatorSnapshot {
        EvaluatorSnapshot {
            env_vars: self.env.snapshot(),
            registry: self.registry.clone(),
            module_cache: self.module_cache.clone(),
            loading: self.loading.clone(),
        }
    }

    /// Restores a snapshot taken by [`Evaluator::snapshot`].
    pub fn restore(&mut self, snapshot: EvaluatorSnapshot) {
        self.env.restore(snapshot.env_vars);
        self.registry = snapshot.registry;
        self.module_cache = snapshot.module_cache;
        self.loading = snapshot.loading;
    }

    /// The next pseudo-random value in `[0, 1)`, backing `random`/
    /// `randomRange` (spec.md §4.T's `rand` effect). A small xorshift64
    /// generator seeded once from the system clock — the workspace's
    /// dependency table carries no RNG crate (see DESIGN.md).
    pub fn next_random(&mut self) -> f64 {
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 7;
        self.rng ^= self.rng << 17;
        (self.rng >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Evaluates every statement of `program` in sequence, threading
    /// `self.env` across them so later statements see earlier definitions
    /// (spec.md §4.E). Returns the last statement's value and the
    /// execution trace the REPL prints when it has more than one entry.
    pub fn eval_program(
        &mut self,
        program: &Program,
        base: Option<&Path>,
    ) -> Result<(Value, Vec<TraceEntry>), NoolangError> {
        self.base = base.map(Path::to_path_buf);
        let mut last = Value::Unit;
        let mut trace = Vec::with_capacity(program.statements.len());
        for stmt in &program.statements {
            let value = self.eval_expr(stmt)?;
            trace.push(TraceEntry { source: String::new(), result: value.clone(), span: stmt.span });
            last = value;
        }
        Ok((last, trace))
    }

    /// Evaluates a single standalone expression against the persisted
    /// environment — the REPL's per-input entry point (spec.md §6).
    pub fn eval_single(&mut self, expr: &Expr, base: Option<&Path>) -> Result<Value, NoolangError> {
        self.base = base.map(Path::to_path_buf);
        self.eval_expr(expr)
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, NoolangError> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_value(lit)),

            ExprKind::Variable(name) => self.env.lookup(*name).ok_or_else(|| {
                NoolangError::Runtime(RuntimeError::new(format!("undefined variable: {name}")))
            }),

            ExprKind::Function { params, body } => Ok(Value::Closure(Rc::new(Closure {
                params: params.clone(),
                body: (**body).clone(),
                env: self.env.clone(),
            }))),

            ExprKind::Application { func, args } => {
                let mut result = self.eval_expr(func)?;
                for arg in args {
                    let arg_val = self.eval_expr(arg)?;
                    result = self.apply(result, arg_val).map_err(NoolangError::Runtime)?;
                }
                Ok(result)
            }

            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),

            ExprKind::If { cond, then_branch, else_branch } => {
                let cond_val = self.eval_expr(cond)?;
                match cond_val.as_bool() {
                    Some(true) => self.eval_expr(then_branch),
                    Some(false) => self.eval_expr(else_branch),
                    // Defensive only: the typer guarantees a Bool condition
                    // (spec.md §4.E: "any other value is a runtime error").
                    None => Err(NoolangError::Runtime(RuntimeError::new(format!(
                        "if-condition did not evaluate to a boolean: {cond_val}"
                    )))),
                }
            }

            ExprKind::Definition { name, value } => {
                let v = self.eval_expr(value)?;
                self.env.define(*name, v);
                Ok(Value::Unit)
            }

            ExprKind::MutableDefinition { name, value } => {
                let v = self.eval_expr(value)?;
                self.env.define(*name, Value::Cell(Rc::new(std::cell::RefCell::new(v))));
                Ok(Value::Unit)
            }

            ExprKind::Mutation { name, value } => {
                let v = self.eval_expr(value)?;
                match self.env.lookup_raw(*name) {
                    Some(Value::Cell(cell)) => {
                        *cell.borrow_mut() = v;
                        Ok(Value::Unit)
                    }
                    Some(_) => Err(NoolangError::Runtime(RuntimeError::new(format!(
                        "`{name}` was not declared with `mut` and cannot be reassigned"
                    )))),
                    None => Err(NoolangError::Runtime(RuntimeError::new(format!(
                        "undefined variable: {name}"
                    )))),
                }
            }

            ExprKind::TupleDestructuring { pattern, value } | ExprKind::RecordDestructuring { pattern, value } => {
                let v = self.eval_expr(value)?;
                if try_match(pattern, &v, &self.env) {
                    Ok(Value::Unit)
                } else {
                    Err(NoolangError::Runtime(RuntimeError::new("No pattern matched")))
                }
            }

            ExprKind::Import { path } => crate::module::eval_import(self, path),

            ExprKind::Record(fields) => {
                let mut out = IndexMap::new();
                for (name, value) in fields {
                    out.insert(*name, self.eval_expr(value)?);
                }
                Ok(Value::Record(out))
            }

            ExprKind::Tuple(elements) => {
                let mut out = Vec::with_capacity(elements.len());
                for e in elements {
                    out.push(self.eval_expr(e)?);
                }
                Ok(Value::Tuple(out))
            }

            ExprKind::Unit => Ok(Value::Unit),

            ExprKind::Accessor(field) => Ok(Value::Accessor(*field)),

            ExprKind::List(elements) => {
                let mut out = Vec::with_capacity(elements.len());
                for e in elements {
                    out.push(self.eval_expr(e)?);
                }
                Ok(Value::List(out))
            }

            ExprKind::Where { main, definitions } => {
                let saved = std::mem::replace(&mut self.env, self.env.child());
                let result = (|| -> Result<Value, NoolangError> {
                    for def in definitions {
                        self.eval_expr(def)?;
                    }
                    self.eval_expr(main)
                })();
                self.env = saved;
                result
            }

            ExprKind::Typed { expr: inner, .. } => self.eval_expr(inner),

            ExprKind::Constrained { expr: inner, .. } => self.eval_expr(inner),

            ExprKind::TypeDefinition { constructors, .. } => {
                for ctor in constructors {
                    if ctor.params.is_empty() {
                        self.env.define(ctor.name, Value::Constructor { name: ctor.name, args: Vec::new() });
                    } else {
                        self.env.define(
                            ctor.name,
                            Value::ConstructorFn(Rc::new(ConstructorFn {
                                name: ctor.name,
                                arity: ctor.params.len(),
                                collected: Vec::new(),
                            })),
                        );
                    }
                }
                Ok(Value::Unit)
            }

            ExprKind::Match { scrutinee, cases } => {
                let value = self.eval_expr(scrutinee)?;
                for case in cases {
                    let candidate = self.env.child();
                    if try_match(&case.pattern, &value, &candidate) {
                        let saved = std::mem::replace(&mut self.env, candidate);
                        let result = self.eval_expr(&case.body);
                        self.env = saved;
                        return result;
                    }
                }
                Err(NoolangError::Runtime(RuntimeError::new("No pattern matched")))
            }

            ExprKind::ConstraintDefinition { name, functions, .. } => {
                for sig in functions {
                    let arity = type_arity(&sig.signature).max(1);
                    self.registry.set_arity(*name, sig.name, arity);
                    self.env.define(
                        sig.name,
                        Value::TraitFunction(Rc::new(TraitFunction {
                            constraint_name: *name,
                            function_name: sig.name,
                            arity,
                            collected: Vec::new(),
                        })),
                    );
                }
                Ok(Value::Unit)
            }

            ExprKind::ImplementDefinition { constraint_name, type_expr, functions, .. } => {
                let head = noolang_sem::head_name(type_expr).ok_or_else(|| {
                    NoolangError::Runtime(RuntimeError::new(format!(
                        "cannot dispatch `{constraint_name}` on this type"
                    )))
                })?;
                let mut funcs = IndexMap::new();
                for function in functions {
                    let body = self.eval_expr(&function.body)?;
                    funcs.insert(function.name, body);
                }
                self.registry.add_implementation(*constraint_name, RuntimeImplementation { head_name: head, functions: funcs });
                Ok(Value::Unit)
            }

            ExprKind::Ffi { module, name } => Err(NoolangError::Runtime(RuntimeError::new(format!(
                "no FFI binding for `{module}.{name}` (the language core has no FFI surface — spec.md §1)"
            )))),
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Value, NoolangError> {
        match op {
            BinaryOp::Sequence => {
                self.eval_expr(lhs)?;
                self.eval_expr(rhs)
            }

            // `f $ x` — sugar for `f x` (spec.md §4.T).
            BinaryOp::Apply => {
                let f = self.eval_expr(lhs)?;
                let x = self.eval_expr(rhs)?;
                self.apply(f, x).map_err(NoolangError::Runtime)
            }

            // `x | f` / `x |> f` — apply the right callable to the left value.
            BinaryOp::Pipe | BinaryOp::PipeForward => {
                let x = self.eval_expr(lhs)?;
                let f = self.eval_expr(rhs)?;
                self.apply(f, x).map_err(NoolangError::Runtime)
            }

            // `f <| x` — apply the left callable to the right value.
            BinaryOp::PipeBackward => {
                let f = self.eval_expr(lhs)?;
                let x = self.eval_expr(rhs)?;
                self.apply(f, x).map_err(NoolangError::Runtime)
            }

            // Monadic bind over `Option` (spec.md §4.E): `Some x |? f` = `f
            // x` (not wrapped again); `None |? f` = `None`; a non-Option
            // left is wrapped in `Some` then bound, which is the same as
            // calling `f` directly on it.
            BinaryOp::PipeOption => {
                let x = self.eval_expr(lhs)?;
                let f = self.eval_expr(rhs)?;
                match &x {
                    Value::Constructor { name, args } if name.as_str() == "Some" && args.len() == 1 => {
                        self.apply(f, args[0].clone()).map_err(NoolangError::Runtime)
                    }
                    Value::Constructor { name, args } if name.as_str() == "None" && args.is_empty() => Ok(x),
                    other => self.apply(f, other.clone()).map_err(NoolangError::Runtime),
                }
            }

            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::Le
            | BinaryOp::Ge => {
                let a = self.eval_expr(lhs)?;
                let b = self.eval_expr(rhs)?;
                let operator = self.env.lookup(Symbol::intern(op.symbol())).ok_or_else(|| {
                    NoolangError::Runtime(RuntimeError::new(format!("operator `{}` is not bound", op.symbol())))
                })?;
                let partial = self.apply(operator, a).map_err(NoolangError::Runtime)?;
                self.apply(partial, b).map_err(NoolangError::Runtime)
            }
        }
    }

    /// Applies `func` to a single argument value, curry-collecting one
    /// argument at a time for closures, natives, constructors, and trait
    /// functions alike (spec.md §4.E: "applying them curries identically").
    pub fn apply(&mut self, func: Value, arg: Value) -> Result<Value, RuntimeError> {
        match func.deref_cell() {
            Value::Closure(closure) => {
                let call_env = closure.env.child();
                call_env.define(closure.params[0], arg);
                if closure.params.len() == 1 {
                    let saved = std::mem::replace(&mut self.env, call_env);
                    let result = self.eval_expr(&closure.body).map_err(to_runtime);
                    self.env = saved;
                    result
                } else {
                    Ok(Value::Closure(Rc::new(Closure {
                        params: closure.params[1..].to_vec(),
                        body: closure.body.clone(),
                        env: call_env,
                    })))
                }
            }

            Value::Native(native) => {
                let mut collected = native.collected.clone();
                collected.push(arg);
                if collected.len() == native.arity {
                    (native.func)(&collected, self)
                } else {
                    Ok(Value::Native(Rc::new(Native {
                        name: native.name,
                        arity: native.arity,
                        collected,
                        func: native.func.clone(),
                    })))
                }
            }

            Value::ConstructorFn(ctor) => {
                let mut collected = ctor.collected.clone();
                collected.push(arg);
                if collected.len() == ctor.arity {
                    Ok(Value::Constructor { name: ctor.name, args: collected })
                } else {
                    Ok(Value::ConstructorFn(Rc::new(ConstructorFn {
                        name: ctor.name,
                        arity: ctor.arity,
                        collected,
                    })))
                }
            }

            // Dispatch on the first applied argument's head (spec.md §9:
            // dispatch-argument position is left to the implementer; this
            // repo fixes it at the first argument, matching `value.rs`'s
            // documented convention). The registry hands back the
            // implementation's own value (a closure or native), which then
            // takes over currying for any remaining arguments normally.
            Value::TraitFunction(tf) => {
                let head = arg.head_name().ok_or_else(|| {
                    RuntimeError::new(format!(
                        "cannot determine a concrete type for trait dispatch of `{}`",
                        tf.function_name
                    ))
                })?;
                let body = self.registry.function_for(tf.constraint_name, head, tf.function_name).ok_or_else(|| {
                    RuntimeError::new(format!(
                        "no matching trait implementation for `{}` on `{head}`",
                        tf.function_name
                    ))
                })?;
                self.apply(body, arg)
            }

            Value::Accessor(field) => match arg.deref_cell() {
                Value::Record(fields) => fields
                    .get(&field)
                    .cloned()
                    .ok_or_else(|| RuntimeError::new(format!("Field '{field}' not found"))),
                other => Err(RuntimeError::new(format!("`{other}` is not a record with field `{field}`"))),
            },

            other => Err(RuntimeError::new(format!("{other} is not callable"))),
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Bool(b) => Value::bool(*b),
        Literal::Unit => Value::Unit,
    }
}

/// The number of curried single-argument layers in a function type —
/// used to determine how many arguments a trait function must collect
/// before dispatch is possible in principle (spec.md §4.T: "an n-ary
/// constructor is a curried function" applies equally to constraint
/// function signatures).
fn type_arity(ty: &noolang_ast::Type) -> usize {
    match ty {
        noolang_ast::Type::Function { params, ret, .. } => params.len() + type_arity(ret),
        _ => 0,
    }
}

/// Defensive-only conversion (spec.md §7: "Runtime type assertions ...
/// indicate a typer bug, not user error"): a `TypeError`/`ImportError`
/// surfacing mid-evaluation of an already type-checked program is folded
/// into a `RuntimeError` rather than threading a second error type through
/// every call in the tree-walker.
fn to_runtime(err: NoolangError) -> RuntimeError {
    match err {
        NoolangError::Runtime(e) => e,
        other => RuntimeError::new(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noolang_sem::TypeState;

    fn run(source: &str) -> Value {
        let program = noolang_par::parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let mut state = TypeState::new();
        noolang_sem::check_program(&mut state, &program, None)
            .unwrap_or_else(|e| panic!("typecheck failed: {e}"));
        let mut evaluator = Evaluator::new();
        let (value, _trace) = evaluator.eval_program(&program, None).unwrap();
        value
    }

    fn run_err(source: &str) -> NoolangError {
        let program = noolang_par::parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let mut state = TypeState::new();
        noolang_sem::check_program(&mut state, &program, None)
            .unwrap_or_else(|e| panic!("typecheck failed: {e}"));
        let mut evaluator = Evaluator::new();
        evaluator.eval_program(&program, None).unwrap_err()
    }

    #[test]
    fn arithmetic_evaluates_with_precedence() {
        assert_eq!(run("1 + 2 * 3").to_string(), "7");
    }

    #[test]
    fn mapping_over_a_list_doubles_each_element() {
        assert_eq!(run("[1, 2, 3] | map (fn x => x * 2)").to_string(), "[2, 4, 6]");
    }

    #[test]
    fn optional_bind_threads_through_some() {
        assert_eq!(run("Some 5 |? (fn x => Some (x * 2))").to_string(), "Some 10");
    }

    #[test]
    fn optional_bind_short_circuits_on_none() {
        assert_eq!(run("None |? (fn x => Some (x * 2))").to_string(), "None");
    }

    #[test]
    fn print_returns_its_argument() {
        assert_eq!(run("print 42").to_string(), "42");
    }

    #[test]
    fn set_on_a_record_does_not_mutate_the_original() {
        assert_eq!(
            run("user = { @name \"Alice\", @age 30 }; set @age user 31 |> @age").to_string(),
            "31"
        );
        assert_eq!(
            run("user = { @name \"Alice\", @age 30 }; set @age user 31; user |> @age").to_string(),
            "30"
        );
    }

    #[test]
    fn matching_an_adt_constructor_selects_the_matching_arm() {
        assert_eq!(
            run("type Color = Red | Green | Blue; match Red with ( Red => 1; Green => 2; Blue => 3 )")
                .to_string(),
            "1"
        );
    }

    #[test]
    fn head_of_an_empty_list_is_none() {
        assert_eq!(run("head []").to_string(), "None");
    }

    #[test]
    fn head_of_a_nonempty_list_is_some_of_the_first_element() {
        assert_eq!(run("head [1, 2, 3]").to_string(), "Some 1");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let err = run_err("1 / 0");
        match err {
            NoolangError::Runtime(e) => assert!(e.to_string().contains("Division by zero")),
            other => panic!("expected a RuntimeError, got {other:?}"),
        }
    }

    #[test]
    fn mutation_through_mut_bang_is_visible_after_the_write() {
        assert_eq!(run("mut x = 1; mut! x = 2; x").to_string(), "2");
    }

    #[test]
    fn identity_applied_to_a_value_returns_that_value() {
        assert_eq!(run("(fn x => x) 5").to_string(), "5");
        assert_eq!(run("(fn x => x) \"hi\"").to_string(), "\"hi\"");
    }
}
