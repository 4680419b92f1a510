//! Runtime values (spec.md §4.E). Booleans have no dedicated variant —
//! `True`/`False` are nullary constructors, matching the typer's view of
//! `Bool` as an ordinary ADT head at the value level — so `Constructor` is
//! also how the evaluator represents every ADT value, including `Option`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use noolang_ast::Expr;
use noolang_util::Symbol;

use crate::env::Env;

pub type NativeFunc = Rc<dyn Fn(&[Value], &mut crate::Evaluator) -> Result<Value, noolang_util::RuntimeError>>;

#[derive(Clone)]
pub struct Closure {
    pub params: Vec<Symbol>,
    pub body: Expr,
    pub env: Env,
}

/// A curried native built-in: collects arguments one at a time until
/// `arity` is reached, then invokes `func` with the full list (spec.md
/// §4.E: "applying them curries identically" to closures).
#[derive(Clone)]
pub struct Native {
    pub name: Symbol,
    pub arity: usize,
    pub collected: Vec<Value>,
    pub func: NativeFunc,
}

/// A partially-applied ADT constructor, bound into the environment by
/// `type` definitions (spec.md §4.T: "an n-ary constructor is a curried
/// function").
#[derive(Clone)]
pub struct ConstructorFn {
    pub name: Symbol,
    pub arity: usize,
    pub collected: Vec<Value>,
}

/// A trait function value: collects arguments until the head parameter
/// (always the first, by convention — spec.md §9 leaves the exact
/// dispatch-argument position to the implementer) is present, then
/// dispatches through the runtime trait registry (spec.md §4.E).
#[derive(Clone)]
pub struct TraitFunction {
    pub constraint_name: Symbol,
    pub function_name: Symbol,
    pub arity: usize,
    pub collected: Vec<Value>,
}

#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Unit,
    Constructor { name: Symbol, args: Vec<Value> },
    Tuple(Vec<Value>),
    Record(IndexMap<Symbol, Value>),
    List(Vec<Value>),
    Closure(Rc<Closure>),
    Native(Rc<Native>),
    ConstructorFn(Rc<ConstructorFn>),
    TraitFunction(Rc<TraitFunction>),
    /// A first-class field selector produced by a standalone `@name`
    /// (spec.md §3: `@f : {@f:a | r} -> a`). Applying it to a record
    /// reads the field; applying it to anything else is a runtime error.
    Accessor(Symbol),
    /// The sole mutable value shape (spec.md §9: "cells are the only
    /// exception to the value-as-immutable rule"), produced by `mut` and
    /// written through by `mut!`. Reading a cell-bound name transparently
    /// dereferences it.
    Cell(Rc<RefCell<Value>>),
}

impl Value {
    pub fn bool(b: bool) -> Self {
        let name = if b { "True" } else { "False" };
        Value::Constructor { name: Symbol::intern(name), args: Vec::new() }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Constructor { name, args } if args.is_empty() => match name.as_str() {
                "True" => Some(true),
                "False" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Dereferences one level of `Cell`, leaving every other value as-is —
    /// used wherever a binding is read (spec.md §4.E: "reading `x`
    /// dereferences the cell automatically").
    pub fn deref_cell(&self) -> Value {
        match self {
            Value::Cell(cell) => cell.borrow().clone(),
            other => other.clone(),
        }
    }

    /// The constructor/type-head name used by runtime trait dispatch and
    /// by pattern matching's structural-shape checks.
    pub fn head_name(&self) -> Option<Symbol> {
        match self {
            Value::Number(_) => Some(Symbol::intern("Float")),
            Value::String(_) => Some(Symbol::intern("String")),
            Value::Unit => Some(Symbol::intern("Unit")),
            Value::Constructor { name, .. } => Some(*name),
            Value::Tuple(_) => Some(Symbol::intern("Tuple")),
            Value::Record(_) => Some(Symbol::intern("Record")),
            Value::List(_) => Some(Symbol::intern("List")),
            Value::Closure(_)
            | Value::Native(_)
            | Value::ConstructorFn(_)
            | Value::TraitFunction(_)
            | Value::Accessor(_) => Some(Symbol::intern("Function")),
            Value::Cell(cell) => cell.borrow().head_name(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Unit => write!(f, "{{}}"),
            Value::Constructor { name, args } => {
                if args.is_empty() {
                    write!(f, "{name}")
                } else {
                    write!(f, "{name}")?;
                    for arg in args {
                        write!(f, " {arg}")?;
                    }
                    Ok(())
                }
            }
            Value::Tuple(elems) => {
                write!(f, "{{")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "}}")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "@{k} {v}")?;
                }
                write!(f, "}}")
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, e) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "]")
            }
            Value::Closure(_) => write!(f, "<function>"),
            Value::Native(native) => write!(f, "<native {}>", native.name),
            Value::ConstructorFn(ctor) => write!(f, "<constructor {}>", ctor.name),
            Value::TraitFunction(tf) => write!(f, "<trait function {}>", tf.function_name),
            Value::Accessor(field) => write!(f, "<accessor @{field}>"),
            Value::Cell(cell) => write!(f, "{}", cell.borrow()),
        }
    }
}
