//! Built-in functions and operators bound into the root environment
//! (spec.md §4.E: "binary operators route through built-ins bound in the
//! environment"; §4.T's `stdlib` module lists their signatures).
//!
//! `random`/`randomRange` have no registry crate to draw on (the
//! workspace's dependency set carries no RNG crate — see DESIGN.md), so
//! they're backed by a small xorshift64 generator seeded once from the
//! system clock, kept in `Evaluator`.

use std::io::Write as _;
use std::rc::Rc;

use noolang_ast::BinaryOp;
use noolang_util::{RuntimeError, Symbol};

use crate::value::{Native, Value};
use crate::Evaluator;

fn native(env: &crate::env::Env, name: &str, arity: usize, func: crate::value::NativeFunc) {
    env.define(
        Symbol::intern(name),
        Value::Native(Rc::new(Native { name: Symbol::intern(name), arity, collected: Vec::new(), func })),
    );
}

fn expect_number(v: &Value, who: &str) -> Result<f64, RuntimeError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(RuntimeError::new(format!("{who} expected a number, found {other}"))),
    }
}

fn expect_string(v: &Value, who: &str) -> Result<String, RuntimeError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        other => Err(RuntimeError::new(format!("{who} expected a string, found {other}"))),
    }
}

fn expect_list(v: &Value, who: &str) -> Result<Vec<Value>, RuntimeError> {
    match v {
        Value::List(items) => Ok(items.clone()),
        other => Err(RuntimeError::new(format!("{who} expected a list, found {other}"))),
    }
}

/// Installs the operator natives named after `BinaryOp::symbol()` (used by
/// the evaluator's `Binary` handling for every op except the three
/// specially-wired ones), plus the I/O, list, and record built-ins.
pub fn install(env: &crate::env::Env) {
    install_operator(env, BinaryOp::Add, |a, b| Ok(Value::Number(a + b)));
    install_operator(env, BinaryOp::Sub, |a, b| Ok(Value::Number(a - b)));
    install_operator(env, BinaryOp::Mul, |a, b| Ok(Value::Number(a * b)));
    install_operator(env, BinaryOp::Div, |a, b| {
        if b == 0.0 {
            Err(RuntimeError::new("Division by zero"))
        } else {
            Ok(Value::Number(a / b))
        }
    });

    native(env, BinaryOp::Eq.symbol(), 2, Rc::new(|args, _| Ok(Value::bool(values_equal(&args[0], &args[1])))));
    native(env, BinaryOp::NotEq.symbol(), 2, Rc::new(|args, _| Ok(Value::bool(!values_equal(&args[0], &args[1])))));
    install_comparison(env, BinaryOp::Lt, |a, b| a < b);
    install_comparison(env, BinaryOp::Gt, |a, b| a > b);
    install_comparison(env, BinaryOp::Le, |a, b| a <= b);
    install_comparison(env, BinaryOp::Ge, |a, b| a >= b);

    native(
        env,
        "print",
        1,
        Rc::new(|args, _| {
            print!("{}", args[0]);
            std::io::stdout().flush().ok();
            Ok(args[0].clone())
        }),
    );
    native(
        env,
        "println",
        1,
        Rc::new(|args, _| {
            println!("{}", args[0]);
            Ok(Value::Unit)
        }),
    );
    native(
        env,
        "log",
        1,
        Rc::new(|args, _| {
            eprintln!("{}", args[0]);
            Ok(Value::Unit)
        }),
    );
    native(
        env,
        "readFile",
        1,
        Rc::new(|args, _| {
            let path = expect_string(&args[0], "readFile")?;
            std::fs::read_to_string(&path)
                .map(Value::String)
                .map_err(|e| RuntimeError::new(format!("cannot read `{path}`: {e}")))
        }),
    );
    native(
        env,
        "writeFile",
        2,
        Rc::new(|args, _| {
            let path = expect_string(&args[0], "writeFile")?;
            let contents = expect_string(&args[1], "writeFile")?;
            std::fs::write(&path, contents)
                .map(|_| Value::Unit)
                .map_err(|e| RuntimeError::new(format!("cannot write `{path}`: {e}")))
        }),
    );
    native(env, "random", 1, Rc::new(|_args, eval| Ok(Value::Number(eval.next_random()))));
    native(
        env,
        "randomRange",
        2,
        Rc::new(|args, eval| {
            let lo = expect_number(&args[0], "randomRange")?;
            let hi = expect_number(&args[1], "randomRange")?;
            Ok(Value::Number(lo + eval.next_random() * (hi - lo)))
        }),
    );

    native(
        env,
        "head",
        1,
        Rc::new(|args, _| {
            let items = expect_list(&args[0], "head")?;
            Ok(match items.into_iter().next() {
                Some(v) => Value::Constructor { name: Symbol::intern("Some"), args: vec![v] },
                None => Value::Constructor { name: Symbol::intern("None"), args: Vec::new() },
            })
        }),
    );
    native(
        env,
        "tail",
        1,
        Rc::new(|args, _| {
            let mut items = expect_list(&args[0], "tail")?;
            if items.is_empty() {
                return Err(RuntimeError::new("tail of an empty list"));
            }
            items.remove(0);
            Ok(Value::List(items))
        }),
    );
    native(
        env,
        "map",
        2,
        Rc::new(|args, eval| {
            let items = expect_list(&args[1], "map")?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval.apply(args[0].clone(), item)?);
            }
            Ok(Value::List(out))
        }),
    );
    native(
        env,
        "filter",
        2,
        Rc::new(|args, eval| {
            let items = expect_list(&args[1], "filter")?;
            let mut out = Vec::new();
            for item in items {
                let keep = eval.apply(args[0].clone(), item.clone())?;
                if keep.as_bool().unwrap_or(false) {
                    out.push(item);
                }
            }
            Ok(Value::List(out))
        }),
    );
    native(
        env,
        "reduce",
        3,
        Rc::new(|args, eval| {
            let items = expect_list(&args[2], "reduce")?;
            let mut acc = args[1].clone();
            for item in items {
                let step = eval.apply(args[0].clone(), acc)?;
                acc = eval.apply(step, item)?;
            }
            Ok(acc)
        }),
    );
    native(
        env,
        "length",
        1,
        Rc::new(|args, _| Ok(Value::Number(expect_list(&args[0], "length")?.len() as f64))),
    );

    native(
        env,
        "set",
        3,
        Rc::new(|args, _| {
            let field = match &args[0] {
                Value::Accessor(field) => *field,
                other => return Err(RuntimeError::new(format!("set expected a field accessor, found {other}"))),
            };
            let mut record = match &args[1] {
                Value::Record(fields) => fields.clone(),
                other => return Err(RuntimeError::new(format!("set expected a record, found {other}"))),
            };
            record.insert(field, args[2].clone());
            Ok(Value::Record(record))
        }),
    );
}

fn install_operator(env: &crate::env::Env, op: BinaryOp, f: impl Fn(f64, f64) -> Result<Value, RuntimeError> + 'static) {
    let who = op.symbol().to_string();
    native(
        env,
        op.symbol(),
        2,
        Rc::new(move |args, _| {
            let a = expect_number(&args[0], &who)?;
            let b = expect_number(&args[1], &who)?;
            f(a, b)
        }),
    );
}

fn install_comparison(env: &crate::env::Env, op: BinaryOp, f: impl Fn(f64, f64) -> bool + 'static) {
    let who = op.symbol().to_string();
    native(
        env,
        op.symbol(),
        2,
        Rc::new(move |args, _| {
            let a = expect_number(&args[0], &who)?;
            let b = expect_number(&args[1], &who)?;
            Ok(Value::bool(f(a, b)))
        }),
    );
}

/// Structural equality, used by `==`/`!=`. Closures and native functions
/// are never equal to anything, including themselves.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Unit, Value::Unit) => true,
        (Value::Constructor { name: n1, args: a1 }, Value::Constructor { name: n2, args: a2 }) => {
            n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| values_equal(x, y))
        }
        (Value::Tuple(x), Value::Tuple(y)) => x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_equal(p, q)),
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        (Value::List(x), Value::List(y)) => x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_equal(p, q)),
        (Value::Cell(x), _) => values_equal(&x.borrow(), b),
        (_, Value::Cell(y)) => values_equal(a, &y.borrow()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(eval: &mut Evaluator, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let mut value = eval.env.lookup(Symbol::intern(name)).expect("built-in not bound");
        for arg in args {
            value = eval.apply(value, arg.clone()).map_err(|e| e)?;
        }
        Ok(value)
    }

    #[test]
    fn structural_equality_compares_lists_elementwise() {
        let a = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
        let b = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
        let c = Value::List(vec![Value::Number(1.0), Value::Number(3.0)]);
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &c));
    }

    #[test]
    fn structural_equality_sees_through_cells() {
        let cell = Value::Cell(Rc::new(std::cell::RefCell::new(Value::Number(5.0))));
        assert!(values_equal(&cell, &Value::Number(5.0)));
    }

    #[test]
    fn record_equality_ignores_field_order() {
        let mut fields_a = indexmap::IndexMap::new();
        fields_a.insert(Symbol::intern("a"), Value::Number(1.0));
        fields_a.insert(Symbol::intern("b"), Value::Number(2.0));
        let mut fields_b = indexmap::IndexMap::new();
        fields_b.insert(Symbol::intern("b"), Value::Number(2.0));
        fields_b.insert(Symbol::intern("a"), Value::Number(1.0));
        assert!(values_equal(&Value::Record(fields_a), &Value::Record(fields_b)));
    }

    #[test]
    fn reduce_folds_a_list_left_to_right() {
        let mut eval = Evaluator::new();
        let add = eval.env.lookup(Symbol::intern(BinaryOp::Add.symbol())).unwrap();
        let list = Value::List(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
        let result = call(&mut eval, "reduce", &[add, Value::Number(0.0), list]).unwrap();
        assert_eq!(result.to_string(), "6");
    }

    #[test]
    fn length_counts_list_elements() {
        let mut eval = Evaluator::new();
        let list = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(call(&mut eval, "length", &[list]).unwrap().to_string(), "2");
    }

    #[test]
    fn set_replaces_a_field_without_touching_unrelated_fields() {
        let mut eval = Evaluator::new();
        let mut fields = indexmap::IndexMap::new();
        fields.insert(Symbol::intern("name"), Value::String("Alice".into()));
        fields.insert(Symbol::intern("age"), Value::Number(30.0));
        let record = Value::Record(fields);
        let accessor = Value::Accessor(Symbol::intern("age"));
        let updated = call(&mut eval, "set", &[accessor, record, Value::Number(31.0)]).unwrap();
        match updated {
            Value::Record(fields) => {
                assert_eq!(fields.get(&Symbol::intern("age")).unwrap().to_string(), "31");
                assert_eq!(fields.get(&Symbol::intern("name")).unwrap().to_string(), "\"Alice\"");
            }
            other => panic!("expected a record, got {other}"),
        }
    }

    #[test]
    fn division_operator_rejects_zero_divisor() {
        let mut eval = Evaluator::new();
        let div = eval.env.lookup(Symbol::intern(BinaryOp::Div.symbol())).unwrap();
        let err = eval.apply(div, Value::Number(1.0)).and_then(|f| eval.apply(f, Value::Number(0.0)));
        assert!(err.is_err());
    }
}
