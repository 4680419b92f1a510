//! Pattern matching against runtime values (spec.md §4.E).

use noolang_ast::{Literal, Pattern, PatternKind};

use crate::env::Env;
use crate::value::Value;

/// Attempts to match `pattern` against `value`, defining every bound
/// variable into `env` on success. Matching rules per spec.md §4.E:
/// variable binds unconditionally, wildcard matches without binding,
/// literal matches by structural equality, constructor matches name and
/// arity and recurses, tuple/record patterns recurse element/field-wise
/// (record fields matched by name regardless of source order).
pub fn try_match(pattern: &Pattern, value: &Value, env: &Env) -> bool {
    let value = value.deref_cell();
    match &pattern.kind {
        PatternKind::Variable(name) => {
            env.define(*name, value);
            true
        }
        PatternKind::Wildcard => true,
        PatternKind::Literal(lit) => literal_matches(lit, &value),
        PatternKind::Constructor(name, arg_patterns) => match &value {
            Value::Constructor { name: value_name, args } => {
                if value_name != name || args.len() != arg_patterns.len() {
                    return false;
                }
                arg_patterns.iter().zip(args).all(|(p, v)| try_match(p, v, env))
            }
            _ => false,
        },
        PatternKind::Tuple(elements) => match &value {
            Value::Tuple(values) if values.len() == elements.len() => {
                elements.iter().zip(values).all(|(p, v)| try_match(p, v, env))
            }
            _ => false,
        },
        PatternKind::Record(fields) => match &value {
            Value::Record(values) => fields
                .iter()
                .all(|(name, p)| values.get(name).is_some_and(|v| try_match(p, v, env))),
            _ => false,
        },
    }
}

fn literal_matches(lit: &Literal, value: &Value) -> bool {
    match (lit, value) {
        (Literal::Number(n), Value::Number(m)) => n == m,
        (Literal::String(s), Value::String(t)) => s == t,
        (Literal::Bool(b), _) => value.as_bool() == Some(*b),
        (Literal::Unit, Value::Unit) => true,
        _ => false,
    }
}
