//! The value-level half of the module loader (spec.md §4.M): parses and
//! evaluates an imported file once, caching the resulting record-of-exports
//! value by absolute path. Reuses `noolang-sem`'s path-resolution rule
//! (`noolang_sem::module::resolve_path`) so both halves of the loader agree
//! on where an import actually points.

use std::path::PathBuf;

use indexmap::IndexMap;
use noolang_ast::ExprKind;
use noolang_util::{ImportError, NoolangError};

use crate::builtins;
use crate::env::Env;
use crate::interpreter::Evaluator;
use crate::value::Value;

/// Resolves, loads, evaluates, and caches the module at `import_path`
/// (relative to `evaluator`'s current base file). The imported module runs
/// in a fresh root environment with its own builtins installed — imports
/// do not inherit the importer's local bindings — and its `Definition`
/// statements (in source order) become the returned record's fields,
/// mirroring `noolang_sem::module::type_import`'s export rule.
pub fn eval_import(evaluator: &mut Evaluator, import_path: &str) -> Result<Value, NoolangError> {
    let abs = noolang_sem::module::resolve_path(evaluator.base.as_deref(), import_path)
        .canonicalize()
        .unwrap_or_else(|_| noolang_sem::module::resolve_path(evaluator.base.as_deref(), import_path));

    if let Some(cached) = evaluator.module_cache.get(&abs) {
        return Ok(cached.clone());
    }

    if evaluator.loading.contains(&abs) {
        return Err(NoolangError::Import(ImportError {
            message: format!("circular import: {}", abs.display()),
            info: Default::default(),
        }));
    }

    let source = std::fs::read_to_string(&abs).map_err(|e| {
        NoolangError::Import(ImportError {
            message: format!("cannot read import `{import_path}`: {e}"),
            info: Default::default(),
        })
    })?;
    let program = noolang_par::parse(&source).map_err(NoolangError::Parse)?;

    evaluator.loading.push(abs.clone());
    let saved_env = std::mem::replace(&mut evaluator.env, Env::root());
    let saved_base: Option<PathBuf> = evaluator.base.take();
    builtins::install(&evaluator.env);
    evaluator.base = Some(abs.clone());

    let result = (|| -> Result<Value, NoolangError> {
        let mut exports = IndexMap::new();
        for stmt in &program.statements {
            let value = evaluator.eval_expr(stmt)?;
            if let ExprKind::Definition { name, .. } = &stmt.kind {
                exports.insert(*name, evaluator.env.lookup(*name).unwrap_or(value));
            }
        }
        Ok(Value::Record(exports))
    })();

    evaluator.env = saved_env;
    evaluator.base = saved_base;
    evaluator.loading.retain(|p| p != &abs);

    let module_value = result?;
    evaluator.module_cache.insert(abs, module_value.clone());
    Ok(module_value)
}
