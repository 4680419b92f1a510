//! Import resolution at type time (spec.md §4.T/§4.M): resolves a path
//! relative to the importing file, re-enters the pipeline (lex, parse,
//! type) on a cache miss, and caches the resulting record-of-exports
//! type by absolute path. Cycle detection keeps a stack of in-progress
//! absolute paths (spec.md §9's open-question resolution).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use noolang_ast::{ExprKind, Type};
use noolang_util::{ImportError, NoolangError, Symbol};

use crate::state::TypeState;
use crate::unify::resolve;

/// Resolves `import_path` relative to `base`, appending `.noo` if no
/// extension is present, falling back to the process's working directory
/// when there is no base file context (spec.md §4.E).
pub fn resolve_path(base: Option<&Path>, import_path: &str) -> PathBuf {
    let mut candidate = match base.and_then(Path::parent) {
        Some(dir) => dir.join(import_path),
        None => PathBuf::from(import_path),
    };
    if candidate.extension().is_none() {
        candidate.set_extension("noo");
    }
    candidate
}

/// Types an imported module, returning its record-of-exports type. Reuses
/// `state`'s module cache and cycle-detection stack; the caller (the main
/// `check_program` entry) is responsible for catching the `read` effect
/// this import itself always carries.
pub fn type_import(
    state: &mut TypeState,
    base: Option<&Path>,
    import_path: &str,
) -> Result<Type, NoolangError> {
    let abs = resolve_path(base, import_path)
        .canonicalize()
        .unwrap_or_else(|_| resolve_path(base, import_path));

    if let Some(cached) = state.module_types.get(&abs) {
        return Ok(cached.clone());
    }

    state.begin_loading(abs.clone()).map_err(NoolangError::Import)?;

    let source = std::fs::read_to_string(&abs).map_err(|e| {
        NoolangError::Import(ImportError {
            message: format!("cannot read import `{import_path}`: {e}"),
            info: Default::default(),
        })
    })?;

    let program = noolang_par::parse(&source).map_err(NoolangError::Parse)?;

    state.env.push_scope();
    let mut exports = IndexMap::new();
    for stmt in &program.statements {
        let (_ty, _effects) = crate::infer::infer_expr(state, stmt, Some(abs.as_path()))?;
        if let ExprKind::Definition { name, .. } = &stmt.kind {
            if let Some(binding) = state.env.lookup(*name) {
                exports.insert(*name, resolve(state, &binding.scheme.ty));
            }
        }
    }
    state.env.pop_scope();

    let module_ty = Type::Record(exports);
    state.end_loading(&abs);
    state.module_types.insert(abs, module_ty.clone());
    Ok(module_ty)
}

pub fn module_display_name(path: &str) -> Symbol {
    Symbol::intern(path)
}
