//! The typer's threaded state (spec.md §4.T's `TypeState`): substitution,
//! fresh-variable counter, type environment, trait registry, and the
//! module-type cache. Everything the typer touches across one pass lives
//! here so inference can be written as `(state, input) -> (state, output)`
//! rather than a method bag on a typer object.

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use noolang_ast::{Constraint, Effect, EffectSet, Scheme, Type};
use noolang_util::Symbol;

use crate::env::TypeEnv;
use crate::registry::TraitRegistry;

/// A substitution: finite map from unification-variable names to types.
/// Applied idempotently — `resolve` always follows chains to a fixed
/// point rather than assuming one hop suffices.
#[derive(Debug, Clone, Default)]
pub struct Subst {
    map: HashMap<Symbol, Type>,
}

impl Subst {
    pub fn get(&self, var: Symbol) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn insert(&mut self, var: Symbol, ty: Type) {
        self.map.insert(var, ty);
    }
}

#[derive(Clone, Default)]
pub struct DecoratedTypes {
    by_expr: HashMap<u32, Type>,
}

impl DecoratedTypes {
    pub fn set(&mut self, id: noolang_ast::ExprId, ty: Type) {
        self.by_expr.insert(id.0, ty);
    }

    pub fn get(&self, id: noolang_ast::ExprId) -> Option<&Type> {
        self.by_expr.get(&id.0)
    }

    /// Re-resolves every decorated node's type through the final
    /// substitution. Inference decorates nodes as it visits them, before
    /// later unifications can still refine a node's unification variables
    /// further; this pass is run once after a program finishes checking so
    /// every decoration reflects the completed substitution.
    pub fn finalize(&mut self, resolver: impl Fn(&Type) -> Type) {
        for ty in self.by_expr.values_mut() {
            *ty = resolver(ty);
        }
    }
}

/// One registered algebraic data type: its quantified parameters and
/// constructor signatures, plus the reverse index from constructor name
/// back to the ADT (used by match exhaustiveness and constructor pattern
/// typing).
#[derive(Debug, Clone)]
pub struct AdtInfo {
    pub name: Symbol,
    pub type_params: Vec<Symbol>,
    pub constructors: Vec<noolang_ast::ConstructorDef>,
}

#[derive(Clone, Default)]
pub struct AdtRegistry {
    pub adts: IndexMap<Symbol, AdtInfo>,
    pub ctor_to_adt: HashMap<Symbol, Symbol>,
}

impl AdtRegistry {
    pub fn register(&mut self, info: AdtInfo) {
        for ctor in &info.constructors {
            self.ctor_to_adt.insert(ctor.name, info.name);
        }
        self.adts.insert(info.name, info);
    }

    pub fn constructor_arity(&self, name: Symbol) -> Option<usize> {
        let adt = self.ctor_to_adt.get(&name)?;
        let info = self.adts.get(adt)?;
        info.constructors.iter().find(|c| c.name == name).map(|c| c.params.len())
    }
}

/// The typer's complete threaded state. `Clone` so the REPL can snapshot
/// before an input and restore it on failure (spec.md §7: "the state is
/// snapshotted before each input and restored on failure").
#[derive(Clone)]
pub struct TypeState {
    pub subst: Subst,
    counter: u32,
    pub env: TypeEnv,
    pub registry: TraitRegistry,
    pub adts: AdtRegistry,
    pub decorations: DecoratedTypes,
    /// Pending constraints keyed by the unification-variable symbol they're
    /// attached to; discharged as soon as the variable is bound to a
    /// concrete head (spec.md §4.T's constraint-solving rule).
    pub pending_constraints: HashMap<Symbol, Vec<Constraint>>,
    /// Module type cache (spec.md §4.T's import handling): absolute path
    /// -> the record-of-exports type already computed for it.
    pub module_types: HashMap<PathBuf, Type>,
    /// Import paths currently being resolved, for cycle detection.
    loading: Vec<PathBuf>,
}

impl TypeState {
    pub fn new() -> Self {
        let mut state = TypeState {
            subst: Subst::default(),
            counter: 0,
            env: TypeEnv::new(),
            registry: TraitRegistry::default(),
            adts: AdtRegistry::default(),
            decorations: DecoratedTypes::default(),
            pending_constraints: HashMap::new(),
            module_types: HashMap::new(),
            loading: Vec::new(),
        };
        crate::stdlib::install(&mut state);
        state
    }

    /// Allocates a fresh unification variable, distinct from every
    /// previously allocated one in this state.
    pub fn fresh_var(&mut self) -> Type {
        let id = self.counter;
        self.counter += 1;
        Type::Variable(Symbol::intern(&format!("t{id}")), Vec::new())
    }

    /// Allocates a fresh variable and attaches constraints built from its
    /// own symbol (constraints like `HasField` reference the variable
    /// they're attached to by name, so the builder runs after the symbol
    /// is known).
    pub fn fresh_var_with(&mut self, build: impl FnOnce(Symbol) -> Vec<Constraint>) -> Type {
        let ty = self.fresh_var();
        if let Type::Variable(name, _) = &ty {
            let constraints = build(*name);
            if !constraints.is_empty() {
                self.pending_constraints.insert(*name, constraints);
            }
        }
        ty
    }

    /// Between REPL inputs: drop unification variables (and their
    /// pending constraints) that are no longer reachable from any scheme
    /// in the persisted environment, so one input's scratch variables
    /// don't leak into the next (spec.md §5).
    pub fn prune_unreachable(&mut self) {
        let reachable = self.env.free_vars();
        self.pending_constraints.retain(|var, _| reachable.contains(var));
    }

    pub fn begin_loading(&mut self, path: PathBuf) -> Result<(), noolang_util::ImportError> {
        if self.loading.contains(&path) {
            return Err(noolang_util::ImportError {
                message: format!("circular import: {}", path.display()),
                info: Default::default(),
            });
        }
        self.loading.push(path);
        Ok(())
    }

    pub fn end_loading(&mut self, path: &PathBuf) {
        self.loading.retain(|p| p != path);
    }
}

/// Carried alongside a `Type` by most inference helpers: the effects the
/// expression produces, accumulated monotonically per spec.md §4.T.
pub type Effects = EffectSet;

pub fn effects_of(ty: &Type) -> EffectSet {
    match ty {
        Type::Function { effects, .. } => effects.clone(),
        _ => EffectSet::new(),
    }
}

pub fn with_effect(mut effects: EffectSet, e: Effect) -> EffectSet {
    effects.insert(e);
    effects
}
