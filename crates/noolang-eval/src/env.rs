//! The evaluator's parent-linked environment (spec.md §4.E: "a
//! parent-linked environment of `name -> Value`").

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use noolang_util::Symbol;

use crate::value::Value;

struct Scope {
    vars: FxHashMap<Symbol, Value>,
    parent: Option<Env>,
}

/// A reference-counted, shared scope frame. Cheap to clone — closures
/// capture it by cloning the `Rc`, not by copying the bindings.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    pub fn root() -> Self {
        Env(Rc::new(RefCell::new(Scope { vars: FxHashMap::default(), parent: None })))
    }

    /// A fresh child frame linked to `self` as parent — a closure's call
    /// frame or a `where`/`match`-arm's local scope.
    pub fn child(&self) -> Self {
        Env(Rc::new(RefCell::new(Scope { vars: FxHashMap::default(), parent: Some(self.clone()) })))
    }

    pub fn define(&self, name: Symbol, value: Value) {
        self.0.borrow_mut().vars.insert(name, value);
    }

    /// Looks up `name`, auto-dereferencing through a `Cell` (spec.md §4.E:
    /// "reading `x` dereferences the cell automatically").
    pub fn lookup(&self, name: Symbol) -> Option<Value> {
        self.lookup_raw(name).map(|v| v.deref_cell())
    }

    /// Looks up `name` without dereferencing a `Cell` — used by `mut!` to
    /// get at the cell itself so it can write through it.
    pub fn lookup_raw(&self, name: Symbol) -> Option<Value> {
        let scope = self.0.borrow();
        if let Some(v) = scope.vars.get(&name) {
            return Some(v.clone());
        }
        scope.parent.as_ref().and_then(|p| p.lookup_raw(name))
    }

    /// Every name bound directly in this frame, for the REPL's `.env`/
    /// `.env-json` commands. Does not walk parent frames — the REPL's
    /// persisted environment is always a single root frame, never nested.
    pub fn names(&self) -> Vec<Symbol> {
        self.0.borrow().vars.keys().copied().collect()
    }

    /// Copies this frame's bindings out, for the REPL to restore after a
    /// failed input (spec.md §7's snapshot-before/restore-on-failure
    /// policy, extended from the type state to the value environment).
    pub fn snapshot(&self) -> FxHashMap<Symbol, Value> {
        self.0.borrow().vars.clone()
    }

    pub fn restore(&self, snapshot: FxHashMap<Symbol, Value>) {
        self.0.borrow_mut().vars = snapshot;
    }
}
