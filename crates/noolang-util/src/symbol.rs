//! String interning for identifiers, keywords, and record field names.
//!
//! Grounded on `faxc-util::symbol`'s thread-safe interner (a global table
//! behind a lock, symbols as a 4-byte handle), trimmed to the operations
//! the typer and evaluator scope chains actually exercise: intern, look up,
//! compare, display.

use std::fmt;
use std::sync::{OnceLock, RwLock};

use rustc_hash::FxHashMap;

/// A compact, `Copy` handle to an interned string.
///
/// Two symbols compare equal iff the strings they were interned from are
/// equal; comparison is an `O(1)` integer comparison rather than a string
/// comparison.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        table().intern(s)
    }

    pub fn as_str(&self) -> &'static str {
        table().resolve(*self)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(&s)
    }
}

#[derive(Default)]
struct StringTable {
    inner: RwLock<TableInner>,
}

#[derive(Default)]
struct TableInner {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl StringTable {
    fn intern(&self, s: &str) -> Symbol {
        if let Some(&idx) = self.inner.read().unwrap().index.get(s) {
            return Symbol(idx);
        }
        let mut inner = self.inner.write().unwrap();
        if let Some(&idx) = inner.index.get(s) {
            return Symbol(idx);
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let idx = inner.strings.len() as u32;
        inner.strings.push(leaked);
        inner.index.insert(leaked, idx);
        Symbol(idx)
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        self.inner.read().unwrap().strings[sym.0 as usize]
    }
}

fn table() -> &'static StringTable {
    static TABLE: OnceLock<StringTable> = OnceLock::new();
    TABLE.get_or_init(StringTable::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        let a = Symbol::intern("head");
        let b = Symbol::intern("head");
        let c = Symbol::intern("tail");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "head");
    }
}
