//! The fixed effect vocabulary (spec.md §3): `{log, read, write, state,
//! time, rand, ffi, async}`. Effects attach only to function types and
//! compose by set union.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Effect {
    Log,
    Read,
    Write,
    State,
    Time,
    Rand,
    Ffi,
    Async,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Effect::Log => "log",
            Effect::Read => "read",
            Effect::Write => "write",
            Effect::State => "state",
            Effect::Time => "time",
            Effect::Rand => "rand",
            Effect::Ffi => "ffi",
            Effect::Async => "async",
        };
        f.write_str(name)
    }
}

/// An ordered set of effects. Ordered (`BTreeSet`) so that two equal sets
/// always print the same way, which matters for type-equality diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectSet(BTreeSet<Effect>);

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(effect: Effect) -> Self {
        let mut set = Self::default();
        set.insert(effect);
        set
    }

    pub fn insert(&mut self, effect: Effect) {
        self.0.insert(effect);
    }

    pub fn contains(&self, effect: Effect) -> bool {
        self.0.contains(&effect)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.iter()
    }

    /// Set union, the only composition rule effects support.
    pub fn union(&self, other: &EffectSet) -> EffectSet {
        EffectSet(self.0.union(&other.0).copied().collect())
    }

    pub fn union_with(&mut self, other: &EffectSet) {
        self.0.extend(&other.0);
    }

    /// True if every effect in `self` is also in `superset` — used to check
    /// the monotone-upward invariant (a function's declared effects must be
    /// a superset of its body's effects).
    pub fn is_subset_of(&self, superset: &EffectSet) -> bool {
        self.0.is_subset(&superset.0)
    }
}

impl fmt::Display for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{")?;
        for (i, effect) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{effect}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<Effect> for EffectSet {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        EffectSet(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_commutative_and_deduplicating() {
        let a = EffectSet::single(Effect::Log);
        let b = EffectSet::single(Effect::Write);
        let ab = a.union(&b);
        let ba = b.union(&a);
        assert_eq!(ab, ba);
        assert!(ab.contains(Effect::Log));
        assert!(ab.contains(Effect::Write));
    }

    #[test]
    fn subset_check_matches_monotone_invariant() {
        let body_effects = EffectSet::single(Effect::Write);
        let declared = EffectSet::from_iter([Effect::Write, Effect::Log]);
        assert!(body_effects.is_subset_of(&declared));
        assert!(!declared.is_subset_of(&body_effects));
    }
}
