//! The Noolang type language (spec.md §3): primitives, structural types,
//! ADTs, and the constraint language that rows/traits attach to type
//! variables.
//!
//! Grounded on `faxc-sem/src/types.rs`'s `Type` enum and its
//! substitution-friendly recursive shape, generalized from Rust's
//! monomorphic type system to Noolang's row/effect/trait-extended one.

use std::fmt;

use indexmap::IndexMap;

use noolang_util::Symbol;

use crate::effect::EffectSet;

/// A scalar primitive. `List`, unlike these, always carries an element
/// type, so it gets its own `Type::List` constructor rather than living
/// here (see spec.md §3's note that numeric literals are always `Float`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Float,
    String,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// A unification variable or rigid type parameter, with the
    /// constraints (if any) attached to it.
    Variable(Symbol, Vec<Constraint>),
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
        effects: EffectSet,
        constraints: Vec<Constraint>,
    },
    List(Box<Type>),
    Tuple(Vec<Type>),
    /// Ordered record type; order is preserved for diagnostics/printing, but
    /// equality and row-matching in the typer are by field name, not order.
    Record(IndexMap<Symbol, Type>),
    /// An applied constructor head, e.g. `Option Int`, `Bool`, `List String`.
    Variant(Symbol, Vec<Type>),
    /// An ADT's declaration: its name, quantified type parameters, and
    /// constructor signatures.
    Adt {
        name: Symbol,
        type_params: Vec<Symbol>,
        constructors: Vec<ConstructorDef>,
    },
    Union(Vec<Type>),
    Unit,
    /// Unifies with anything and disappears — used for FFI escape-hatch
    /// annotations and recovery after an earlier error.
    Unknown,
}

impl Type {
    pub fn float() -> Self {
        Type::Primitive(Primitive::Float)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::String)
    }

    pub fn bool() -> Self {
        Type::Primitive(Primitive::Bool)
    }

    pub fn function(params: Vec<Type>, ret: Type, effects: EffectSet) -> Self {
        Type::Function { params, ret: Box::new(ret), effects, constraints: Vec::new() }
    }
}

/// A constructor's name and the types of its arguments (empty for a
/// nullary constructor).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDef {
    pub name: Symbol,
    pub params: Vec<Type>,
}

/// A proposition attached to a type variable (spec.md §3).
///
/// `Or` is deliberately kept as its own connective rather than being
/// flattened into `And` during solving (spec.md §9's open question,
/// resolved in DESIGN.md): collapsing it early would let one disjunct's
/// failure sink a constraint that the other disjunct would have satisfied.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `a is C` — nominal membership in a named class of types.
    Is(Symbol, Symbol),
    /// `a has {@name: T}` — a single-field row constraint.
    HasField(Symbol, Symbol, Box<Type>),
    /// `a has {@f1: T1, @f2: T2, ...}` — a multi-field row constraint.
    HasStructure(Symbol, Vec<(Symbol, Type)>),
    /// `a implements Trait` — a trait-dispatch constraint.
    Implements(Symbol, Symbol),
    /// A user-defined parameterized constraint.
    Custom(Symbol, Symbol, Vec<Type>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
    Paren(Box<Constraint>),
}

/// `∀vars. constraints ⇒ τ` — a polymorphic type scheme, as bound by the
/// type environment (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    pub vars: Vec<Symbol>,
    pub constraints: Vec<Constraint>,
    pub ty: Type,
}

impl Scheme {
    /// A scheme with no quantified variables — a monotype lifted as-is.
    pub fn monomorphic(ty: Type) -> Self {
        Scheme { vars: Vec::new(), constraints: Vec::new(), ty }
    }
}

/// Renders a type in Noolang's own surface syntax (spec.md §4.P), not
/// Rust's `Debug` shape — this is what `TypeError` messages, the CLI's
/// `--ast`/file-mode type line, and the REPL's `.types` command show the
/// user, so it needs to read like something they could have written.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(Primitive::Float) => write!(f, "Float"),
            Type::Primitive(Primitive::String) => write!(f, "String"),
            Type::Primitive(Primitive::Bool) => write!(f, "Bool"),
            Type::Variable(name, constraints) => {
                write!(f, "{name}")?;
                fmt_constraint_suffix(f, constraints)
            }
            Type::Function { params, ret, effects, constraints } => {
                for p in params {
                    if needs_parens(p) {
                        write!(f, "({p}) -> ")?;
                    } else {
                        write!(f, "{p} -> ")?;
                    }
                }
                write!(f, "{ret}")?;
                if !effects.is_empty() {
                    write!(f, " !{effects}")?;
                }
                fmt_constraint_suffix(f, constraints)
            }
            Type::List(elem) => {
                if needs_parens(elem) {
                    write!(f, "List ({elem})")
                } else {
                    write!(f, "List {elem}")
                }
            }
            Type::Tuple(elems) => {
                write!(f, "{{")?;
                for (i, t) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, "}}")
            }
            Type::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "@{name}: {t}")?;
                }
                write!(f, "}}")
            }
            Type::Variant(name, args) => {
                write!(f, "{name}")?;
                for arg in args {
                    if needs_parens(arg) {
                        write!(f, " ({arg})")?;
                    } else {
                        write!(f, " {arg}")?;
                    }
                }
                Ok(())
            }
            Type::Adt { name, type_params, .. } => {
                write!(f, "{name}")?;
                for p in type_params {
                    write!(f, " {p}")?;
                }
                Ok(())
            }
            Type::Union(tys) => {
                for (i, t) in tys.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
            Type::Unit => write!(f, "{{}}"),
            Type::Unknown => write!(f, "?"),
        }
    }
}

/// Whether `ty` needs parenthesizing when it appears as an argument to a
/// higher-precedence position (a function parameter, a `List`/variant
/// argument) — functions and multi-type unions are the only forms whose
/// own surface syntax would otherwise be ambiguous there.
fn needs_parens(ty: &Type) -> bool {
    matches!(ty, Type::Function { .. } | Type::Union(_))
}

fn fmt_constraint_suffix(f: &mut fmt::Formatter<'_>, constraints: &[Constraint]) -> fmt::Result {
    if constraints.is_empty() {
        return Ok(());
    }
    write!(f, " given ")?;
    for (i, c) in constraints.iter().enumerate() {
        if i > 0 {
            write!(f, " and ")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Is(var, class) => write!(f, "{var} is {class}"),
            Constraint::HasField(var, field, ty) => write!(f, "{var} has {{@{field}: {ty}}}"),
            Constraint::HasStructure(var, fields) => {
                write!(f, "{var} has {{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "@{name}: {ty}")?;
                }
                write!(f, "}}")
            }
            Constraint::Implements(var, trait_name) => write!(f, "{var} implements {trait_name}"),
            Constraint::Custom(var, name, args) => {
                write!(f, "{var} {name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Constraint::And(l, r) => write!(f, "{l} and {r}"),
            Constraint::Or(l, r) => write!(f, "{l} or {r}"),
            Constraint::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

/// Renders a scheme as `∀vars. constraints => ty`, the way spec.md's
/// Glossary spells a type scheme — used by the REPL's `.types` command.
impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.vars.is_empty() {
            write!(f, "forall ")?;
            for (i, v) in self.vars.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, ". ")?;
        }
        if !self.constraints.is_empty() {
            for (i, c) in self.constraints.iter().enumerate() {
                if i > 0 {
                    write!(f, " and ")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, " => ")?;
        }
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monomorphic_scheme_has_no_quantified_vars() {
        let scheme = Scheme::monomorphic(Type::float());
        assert!(scheme.vars.is_empty());
        assert_eq!(scheme.ty, Type::float());
    }

    #[test]
    fn displays_primitives_in_surface_syntax() {
        assert_eq!(Type::float().to_string(), "Float");
        assert_eq!(Type::string().to_string(), "String");
        assert_eq!(Type::bool().to_string(), "Bool");
    }

    #[test]
    fn displays_list_and_function_types() {
        let list_float = Type::List(Box::new(Type::float()));
        assert_eq!(list_float.to_string(), "List Float");

        let f = Type::function(vec![Type::float()], Type::float(), EffectSet::new());
        assert_eq!(f.to_string(), "Float -> Float");
    }

    #[test]
    fn function_argument_gets_parenthesized() {
        let inner = Type::function(vec![Type::float()], Type::float(), EffectSet::new());
        let outer = Type::function(vec![inner], Type::bool(), EffectSet::new());
        assert_eq!(outer.to_string(), "(Float -> Float) -> Bool");
    }

    #[test]
    fn displays_record_and_variant_types() {
        let mut fields = IndexMap::new();
        fields.insert(Symbol::intern("name"), Type::string());
        assert_eq!(Type::Record(fields).to_string(), "{@name: String}");

        let option_int = Type::Variant(Symbol::intern("Option"), vec![Type::float()]);
        assert_eq!(option_int.to_string(), "Option Float");
    }

    #[test]
    fn displays_effects_on_function_types() {
        let f = Type::function(vec![Type::string()], Type::Unit, EffectSet::single(crate::effect::Effect::Write));
        assert_eq!(f.to_string(), "String -> {} !{write}");
    }
}
