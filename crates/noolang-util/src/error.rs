//! The five user-facing error kinds (spec.md §7): `LexerError`,
//! `ParseError`, `TypeError`, `RuntimeError`, `ImportError`.
//!
//! Grounded on `faxc-util::error`'s per-concern `thiserror` enum style.
//! Each kind carries an optional source span, a message, optional source
//! context (filled in by the diagnostic renderer, see `diagnostic.rs`), and
//! an optional suggestion. None of these are catchable from within
//! Noolang; they terminate the current evaluation with a single message.

use thiserror::Error;

use crate::span::Span;

/// Fields shared by every error kind.
#[derive(Debug, Clone, Default)]
pub struct ErrorInfo {
    pub span: Option<Span>,
    pub context: Option<String>,
    pub suggestion: Option<String>,
}

impl ErrorInfo {
    pub fn at(span: Span) -> Self {
        Self { span: Some(span), context: None, suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct LexerError {
    pub message: String,
    pub info: ErrorInfo,
}

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub info: ErrorInfo,
}

/// The failure modes named in spec.md §4.T.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    Unification { expected: String, found: String },
    OccursCheck { var: String, ty: String },
    UndefinedVariable { name: String },
    UnknownConstructor { name: String },
    UnknownConstraint { name: String },
    ConstraintNotSatisfied { description: String },
    ArityMismatch { expected: usize, found: usize },
    NonExhaustiveMatch { missing: Vec<String> },
}

impl std::fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeErrorKind::Unification { expected, found } => {
                write!(f, "expected type `{expected}`, found `{found}`")
            }
            TypeErrorKind::OccursCheck { var, ty } => {
                write!(f, "occurs check failed: `{var}` occurs in `{ty}`")
            }
            TypeErrorKind::UndefinedVariable { name } => {
                write!(f, "Undefined variable: {name}")
            }
            TypeErrorKind::UnknownConstructor { name } => {
                write!(f, "unknown constructor: {name}")
            }
            TypeErrorKind::UnknownConstraint { name } => {
                write!(f, "unknown constraint: {name}")
            }
            TypeErrorKind::ConstraintNotSatisfied { description } => {
                write!(f, "constraint not satisfied: {description}")
            }
            TypeErrorKind::ArityMismatch { expected, found } => {
                write!(f, "expected {expected} argument(s), found {found}")
            }
            TypeErrorKind::NonExhaustiveMatch { missing } => {
                write!(f, "non-exhaustive match, missing: {}", missing.join(", "))
            }
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{kind}")]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub info: ErrorInfo,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind) -> Self {
        Self { kind, info: ErrorInfo::default() }
    }

    pub fn at(kind: TypeErrorKind, span: Span) -> Self {
        Self { kind, info: ErrorInfo::at(span) }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    pub info: ErrorInfo,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), info: ErrorInfo::default() }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct ImportError {
    pub message: String,
    pub info: ErrorInfo,
}

/// Union of the five surfaced error kinds, for callers (the driver, the
/// module loader) that propagate whichever kind a pipeline stage raised.
#[derive(Debug, Error, Clone)]
pub enum NoolangError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl NoolangError {
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NoolangError::Lexer(e) => &e.info,
            NoolangError::Parse(e) => &e.info,
            NoolangError::Type(e) => &e.info,
            NoolangError::Runtime(e) => &e.info,
            NoolangError::Import(e) => &e.info,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NoolangError::Lexer(_) => "LexerError",
            NoolangError::Parse(_) => "ParseError",
            NoolangError::Type(_) => "TypeError",
            NoolangError::Runtime(_) => "RuntimeError",
            NoolangError::Import(_) => "ImportError",
        }
    }
}
