//! noolang-util - shared foundation types for the Noolang pipeline.
//!
//! Provides source positions (`span`), string interning (`symbol`),
//! the five user-facing error kinds plus diagnostic rendering
//! (`error`, `diagnostic`), and a typed-index vector (`index_vec`) used by
//! the typer's unification-variable and definition-id spaces.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{
    ErrorInfo, ImportError, LexerError, NoolangError, ParseError, RuntimeError, TypeError,
    TypeErrorKind,
};
pub use index_vec::{Idx, IndexVec};
pub use span::{Position, SourceMap, Span};
pub use symbol::Symbol;
