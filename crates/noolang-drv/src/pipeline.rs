//! Wires the four pipeline phases together (spec.md §6): tokenize, parse,
//! typecheck, evaluate. Grounded on `faxc-drv::Session::run_pipeline`'s
//! shape — one function per phase, threaded through a session object —
//! re-targeted from lex/parse/MIR/LIR/codegen/link onto Noolang's
//! lex/parse/typecheck/evaluate chain. There is no separate "link" or
//! "emit" phase here; the evaluator's final value is the whole output.

use std::path::Path;

use noolang_ast::Program;
use noolang_eval::{Evaluator, Value};
use noolang_lex::Token;
use noolang_sem::TypeState;
use noolang_util::{NoolangError, TypeError};

/// Tokenizes `source` without parsing it — backs `--tokens`/`--tokens-file`
/// and the REPL's `.tokens` command.
pub fn tokenize(source: &str) -> Vec<Token> {
    noolang_lex::tokenize(source)
}

/// Renders a token stream one-per-line, the way `--tokens` prints to
/// stdout: `<kind> "<lexeme>" <span>`.
pub fn tokens_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        out.push_str(&format!("{:?} {:?} {}\n", tok.kind, tok.lexeme, tok.span));
    }
    out
}

/// Parses `source` into a `Program` (spec.md §4.P).
pub fn parse(source: &str) -> Result<Program, NoolangError> {
    noolang_par::parse(source).map_err(NoolangError::from)
}

/// The result of running a complete program (or one REPL input) through
/// typecheck + evaluate: the final value, its type, the effects it
/// performed, and the execution trace (one entry per top-level statement).
pub struct RunOutcome {
    pub value: Value,
    pub ty: noolang_ast::Type,
    pub effects: noolang_ast::EffectSet,
    pub trace: Vec<noolang_eval::TraceEntry>,
}

/// Runs an already-parsed program through the typer and then the
/// evaluator, in that order (spec.md §6: "a program is always fully typed
/// before any of it is evaluated").
pub fn run_program(
    state: &mut TypeState,
    evaluator: &mut Evaluator,
    program: &Program,
    base: Option<&Path>,
) -> Result<RunOutcome, NoolangError> {
    let (ty, effects) = noolang_sem::check_program(state, program, base)?;
    let (value, trace) = evaluator.eval_program(program, base)?;
    Ok(RunOutcome { value, ty, effects, trace })
}

/// Runs a single standalone expression through the typer and evaluator —
/// the REPL's per-input entry point (spec.md §7). Typechecking runs first;
/// a `TypeError` here means the expression is never evaluated.
pub fn run_expr(
    state: &mut TypeState,
    evaluator: &mut Evaluator,
    expr: &noolang_ast::Expr,
    base: Option<&Path>,
) -> Result<(Value, noolang_ast::Type, noolang_ast::EffectSet), NoolangError> {
    let (ty, effects) = noolang_sem::check_expr(state, expr, base)?;
    let value = evaluator.eval_single(expr, base)?;
    Ok((value, ty, effects))
}

/// Parses `source` as a single expression statement, erroring if it
/// contains more or fewer than one (used by `--eval`/`.tokens (expr)`-style
/// REPL commands that take a bare expression rather than a whole program).
pub fn parse_one(source: &str) -> Result<noolang_ast::Expr, NoolangError> {
    let program = parse(source)?;
    let mut statements = program.statements;
    match statements.len() {
        1 => Ok(statements.remove(0)),
        0 => Err(TypeError::new(noolang_util::TypeErrorKind::ConstraintNotSatisfied {
            description: "expected one expression, found none".into(),
        })
        .into()),
        n => Err(TypeError::new(noolang_util::TypeErrorKind::ConstraintNotSatisfied {
            description: format!("expected one expression, found {n} statements"),
        })
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_text_lists_one_token_per_line() {
        let tokens = tokenize("1 + 2");
        let text = tokens_text(&tokens);
        assert_eq!(text.lines().count(), tokens.len());
    }

    #[test]
    fn run_program_evaluates_arithmetic() {
        let mut state = TypeState::new();
        let mut evaluator = Evaluator::new();
        let program = parse("1 + 2 * 3").unwrap();
        let outcome = run_program(&mut state, &mut evaluator, &program, None).unwrap();
        assert_eq!(outcome.value.to_string(), "7");
        assert_eq!(outcome.ty.to_string(), "Float");
    }

    #[test]
    fn parse_one_rejects_multiple_statements() {
        let err = parse_one("1; 2").unwrap_err();
        assert!(matches!(err, NoolangError::Type(_)));
    }
}
