//! noolang-drv — the CLI driver and REPL shell (spec.md §6, ambient
//! collaborator around the language core).
//!
//! Grounded on `faxc-drv`'s `Config`/`Session` split: a plain struct
//! describing what one invocation should do, and a function that carries
//! it out. The teacher's `Session` threads lex/parse/MIR/LIR/codegen/link
//! phases toward an object file; this driver has no codegen phases at
//! all, so `Session` shrinks to exactly the two phases spec.md's language
//! core defines (typecheck, evaluate) plus the lex/parse front end both
//! share.

pub mod ast_json;
pub mod config;
pub mod pipeline;
pub mod repl;

use std::path::Path;

use config::Mode;
use noolang_eval::Evaluator;
use noolang_sem::TypeState;
use noolang_util::{diagnostic, NoolangError, SourceMap};

/// Runs the mode `config::parse_args` produced, writing output to stdout
/// and returning `Err` (mapped by the caller to exit code 1) on any
/// surfaced error, per spec.md §6's "exit codes: 0 on success, 1 on any
/// surfaced error."
pub fn run(mode: Mode) -> anyhow::Result<()> {
    match mode {
        Mode::Repl => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            repl::Repl::new().run(stdin.lock(), stdout.lock())?;
            Ok(())
        }
        Mode::File(path) => run_file(&path),
        Mode::Eval(expr) => run_eval(&expr),
        Mode::Tokens(expr) => {
            print!("{}", pipeline::tokens_text(&pipeline::tokenize(&expr)));
            Ok(())
        }
        Mode::TokensFile(path) => {
            let source = std::fs::read_to_string(&path)?;
            print!("{}", pipeline::tokens_text(&pipeline::tokenize(&source)));
            Ok(())
        }
        Mode::Ast(expr) => {
            let program = pipeline::parse(&expr).map_err(|e| report_and_exit(&e, &expr, None))?;
            println!("{}", ast_json::program_to_json(&program));
            Ok(())
        }
        Mode::AstFile(path) => {
            let source = std::fs::read_to_string(&path)?;
            let program = pipeline::parse(&source).map_err(|e| report_and_exit(&e, &source, Some(&path)))?;
            println!("{}", ast_json::program_to_json(&program));
            Ok(())
        }
    }
}

fn run_file(path: &Path) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)?;
    run_source(&source, Some(path))
}

fn run_eval(expr: &str) -> anyhow::Result<()> {
    run_source(expr, None)
}

/// Parses, typechecks, and evaluates `source` in one pass, printing the
/// final value and the execution trace when it has more than one entry
/// (spec.md §4.E: "the REPL prints this trace when it contains more than
/// one entry" — file/`--eval` mode follows the same rule).
fn run_source(source: &str, base: Option<&Path>) -> anyhow::Result<()> {
    let program = pipeline::parse(source).map_err(|e| report_and_exit(&e, source, base))?;

    let mut state = TypeState::new();
    let mut evaluator = Evaluator::new();
    let outcome = pipeline::run_program(&mut state, &mut evaluator, &program, base)
        .map_err(|e| report_and_exit(&e, source, base))?;

    if outcome.trace.len() > 1 {
        for entry in &outcome.trace {
            println!("{} => {}", entry.span, entry.result);
        }
    }
    println!("{}", outcome.value);
    Ok(())
}

/// Renders `err` with source context and returns an `anyhow::Error` that
/// `main` turns into exit code 1 — the CLI's only error-reporting path
/// (the REPL has its own, in `repl.rs`, since it must survive the error
/// and keep prompting).
fn report_and_exit(err: &NoolangError, source: &str, path: Option<&Path>) -> anyhow::Error {
    let mut sources = SourceMap::new();
    let name = path.map(|p| p.display().to_string()).unwrap_or_else(|| "<eval>".to_string());
    let idx = sources.add_file(name, source);
    anyhow::anyhow!("{}", diagnostic::render_with_context(err, &sources, idx))
}
