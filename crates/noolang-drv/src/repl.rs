//! The line-oriented REPL (spec.md §6): reads one input per line, types
//! and evaluates it against persisted `TypeState`/`Evaluator` state, and
//! supports the `.`-prefixed introspection commands.
//!
//! Grounded on `faxc-drv::Session`'s read-eval-print loop shape (a struct
//! holding the session's mutable state, a `run` method looping over
//! stdin), re-targeted from a batch AOT-compile session onto an
//! interactive one. The teacher reads no line-editing crate (no
//! `rustyline` in its dependency table), so this reads raw lines from
//! stdin the same way.

use std::io::{self, BufRead, Write};

use noolang_eval::Evaluator;
use noolang_sem::TypeState;
use noolang_util::{NoolangError, SourceMap};

use crate::ast_json;
use crate::pipeline;

const HELP_TEXT: &str = "\
Commands:
  .help                 show this message
  .quit, .exit          leave the REPL
  .env                  list bound names in the current scope
  .env-json             list bound names and values as JSON
  .clear-env            discard all bindings and start fresh
  .types                list bound names with their inferred schemes
  .tokens (expr)        tokenize an expression and print its tokens
  .tokens-file file     tokenize a file and print its tokens
  .ast (expr)           parse an expression and print its AST as JSON
  .ast-file file        parse a file and print its AST as JSON
  .ast-json (expr)      alias for .ast (expr)
  .error-detail         toggle verbose error rendering (off by default)
  .error-context        toggle source-excerpt error rendering (off by default)
  any other line is evaluated as a Noolang expression";

/// The REPL's own mutable state: the persisted typer/evaluator state, plus
/// the two independent display toggles spec.md §6 lists as commands rather
/// than flags.
pub struct Repl {
    state: TypeState,
    evaluator: Evaluator,
    error_detail: bool,
    error_context: bool,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            state: TypeState::new(),
            evaluator: Evaluator::new(),
            error_detail: false,
            error_context: false,
        }
    }

    /// Runs the loop until `.quit`/`.exit` or end-of-input, writing prompts
    /// and results to `out`. Returns `Ok(())` unless stdin itself fails.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "Noolang REPL — type .help for commands, .quit to leave.")?;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                write!(out, "noolang> ")?;
                out.flush()?;
                continue;
            }
            if line == ".quit" || line == ".exit" {
                break;
            }
            self.dispatch(line, &mut out)?;
            write!(out, "noolang> ")?;
            out.flush()?;
        }
        Ok(())
    }

    fn dispatch(&mut self, line: &str, mut out: impl Write) -> io::Result<()> {
        if let Some(rest) = line.strip_prefix('.') {
            self.run_command(rest, &mut out)
        } else {
            self.eval_line(line, &mut out)
        }
    }

    fn run_command(&mut self, rest: &str, mut out: impl Write) -> io::Result<()> {
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((n, a)) => (n, a.trim()),
            None => (rest, ""),
        };
        let arg = unwrap_parens(arg);
        match name {
            "help" => writeln!(out, "{HELP_TEXT}"),
            "env" => {
                for name in self.evaluator.env.names() {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            }
            "env-json" => {
                let mut parts = Vec::new();
                for name in self.evaluator.env.names() {
                    if let Some(value) = self.evaluator.env.lookup(name) {
                        parts.push(format!(
                            "{{\"name\": {}, \"value\": {}}}",
                            ast_json::escape(name.as_str()),
                            ast_json::escape(&value.to_string())
                        ));
                    }
                }
                writeln!(out, "[{}]", parts.join(", "))
            }
            "clear-env" => {
                self.state = TypeState::new();
                self.evaluator = Evaluator::new();
                writeln!(out, "environment cleared")
            }
            "types" => {
                for name in self.state.env.names() {
                    if let Some(binding) = self.state.env.lookup(name) {
                        writeln!(out, "{name} : {}", binding.scheme)?;
                    }
                }
                Ok(())
            }
            "tokens" => {
                let tokens = pipeline::tokenize(arg);
                write!(out, "{}", pipeline::tokens_text(&tokens))
            }
            "tokens-file" => match std::fs::read_to_string(arg) {
                Ok(source) => {
                    let tokens = pipeline::tokenize(&source);
                    write!(out, "{}", pipeline::tokens_text(&tokens))
                }
                Err(e) => writeln!(out, "error: could not read {arg}: {e}"),
            },
            "ast" | "ast-json" => match pipeline::parse(arg) {
                Ok(program) => writeln!(out, "{}", ast_json::program_to_json(&program)),
                Err(e) => self.report(&e, arg, &mut out),
            },
            "ast-file" => match std::fs::read_to_string(arg) {
                Ok(source) => match pipeline::parse(&source) {
                    Ok(program) => writeln!(out, "{}", ast_json::program_to_json(&program)),
                    Err(e) => self.report(&e, &source, &mut out),
                },
                Err(e) => writeln!(out, "error: could not read {arg}: {e}"),
            },
            "error-detail" => {
                self.error_detail = !self.error_detail;
                writeln!(out, "error-detail: {}", if self.error_detail { "on" } else { "off" })
            }
            "error-context" => {
                self.error_context = !self.error_context;
                writeln!(out, "error-context: {}", if self.error_context { "on" } else { "off" })
            }
            other => writeln!(out, "unknown command: .{other} (try .help)"),
        }
    }

    /// Types then evaluates one expression against the persisted state,
    /// rolling both back on failure (spec.md §7: "the state is snapshotted
    /// before each input and restored on failure").
    fn eval_line(&mut self, line: &str, mut out: impl Write) -> io::Result<()> {
        let expr = match pipeline::parse_one(line) {
            Ok(expr) => expr,
            Err(e) => return self.report(&e, line, &mut out),
        };

        let state_snapshot = self.state.clone();
        let eval_snapshot = self.evaluator.snapshot();

        match pipeline::run_expr(&mut self.state, &mut self.evaluator, &expr, None) {
            Ok((value, ty, _effects)) => {
                self.state.prune_unreachable();
                writeln!(out, "{value} : {ty}")
            }
            Err(e) => {
                self.state = state_snapshot;
                self.evaluator.restore(eval_snapshot);
                self.report(&e, line, &mut out)
            }
        }
    }

    fn report(&self, err: &NoolangError, source: &str, mut out: impl Write) -> io::Result<()> {
        if self.error_context {
            let mut sources = SourceMap::new();
            let idx = sources.add_file("<repl>", source);
            writeln!(out, "{}", noolang_util::diagnostic::render_with_context(err, &sources, idx))
        } else if self.error_detail {
            writeln!(out, "{}: {err}", err.kind_name())
        } else {
            writeln!(out, "{}", noolang_util::diagnostic::render_plain(err))
        }
    }
}

/// Strips one layer of matching parens from a REPL command argument — the
/// `.tokens (expr)` / `.ast (expr)` parenthesized forms spec.md §6
/// describes exist only to let the expression itself contain whitespace
/// without being mistaken for a second argument; the parens are not part
/// of the expression.
fn unwrap_parens(arg: &str) -> &str {
    if let Some(inner) = arg.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        inner.trim()
    } else {
        arg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_lines(lines: &[&str]) -> String {
        let mut repl = Repl::new();
        let input = lines.join("\n") + "\n";
        let mut out = Vec::new();
        repl.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn evaluates_arithmetic() {
        let out = run_lines(&["1 + 2 * 3", ".quit"]);
        assert!(out.contains("7 : Float"));
    }

    #[test]
    fn persists_bindings_across_lines() {
        let out = run_lines(&["x = 5", "x + 1", ".quit"]);
        assert!(out.contains("6 : Float"));
    }

    #[test]
    fn failed_input_does_not_corrupt_state() {
        let out = run_lines(&["x = 5", "x + \"oops\"", "x + 1", ".quit"]);
        assert!(out.contains("6 : Float"));
    }

    #[test]
    fn help_command_lists_commands() {
        let out = run_lines(&[".help", ".quit"]);
        assert!(out.contains(".clear-env"));
    }

    #[test]
    fn clear_env_drops_bindings() {
        let out = run_lines(&["x = 5", ".clear-env", "x", ".quit"]);
        assert!(out.contains("Undefined variable"));
    }

    #[test]
    fn tokens_command_with_parens() {
        let out = run_lines(&[".tokens (1 + 2)", ".quit"]);
        assert!(out.contains("Number"));
    }

    #[test]
    fn unwrap_parens_strips_one_layer() {
        assert_eq!(unwrap_parens("(1 + 2)"), "1 + 2");
        assert_eq!(unwrap_parens("1 + 2"), "1 + 2");
    }
}
