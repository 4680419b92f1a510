//! Invocation modes and the hand-rolled argument parser (spec.md §6).
//!
//! Grounded on `faxc-drv`'s `Config` struct shape, re-targeted at the
//! language core's modes (file/`--eval`/`--tokens`/`--ast`/REPL) instead of
//! the AOT compiler's flags (`-O`, `--emit-*`, `--target`). The teacher
//! parses `std::env::args()` by hand rather than reaching for `clap`; this
//! keeps that convention since the mode grammar here is small enough not
//! to need a derive-based parser.

use std::path::PathBuf;

use thiserror::Error;

/// What a single invocation of the `noolang` binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// `noolang <file.noo>` — evaluate a file, print the final value.
    File(PathBuf),
    /// `noolang --eval|-e <expr>` — evaluate an inline expression.
    Eval(String),
    /// `noolang --tokens <expr>` — dump the lexer's output for an inline expression.
    Tokens(String),
    /// `noolang --tokens-file <file>` — dump the lexer's output for a file.
    TokensFile(PathBuf),
    /// `noolang --ast <expr>` — dump the parsed AST as JSON for an inline expression.
    Ast(String),
    /// `noolang --ast-file <file>` — dump the parsed AST as JSON for a file.
    AstFile(PathBuf),
    /// No arguments — start the REPL.
    Repl,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgsError {
    #[error("`{0}` expects an argument")]
    MissingValue(String),
    #[error("unrecognized argument: `{0}`")]
    Unrecognized(String),
    #[error("at most one mode flag may be given")]
    ConflictingModes,
}

/// Parses the process's arguments (excluding `argv[0]`) into a [`Mode`].
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Mode, ArgsError> {
    let mut args = args.into_iter();
    let mut mode: Option<Mode> = None;

    while let Some(arg) = args.next() {
        let next_value = |args: &mut dyn Iterator<Item = String>, flag: &str| {
            args.next().ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
        };

        let parsed = match arg.as_str() {
            "-e" | "--eval" => Mode::Eval(next_value(&mut args, &arg)?),
            "--tokens" => Mode::Tokens(next_value(&mut args, &arg)?),
            "--tokens-file" => Mode::TokensFile(PathBuf::from(next_value(&mut args, &arg)?)),
            "--ast" => Mode::Ast(next_value(&mut args, &arg)?),
            "--ast-file" => Mode::AstFile(PathBuf::from(next_value(&mut args, &arg)?)),
            other if other.starts_with('-') && other != "-" => {
                return Err(ArgsError::Unrecognized(other.to_string()));
            }
            other => Mode::File(PathBuf::from(other)),
        };

        if mode.is_some() {
            return Err(ArgsError::ConflictingModes);
        }
        mode = Some(parsed);
    }

    Ok(mode.unwrap_or(Mode::Repl))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_repl() {
        assert_eq!(parse_args(args(&[])).unwrap(), Mode::Repl);
    }

    #[test]
    fn a_bare_path_is_file_mode() {
        assert_eq!(parse_args(args(&["main.noo"])).unwrap(), Mode::File(PathBuf::from("main.noo")));
    }

    #[test]
    fn eval_short_and_long_flags_agree() {
        assert_eq!(parse_args(args(&["-e", "1 + 2"])).unwrap(), Mode::Eval("1 + 2".into()));
        assert_eq!(parse_args(args(&["--eval", "1 + 2"])).unwrap(), Mode::Eval("1 + 2".into()));
    }

    #[test]
    fn tokens_and_tokens_file() {
        assert_eq!(parse_args(args(&["--tokens", "1 + 2"])).unwrap(), Mode::Tokens("1 + 2".into()));
        assert_eq!(
            parse_args(args(&["--tokens-file", "a.noo"])).unwrap(),
            Mode::TokensFile(PathBuf::from("a.noo"))
        );
    }

    #[test]
    fn ast_and_ast_file() {
        assert_eq!(parse_args(args(&["--ast", "1 + 2"])).unwrap(), Mode::Ast("1 + 2".into()));
        assert_eq!(parse_args(args(&["--ast-file", "a.noo"])).unwrap(), Mode::AstFile(PathBuf::from("a.noo")));
    }

    #[test]
    fn missing_value_is_an_error() {
        assert_eq!(parse_args(args(&["--eval"])).unwrap_err(), ArgsError::MissingValue("--eval".into()));
    }

    #[test]
    fn unrecognized_flag_is_an_error() {
        assert_eq!(parse_args(args(&["--bogus"])).unwrap_err(), ArgsError::Unrecognized("--bogus".into()));
    }

    #[test]
    fn two_mode_flags_conflict() {
        assert_eq!(parse_args(args(&["--eval", "1", "main.noo"])).unwrap_err(), ArgsError::ConflictingModes);
    }
}
