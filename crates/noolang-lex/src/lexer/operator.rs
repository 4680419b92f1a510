//! Operator scanning (spec.md §4.L). Multi-character operators are tried
//! longest-first so e.g. `->` isn't split into `-` and `>`.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use noolang_util::Span;

/// Ordered longest-first; `lex_operator` walks this before falling back to
/// single-character operators.
const MULTI_CHAR_OPERATORS: &[&str] =
    &["|>", "<|", "==", "!=", "<=", ">=", "=>", "->", "|?"];

const SINGLE_CHAR_OPERATORS: &[char] =
    &['+', '-', '*', '/', '<', '>', '=', '|', '$', '!'];

pub fn is_operator_start(c: char) -> bool {
    SINGLE_CHAR_OPERATORS.contains(&c)
}

pub fn lex_operator(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.position();
    for op in MULTI_CHAR_OPERATORS {
        if cursor.eat(op) {
            let span = Span::new(start, cursor.position());
            return Token::new(TokenKind::Operator, *op, span);
        }
    }
    let c = cursor.advance();
    let span = Span::new(start, cursor.position());
    Token::new(TokenKind::Operator, c.to_string(), span)
}
