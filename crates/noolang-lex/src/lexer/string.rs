//! String literal scanning (spec.md §4.L).
//!
//! Strings are delimited by `"` or `'`. `\x` consumes the next character
//! literally, with no escape-code table (`\n` is the two characters `\`
//! and `n`, not a newline) — there's no need for one since string contents
//! never need to embed the delimiter any other way. An unterminated string
//! is not a lexer error: the lexeme scanned so far is returned as-is, and
//! the parser or typer will surface the missing value downstream.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use noolang_util::Span;

pub fn lex_string(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.position();
    let delim = cursor.advance();
    let mut text = String::new();
    loop {
        if cursor.is_at_end() {
            break;
        }
        let c = cursor.current_char();
        if c == delim {
            cursor.advance();
            break;
        }
        if c == '\\' {
            cursor.advance();
            if !cursor.is_at_end() {
                text.push(cursor.advance());
            }
            continue;
        }
        text.push(cursor.advance());
    }
    let span = Span::new(start, cursor.position());
    Token::new(TokenKind::String, text, span)
}
