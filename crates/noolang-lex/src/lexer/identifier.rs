//! Identifier and keyword scanning (spec.md §4.L).

use crate::cursor::Cursor;
use crate::token::{is_keyword, Token, TokenKind};
use noolang_util::Span;

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans an identifier, keyword, or boolean literal starting at the cursor's
/// current position. A `mut` immediately followed by `!` (no whitespace)
/// fuses into the single keyword `mut!`, per spec.md §3's `MutableDefinition`
/// form.
pub fn lex_identifier(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.position();
    let mut text = String::new();
    while is_ident_continue(cursor.current_char()) {
        text.push(cursor.advance());
    }
    if text == "mut" && cursor.current_char() == '!' {
        cursor.advance();
        text.push('!');
    }
    let span = Span::new(start, cursor.position());
    let kind = if text == "True" || text == "False" {
        TokenKind::Boolean
    } else if is_keyword(&text) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };
    Token::new(kind, text, span)
}
