//! Number literal scanning (spec.md §4.L). All numerics are `f64`; there is
//! no separate integer token kind.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use noolang_util::Span;

/// Scans digits, then an optional `.` fractional tail. The `.` is only
/// consumed when followed by at least one digit, so `1.` followed by
/// anything other than a digit (e.g. `1.foo`, a field access) leaves the
/// `.` for the punctuation scanner.
pub fn lex_number(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.position();
    let mut text = String::new();
    while cursor.current_char().is_ascii_digit() {
        text.push(cursor.advance());
    }
    if cursor.current_char() == '.' && cursor.char_at(1).is_ascii_digit() {
        text.push(cursor.advance()); // '.'
        while cursor.current_char().is_ascii_digit() {
            text.push(cursor.advance());
        }
    }
    let span = Span::new(start, cursor.position());
    Token::new(TokenKind::Number, text, span)
}
