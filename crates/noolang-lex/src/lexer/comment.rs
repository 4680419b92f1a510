//! Whitespace and `#`-to-end-of-line comment skipping (spec.md §4.L).

use crate::cursor::Cursor;

pub fn skip_whitespace_and_comments(cursor: &mut Cursor<'_>) {
    loop {
        match cursor.current_char() {
            c if c.is_whitespace() => {
                cursor.advance();
            }
            '#' => {
                while !cursor.is_at_end() && cursor.current_char() != '\n' {
                    cursor.advance();
                }
            }
            _ => break,
        }
    }
}
