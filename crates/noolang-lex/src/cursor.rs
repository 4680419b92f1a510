//! Character cursor for traversing source code.
//!
//! Grounded on `faxc-lex/src/cursor.rs`: tracks byte position plus
//! 1-indexed line/column, correctly stepping over UTF-8 multi-byte
//! characters (`char_at`/`advance` work in `char`s, not bytes).

use noolang_util::Position;

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, position: 0, line: 1, column: 1 }
    }

    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    pub fn char_at(&self, offset: usize) -> char {
        self.source[self.position..].chars().nth(offset).unwrap_or('\0')
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn byte_offset(&self) -> usize {
        self.position
    }

    /// Consumes the current character, advancing position and line/column.
    pub fn advance(&mut self) -> char {
        let ch = self.current_char();
        if ch == '\0' {
            return ch;
        }
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    pub fn matches(&self, s: &str) -> bool {
        self.source[self.position..].starts_with(s)
    }

    /// Consumes `s` if it matches at the current position; returns whether
    /// it did.
    pub fn eat(&mut self, s: &str) -> bool {
        if self.matches(s) {
            for _ in 0..s.chars().count() {
                self.advance();
            }
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_line_and_column() {
        let mut cur = Cursor::new("ab\ncd");
        assert_eq!(cur.current_char(), 'a');
        cur.advance();
        cur.advance();
        assert_eq!(cur.position(), Position::new(1, 3));
        cur.advance(); // consumes '\n'
        assert_eq!(cur.position(), Position::new(2, 1));
    }

    #[test]
    fn handles_utf8_without_splitting_a_codepoint() {
        let mut cur = Cursor::new("été");
        assert_eq!(cur.current_char(), 'é');
        cur.advance();
        assert_eq!(cur.current_char(), 't');
    }
}
