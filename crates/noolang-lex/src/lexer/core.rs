//! The lexer's main dispatch loop. Grounded on `faxc-lex/src/lexer/mod.rs`'s
//! character-class dispatch, adapted to Noolang's token vocabulary.

use super::comment::skip_whitespace_and_comments;
use super::identifier::{is_ident_continue, is_ident_start, lex_identifier};
use super::number::lex_number;
use super::operator::{is_operator_start, lex_operator};
use super::string::lex_string;
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use noolang_util::Span;

const PUNCTUATION: &[char] = &['(', ')', ',', ';', ':', '[', ']', '{', '}', '.'];

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source) }
    }

    /// Scans and returns the next token. Always terminates in a single
    /// `TokenKind::Eof` token at the end of input; never errors — an
    /// unrecognized byte becomes its own single-character punctuation
    /// token rather than failing the whole scan.
    pub fn next_token(&mut self) -> Token {
        skip_whitespace_and_comments(&mut self.cursor);

        if self.cursor.is_at_end() {
            let pos = self.cursor.position();
            return Token::new(TokenKind::Eof, "", Span::at(pos));
        }

        let c = self.cursor.current_char();

        if c == '"' || c == '\'' {
            return lex_string(&mut self.cursor);
        }
        if c == '@' {
            return self.lex_accessor();
        }
        if c.is_ascii_digit() {
            return lex_number(&mut self.cursor);
        }
        if is_ident_start(c) {
            return lex_identifier(&mut self.cursor);
        }
        if is_operator_start(c) {
            return lex_operator(&mut self.cursor);
        }
        if PUNCTUATION.contains(&c) {
            let start = self.cursor.position();
            let ch = self.cursor.advance();
            let span = Span::new(start, self.cursor.position());
            return Token::new(TokenKind::Punctuation, ch.to_string(), span);
        }

        let start = self.cursor.position();
        let ch = self.cursor.advance();
        let span = Span::new(start, self.cursor.position());
        Token::new(TokenKind::Punctuation, ch.to_string(), span)
    }

    fn lex_accessor(&mut self) -> Token {
        let start = self.cursor.position();
        self.cursor.advance(); // '@'
        let mut name = String::new();
        if is_ident_start(self.cursor.current_char()) {
            name.push(self.cursor.advance());
            while is_ident_continue(self.cursor.current_char()) {
                name.push(self.cursor.advance());
            }
        }
        let span = Span::new(start, self.cursor.position());
        Token::new(TokenKind::Accessor, name, span)
    }

    /// Scans the entire source into a token vector, including the trailing
    /// `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
