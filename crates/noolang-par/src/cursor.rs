//! Token-stream cursor and the combinator vocabulary spec.md §4.P names:
//! `token`, `anyToken`, `seq`, `choice`, `many`, `many1`, `optional`,
//! `sepBy`. Grounded on `faxc-par`'s recursive-descent `Parser` (position +
//! prev_position cursor, `expect`/`match_token` helpers), generalized from
//! a fixed token-kind match into small generic combinator methods so the
//! grammar functions in `expr.rs`/`types.rs`/`pattern.rs` read close to the
//! EBNF in spec.md §4.P.

use noolang_lex::{Token, TokenKind};
use noolang_util::{ErrorInfo, ParseError, Span};

pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    last_span: Span,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let last_span = tokens.first().map(|t| t.span).unwrap_or_default();
        Self { tokens, pos: 0, last_span }
    }

    /// The span of the most recently consumed token — used to compute the
    /// end of a node's span after its trailing tokens have been consumed.
    pub fn last_span(&self) -> Span {
        self.last_span
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.last_span = tok.span;
        tok
    }

    pub fn span(&self) -> Span {
        self.peek().span
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { message: message.into(), info: ErrorInfo::at(self.span()) }
    }

    /// The `token` combinator: succeeds only when the current token has
    /// `kind` and, if given, `lexeme == value`.
    pub fn token(&mut self, kind: TokenKind, value: Option<&str>) -> Result<Token, ParseError> {
        let tok = self.peek();
        let matches = tok.kind == kind && value.map_or(true, |v| tok.lexeme == v);
        if matches {
            Ok(self.advance())
        } else {
            let expected = match value {
                Some(v) => format!("{kind:?} '{v}'"),
                None => format!("{kind:?}"),
            };
            Err(self.error(format!(
                "Expected {expected}, but got {:?} '{}'",
                tok.kind, tok.lexeme
            )))
        }
    }

    pub fn keyword(&mut self, word: &str) -> Result<Token, ParseError> {
        self.token(TokenKind::Keyword, Some(word))
    }

    pub fn punct(&mut self, p: &str) -> Result<Token, ParseError> {
        self.token(TokenKind::Punctuation, Some(p))
    }

    pub fn operator(&mut self, op: &str) -> Result<Token, ParseError> {
        self.token(TokenKind::Operator, Some(op))
    }

    pub fn identifier(&mut self) -> Result<Token, ParseError> {
        self.token(TokenKind::Identifier, None)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.peek().is_keyword(word)
    }

    pub fn is_punct(&self, p: &str) -> bool {
        self.peek().is_punct(p)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.peek().is_operator(op)
    }

    /// The `choice` combinator: tries `f`, rewinding on failure so the
    /// caller can try the next alternative.
    pub fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let start = self.pos;
        match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    /// The `many` combinator: zero or more, stopping at the first failure
    /// (which is discarded, not propagated).
    pub fn many<T>(&mut self, mut f: impl FnMut(&mut Self) -> Result<T, ParseError>) -> Vec<T> {
        let mut out = Vec::new();
        loop {
            let start = self.pos;
            match f(self) {
                Ok(v) => out.push(v),
                Err(_) => {
                    self.pos = start;
                    break;
                }
            }
        }
        out
    }

    /// The `sepBy` combinator: zero or more `f`, separated by punctuation
    /// `sep`.
    pub fn sep_by<T>(
        &mut self,
        sep: &str,
        mut f: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut out = Vec::new();
        let start = self.pos;
        match f(self) {
            Ok(v) => out.push(v),
            Err(_) => {
                self.pos = start;
                return Ok(out);
            }
        }
        while self.is_punct(sep) {
            self.advance();
            out.push(f(self)?);
        }
        Ok(out)
    }

    /// The `optional` combinator.
    pub fn optional<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        self.try_parse(f).ok()
    }
}
