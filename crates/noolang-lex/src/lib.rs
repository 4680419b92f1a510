//! noolang-lex - turns Noolang source text into a token stream
//! (spec.md §3/§4, component L).

pub mod cursor;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{is_keyword, Token, TokenKind, KEYWORDS};

/// Tokenizes `source` in one shot. A thin convenience wrapper over
/// [`Lexer::tokenize`] for callers (the parser, `--tokens` CLI mode) that
/// don't need the streaming `next_token` interface.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_a_simple_let_binding() {
        let tokens = tokenize("let x = 1 + 2");
        assert_eq!(
            kinds(&tokens),
            vec![Keyword, Identifier, Operator, Number, Operator, Number, Eof]
        );
    }

    #[test]
    fn booleans_are_their_own_kind_not_keywords() {
        let tokens = tokenize("True");
        assert_eq!(tokens[0].kind, Boolean);
        assert_eq!(tokens[0].lexeme, "True");
    }

    #[test]
    fn mut_bang_fuses_into_one_keyword_token() {
        let tokens = tokenize("mut! x := 5");
        assert!(tokens[0].is_keyword("mut!"));
    }

    #[test]
    fn plain_mut_without_bang_stays_separate() {
        let tokens = tokenize("mut x = 5");
        assert!(tokens[0].is_keyword("mut"));
    }

    #[test]
    fn longest_match_wins_for_multi_char_operators() {
        let tokens = tokenize("a -> b");
        assert!(tokens[1].is_operator("->"));
    }

    #[test]
    fn number_dot_without_following_digit_is_not_consumed() {
        let tokens = tokenize("1.foo");
        assert_eq!(tokens[0].kind, Number);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, Punctuation);
        assert_eq!(tokens[1].lexeme, ".");
    }

    #[test]
    fn number_with_fractional_part() {
        let tokens = tokenize("3.14");
        assert_eq!(tokens[0].lexeme, "3.14");
    }

    #[test]
    fn string_literal_with_escaped_quote() {
        let tokens = tokenize(r#""a\"b""#);
        assert_eq!(tokens[0].kind, String);
        assert_eq!(tokens[0].lexeme, "a\"b");
    }

    #[test]
    fn unterminated_string_yields_partial_lexeme_without_erroring() {
        let tokens = tokenize("\"abc");
        assert_eq!(tokens[0].kind, String);
        assert_eq!(tokens[0].lexeme, "abc");
    }

    #[test]
    fn accessor_strips_the_at_sign() {
        let tokens = tokenize("@name");
        assert_eq!(tokens[0].kind, Accessor);
        assert_eq!(tokens[0].lexeme, "name");
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = tokenize("1 # comment\n2");
        assert_eq!(kinds(&tokens), vec![Number, Number, Eof]);
    }

    #[test]
    fn pipe_option_is_one_token_not_two() {
        let tokens = tokenize("xs |? f");
        assert!(tokens[1].is_operator("|?"));
    }
}
