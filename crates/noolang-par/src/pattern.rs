//! Pattern grammar (spec.md §3/§4.E): used by `match` arms, destructuring
//! definitions, and function parameters in principle (function params are
//! plain names in Noolang — see spec.md §3's `Function(params[], body)`).

use noolang_ast::{NodeIdGen, Pattern, PatternKind};
use noolang_lex::TokenKind;
use noolang_util::{ParseError, Symbol};

use crate::cursor::Cursor;

pub fn parse_pattern(cur: &mut Cursor<'_>, ids: &mut NodeIdGen) -> Result<Pattern, ParseError> {
    let start = cur.span();

    if cur.is_punct("{") {
        return parse_tuple_or_record_pattern(cur, ids);
    }

    if cur.peek().kind == TokenKind::Identifier {
        let tok = cur.identifier()?;
        if tok.lexeme == "_" {
            return Ok(Pattern { id: ids.next_pattern(), kind: PatternKind::Wildcard, span: tok.span });
        }
        // An uppercase-leading identifier followed by further atoms is a
        // constructor pattern; otherwise it's a variable binding.
        let starts_upper = tok.lexeme.chars().next().map_or(false, char::is_uppercase);
        if starts_upper {
            let mut args = Vec::new();
            while can_start_pattern_atom(cur) {
                args.push(parse_pattern_atom(cur, ids)?);
            }
            let span = start.to(cur.peek_at(0).span);
            return Ok(Pattern {
                id: ids.next_pattern(),
                kind: PatternKind::Constructor(Symbol::intern(&tok.lexeme), args),
                span,
            });
        }
        return Ok(Pattern {
            id: ids.next_pattern(),
            kind: PatternKind::Variable(Symbol::intern(&tok.lexeme)),
            span: tok.span,
        });
    }

    if cur.peek().kind == TokenKind::Number
        || cur.peek().kind == TokenKind::String
        || cur.peek().kind == TokenKind::Boolean
    {
        return parse_literal_pattern(cur, ids);
    }

    Err(cur.token(TokenKind::Identifier, None).unwrap_err())
}

fn can_start_pattern_atom(cur: &Cursor<'_>) -> bool {
    matches!(
        cur.peek().kind,
        TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Boolean
    ) || cur.is_punct("{")
}

fn parse_pattern_atom(cur: &mut Cursor<'_>, ids: &mut NodeIdGen) -> Result<Pattern, ParseError> {
    if cur.is_punct("{") {
        return parse_tuple_or_record_pattern(cur, ids);
    }
    if cur.peek().kind == TokenKind::Identifier {
        let tok = cur.identifier()?;
        let kind = if tok.lexeme == "_" {
            PatternKind::Wildcard
        } else if tok.lexeme.chars().next().map_or(false, char::is_uppercase) {
            PatternKind::Constructor(Symbol::intern(&tok.lexeme), Vec::new())
        } else {
            PatternKind::Variable(Symbol::intern(&tok.lexeme))
        };
        return Ok(Pattern { id: ids.next_pattern(), kind, span: tok.span });
    }
    parse_literal_pattern(cur, ids)
}

fn parse_literal_pattern(cur: &mut Cursor<'_>, ids: &mut NodeIdGen) -> Result<Pattern, ParseError> {
    use noolang_ast::Literal;
    let tok = cur.advance();
    let (kind, span) = match tok.kind {
        TokenKind::Number => {
            let n: f64 = tok.lexeme.parse().unwrap_or(0.0);
            (PatternKind::Literal(Literal::Number(n)), tok.span)
        }
        TokenKind::String => (PatternKind::Literal(Literal::String(tok.lexeme.clone())), tok.span),
        TokenKind::Boolean => {
            (PatternKind::Literal(Literal::Bool(tok.lexeme == "True")), tok.span)
        }
        _ => {
            return Err(ParseError {
                message: format!("Expected a pattern, but got {:?} '{}'", tok.kind, tok.lexeme),
                info: noolang_util::ErrorInfo::at(tok.span),
            })
        }
    };
    Ok(Pattern { id: ids.next_pattern(), kind, span })
}

/// `{ p, p, ... }` is a tuple pattern; `{ @name p, ... }` is a record
/// pattern; `{}` matches the unit value via an empty tuple pattern.
fn parse_tuple_or_record_pattern(
    cur: &mut Cursor<'_>,
    ids: &mut NodeIdGen,
) -> Result<Pattern, ParseError> {
    let open = cur.punct("{")?;
    if cur.is_punct("}") {
        let close = cur.advance();
        return Ok(Pattern {
            id: ids.next_pattern(),
            kind: PatternKind::Tuple(Vec::new()),
            span: open.span.to(close.span),
        });
    }

    if cur.peek().kind == TokenKind::Accessor {
        let mut fields = Vec::new();
        loop {
            let acc = cur.token(TokenKind::Accessor, None)?;
            let field_pattern = parse_pattern(cur, ids)?;
            fields.push((Symbol::intern(&acc.lexeme), field_pattern));
            if cur.is_punct(",") {
                cur.advance();
            } else {
                break;
            }
        }
        let close = cur.punct("}")?;
        return Ok(Pattern {
            id: ids.next_pattern(),
            kind: PatternKind::Record(fields),
            span: open.span.to(close.span),
        });
    }

    let mut elements = vec![parse_pattern(cur, ids)?];
    while cur.is_punct(",") {
        cur.advance();
        elements.push(parse_pattern(cur, ids)?);
    }
    let close = cur.punct("}")?;
    Ok(Pattern {
        id: ids.next_pattern(),
        kind: PatternKind::Tuple(elements),
        span: open.span.to(close.span),
    })
}
