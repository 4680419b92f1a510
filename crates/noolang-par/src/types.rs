//! Type-expression and constraint-expression grammar (spec.md §4.P).

use indexmap::IndexMap;

use noolang_ast::{Constraint, Primitive, Type};
use noolang_lex::TokenKind;
use noolang_util::{ParseError, Symbol};

use crate::cursor::Cursor;

/// `expr : Type` / `expr : Type given <constraintExpr>` both parse a type
/// at this entry point, then the caller checks for a trailing `given`.
pub fn parse_type(cur: &mut Cursor<'_>) -> Result<Type, ParseError> {
    parse_function_type(cur)
}

/// `->` is right-associative and has the lowest precedence in type
/// position.
fn parse_function_type(cur: &mut Cursor<'_>) -> Result<Type, ParseError> {
    let first = parse_type_atom(cur)?;
    if cur.is_operator("->") {
        cur.advance();
        let ret = parse_function_type(cur)?;
        return Ok(Type::Function {
            params: vec![first],
            ret: Box::new(ret),
            effects: Default::default(),
            constraints: Vec::new(),
        });
    }
    Ok(first)
}

pub(crate) fn parse_type_atom(cur: &mut Cursor<'_>) -> Result<Type, ParseError> {
    if cur.is_punct("{") {
        return parse_record_or_tuple_type(cur);
    }
    if cur.is_punct("[") {
        return parse_bracket_list_type(cur);
    }

    let tok = cur.identifier()?;
    match tok.lexeme.as_str() {
        "Float" => Ok(Type::float()),
        "String" => Ok(Type::string()),
        "Bool" => Ok(Type::bool()),
        "Unknown" => Ok(Type::Unknown),
        "List" => {
            let elem = parse_type_atom(cur)?;
            Ok(Type::List(Box::new(elem)))
        }
        name => {
            // A named head applied to zero or more type arguments, e.g.
            // `Option Int`.
            let mut args = Vec::new();
            while can_start_type_atom(cur) {
                args.push(parse_type_atom(cur)?);
            }
            if args.is_empty() {
                Ok(Type::Variable(Symbol::intern(name), Vec::new()))
            } else {
                Ok(Type::Variant(Symbol::intern(name), args))
            }
        }
    }
}

pub(crate) fn can_start_type_atom(cur: &Cursor<'_>) -> bool {
    cur.peek().kind == TokenKind::Identifier || cur.is_punct("{") || cur.is_punct("[")
}

/// `List T` uses prefix notation, but `[T]` in a position with brackets is
/// used nowhere by the grammar — bracket groups only appear in value
/// position (list literals). This parses a parenthesized type group
/// written as `[...]` defensively, falling back to a single element list.
fn parse_bracket_list_type(cur: &mut Cursor<'_>) -> Result<Type, ParseError> {
    cur.punct("[")?;
    let elem = parse_type(cur)?;
    cur.punct("]")?;
    Ok(Type::List(Box::new(elem)))
}

/// `{ @name: T, ... }` is a record type; `{ T, T, ... }` is a tuple type;
/// `{}` is `Unit`.
fn parse_record_or_tuple_type(cur: &mut Cursor<'_>) -> Result<Type, ParseError> {
    cur.punct("{")?;
    if cur.is_punct("}") {
        cur.advance();
        return Ok(Type::Unit);
    }

    if cur.peek().kind == TokenKind::Accessor {
        let mut fields = IndexMap::new();
        loop {
            let acc = cur.token(TokenKind::Accessor, None)?;
            cur.punct(":")?;
            let ty = parse_type(cur)?;
            fields.insert(Symbol::intern(&acc.lexeme), ty);
            if cur.is_punct(",") {
                cur.advance();
            } else {
                break;
            }
        }
        cur.punct("}")?;
        return Ok(Type::Record(fields));
    }

    let mut elements = vec![parse_type(cur)?];
    while cur.is_punct(",") {
        cur.advance();
        elements.push(parse_type(cur)?);
    }
    cur.punct("}")?;
    Ok(Type::Tuple(elements))
}

/// Constraint-expression grammar (spec.md §4.P): atomic constraints `a is
/// C`, `a has {@field T, …}`, `a has field "name" of type T`, `a implements
/// I`, composed by `and`/`or` and grouped by parentheses.
pub fn parse_constraint(cur: &mut Cursor<'_>) -> Result<Constraint, ParseError> {
    parse_constraint_or(cur)
}

fn parse_constraint_or(cur: &mut Cursor<'_>) -> Result<Constraint, ParseError> {
    let mut lhs = parse_constraint_and(cur)?;
    while cur.is_keyword("or") {
        cur.advance();
        let rhs = parse_constraint_and(cur)?;
        lhs = Constraint::Or(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_constraint_and(cur: &mut Cursor<'_>) -> Result<Constraint, ParseError> {
    let mut lhs = parse_constraint_atom(cur)?;
    while cur.is_keyword("and") {
        cur.advance();
        let rhs = parse_constraint_atom(cur)?;
        lhs = Constraint::And(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_constraint_atom(cur: &mut Cursor<'_>) -> Result<Constraint, ParseError> {
    if cur.is_punct("(") {
        cur.advance();
        let inner = parse_constraint(cur)?;
        cur.punct(")")?;
        return Ok(Constraint::Paren(Box::new(inner)));
    }

    let var = cur.identifier()?;
    let var_sym = Symbol::intern(&var.lexeme);

    if cur.is_keyword("is") {
        cur.advance();
        let class = cur.identifier()?;
        return Ok(Constraint::Is(var_sym, Symbol::intern(&class.lexeme)));
    }

    if cur.is_keyword("implements") {
        cur.advance();
        let trait_name = cur.identifier()?;
        return Ok(Constraint::Implements(var_sym, Symbol::intern(&trait_name.lexeme)));
    }

    if cur.is_keyword("has") {
        cur.advance();
        if cur.is_punct("{") {
            cur.advance();
            let mut fields = Vec::new();
            loop {
                let acc = cur.token(TokenKind::Accessor, None)?;
                let ty = parse_type(cur)?;
                fields.push((Symbol::intern(&acc.lexeme), ty));
                if cur.is_punct(",") {
                    cur.advance();
                } else {
                    break;
                }
            }
            cur.punct("}")?;
            return Ok(Constraint::HasStructure(var_sym, fields));
        }
        cur.keyword("field")?;
        let name_tok = cur.token(TokenKind::String, None)?;
        cur.keyword("of")?;
        cur.keyword("type")?;
        let ty = parse_type(cur)?;
        return Ok(Constraint::HasField(var_sym, Symbol::intern(&name_tok.lexeme), Box::new(ty)));
    }

    // A custom, user-defined constraint: `a C arg1 arg2 ...`.
    let class = cur.identifier()?;
    let mut args = Vec::new();
    while can_start_type_atom(cur) {
        args.push(parse_type_atom(cur)?);
    }
    Ok(Constraint::Custom(var_sym, Symbol::intern(&class.lexeme), args))
}

/// Also exposes `Primitive` purely so callers constructing literal types
/// don't need a separate import path.
pub fn primitive_name(p: Primitive) -> &'static str {
    match p {
        Primitive::Float => "Float",
        Primitive::String => "String",
        Primitive::Bool => "Bool",
    }
}
