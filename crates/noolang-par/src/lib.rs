//! Recursive-descent parser for Noolang (spec.md §4.P): turns a token
//! stream from `noolang-lex` into a `noolang_ast::Program`.
//!
//! Grounded on `faxc-par`'s `Parser` cursor/backtracking skeleton, split
//! here into `cursor` (the combinator vocabulary), `pattern`, `types`, and
//! `expr` (the statement/expression grammar proper) rather than one
//! monolithic file.

mod cursor;
mod expr;
mod pattern;
mod types;

pub use expr::{parse_expr, parse_program};
pub use pattern::parse_pattern;
pub use types::{parse_constraint, parse_type};

use noolang_ast::{NodeIdGen, Program};
use noolang_util::ParseError;

/// Tokenizes and parses a complete source string in one step.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = noolang_lex::tokenize(source);
    parse_program(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noolang_ast::{BinaryOp, ExprKind, Literal, PatternKind};

    fn one(source: &str) -> noolang_ast::Expr {
        let program = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(program.statements.len(), 1, "expected exactly one statement");
        program.statements.into_iter().next().unwrap()
    }

    #[test]
    fn arithmetic_respects_precedence() {
        let expr = one("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, lhs, rhs } => {
                assert!(matches!(lhs.kind, ExprKind::Literal(Literal::Number(n)) if n == 1.0));
                match rhs.kind {
                    ExprKind::Binary { op: BinaryOp::Mul, .. } => {}
                    other => panic!("expected Mul on rhs, got {other:?}"),
                }
            }
            other => panic!("expected top-level Add, got {other:?}"),
        }
    }

    #[test]
    fn pipeline_is_looser_than_comparison() {
        let expr = one("x |> f");
        assert!(matches!(
            expr.kind,
            ExprKind::Binary { op: BinaryOp::PipeForward, .. }
        ));
    }

    #[test]
    fn application_collects_multiple_arguments() {
        let expr = one("f x y");
        match expr.kind {
            ExprKind::Application { func, args } => {
                assert!(matches!(func.kind, ExprKind::Variable(_)));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected Application, got {other:?}"),
        }
    }

    #[test]
    fn function_definition_with_two_params() {
        let expr = one("add = fn a b => a + b");
        match expr.kind {
            ExprKind::Definition { name, value } => {
                assert_eq!(name.as_str(), "add");
                match value.kind {
                    ExprKind::Function { params, .. } => assert_eq!(params.len(), 2),
                    other => panic!("expected Function, got {other:?}"),
                }
            }
            other => panic!("expected Definition, got {other:?}"),
        }
    }

    #[test]
    fn if_then_else_parses() {
        let expr = one("if x > 0 then 1 else 0");
        assert!(matches!(expr.kind, ExprKind::If { .. }));
    }

    #[test]
    fn match_with_constructor_patterns() {
        let expr = one("match opt with ( Some x => x; None => 0 )");
        match expr.kind {
            ExprKind::Match { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(matches!(cases[0].pattern.kind, PatternKind::Constructor(_, _)));
                assert!(matches!(cases[1].pattern.kind, PatternKind::Constructor(_, _)));
            }
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[test]
    fn record_literal_with_accessors() {
        let expr = one(r#"{ @name "ada", @age 42 }"#);
        match expr.kind {
            ExprKind::Record(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0.as_str(), "name");
            }
            other => panic!("expected Record, got {other:?}"),
        }
    }

    #[test]
    fn single_element_tuple_is_not_unwrapped() {
        let expr = one("{ 1 }");
        match expr.kind {
            ExprKind::Tuple(elements) => assert_eq!(elements.len(), 1),
            other => panic!("expected a one-element Tuple, got {other:?}"),
        }
    }

    #[test]
    fn empty_braces_are_unit() {
        let expr = one("{}");
        assert!(matches!(expr.kind, ExprKind::Unit));
    }

    #[test]
    fn list_literal_accepts_semicolon_separators() {
        let expr = one("[1; 2; 3]");
        match expr.kind {
            ExprKind::List(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn adt_type_definition_with_two_constructors() {
        let expr = one("type Option a = Some a | None");
        match expr.kind {
            ExprKind::TypeDefinition { name, type_params, constructors } => {
                assert_eq!(name.as_str(), "Option");
                assert_eq!(type_params.len(), 1);
                assert_eq!(constructors.len(), 2);
                assert_eq!(constructors[0].params.len(), 1);
                assert_eq!(constructors[1].params.len(), 0);
            }
            other => panic!("expected TypeDefinition, got {other:?}"),
        }
    }

    #[test]
    fn constraint_and_implement_blocks_parse() {
        let program = parse(
            "constraint Show a ( show : a -> String ); implement Show (Float) ( show = toString )",
        )
        .unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0].kind, ExprKind::ConstraintDefinition { .. }));
        assert!(matches!(program.statements[1].kind, ExprKind::ImplementDefinition { .. }));
    }

    #[test]
    fn implement_with_given_clause() {
        let expr = one("implement Show (List a) ( show = showList ) given a implements Show");
        match expr.kind {
            ExprKind::ImplementDefinition { given, .. } => assert!(given.is_some()),
            other => panic!("expected ImplementDefinition, got {other:?}"),
        }
    }

    #[test]
    fn tuple_destructuring_statement() {
        let expr = one("{ a, b } = pair");
        assert!(matches!(expr.kind, ExprKind::TupleDestructuring { .. }));
    }

    #[test]
    fn record_destructuring_statement() {
        let expr = one("{ @x x, @y y } = point");
        assert!(matches!(expr.kind, ExprKind::RecordDestructuring { .. }));
    }

    #[test]
    fn mutable_definition_and_mutation() {
        let program = parse("mut counter = 0; mut! counter = counter + 1").unwrap();
        assert!(matches!(program.statements[0].kind, ExprKind::MutableDefinition { .. }));
        assert!(matches!(program.statements[1].kind, ExprKind::Mutation { .. }));
    }

    #[test]
    fn type_ascription_with_given_constraint() {
        let expr = one("x : a given a is Num");
        assert!(matches!(expr.kind, ExprKind::Constrained { .. }));
    }

    #[test]
    fn where_clause_attaches_local_definitions() {
        let expr = one("result where ( result = 1 + 1 )");
        match expr.kind {
            ExprKind::Where { definitions, .. } => assert_eq!(definitions.len(), 1),
            other => panic!("expected Where, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_grouping_overrides_precedence() {
        let expr = one("(1 + 2) * 3");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Mul, lhs, .. } => {
                assert!(matches!(lhs.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("expected top-level Mul, got {other:?}"),
        }
    }

    #[test]
    fn import_statement() {
        let expr = one(r#"import "list.noo""#);
        assert!(matches!(expr.kind, ExprKind::Import { .. }));
    }

    #[test]
    fn accessor_standalone_is_a_function_value() {
        let expr = one("@name");
        assert!(matches!(expr.kind, ExprKind::Accessor(_)));
    }
}
