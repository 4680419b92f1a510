//! Renders a parsed `Program`/`Expr` tree as JSON text for the `--ast`/
//! `.ast-json` CLI and REPL modes (spec.md §6). The workspace carries no
//! serde dependency (none of the kept pipeline crates need one — see
//! DESIGN.md), so this is a small hand-rolled object/array/string builder
//! rather than a derive.

use noolang_ast::{
    Constraint, ConstructorDef, Expr, ExprKind, Literal, MatchCase, Pattern, PatternKind, Program,
    Type,
};
use noolang_util::Symbol;

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn sym(s: Symbol) -> String {
    escape(s.as_str())
}

/// Builds a `{"node": "<kind>", ...fields}` object from already-rendered
/// `"key": value` field strings.
fn object(node: &str, fields: &[String]) -> String {
    if fields.is_empty() {
        format!("{{\"node\": {}}}", escape(node))
    } else {
        format!("{{\"node\": {}, {}}}", escape(node), fields.join(", "))
    }
}

fn array<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    format!("[{}]", items.iter().map(f).collect::<Vec<_>>().join(", "))
}

pub fn program_to_json(program: &Program) -> String {
    array(&program.statements, expr_to_json)
}

pub fn expr_to_json(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(lit) => object("Literal", &[format!("\"value\": {}", literal_to_json(lit))]),
        ExprKind::Variable(name) => object("Variable", &[format!("\"name\": {}", sym(*name))]),
        ExprKind::Function { params, body } => object(
            "Function",
            &[
                format!("\"params\": {}", array(params, |p| sym(*p))),
                format!("\"body\": {}", expr_to_json(body)),
            ],
        ),
        ExprKind::Application { func, args } => object(
            "Application",
            &[format!("\"func\": {}", expr_to_json(func)), format!("\"args\": {}", array(args, expr_to_json))],
        ),
        ExprKind::Binary { op, lhs, rhs } => object(
            "Binary",
            &[
                format!("\"op\": {}", escape(op.symbol())),
                format!("\"lhs\": {}", expr_to_json(lhs)),
                format!("\"rhs\": {}", expr_to_json(rhs)),
            ],
        ),
        ExprKind::If { cond, then_branch, else_branch } => object(
            "If",
            &[
                format!("\"cond\": {}", expr_to_json(cond)),
                format!("\"then\": {}", expr_to_json(then_branch)),
                format!("\"else\": {}", expr_to_json(else_branch)),
            ],
        ),
        ExprKind::Definition { name, value } => object(
            "Definition",
            &[format!("\"name\": {}", sym(*name)), format!("\"value\": {}", expr_to_json(value))],
        ),
        ExprKind::MutableDefinition { name, value } => object(
            "MutableDefinition",
            &[format!("\"name\": {}", sym(*name)), format!("\"value\": {}", expr_to_json(value))],
        ),
        ExprKind::Mutation { name, value } => object(
            "Mutation",
            &[format!("\"name\": {}", sym(*name)), format!("\"value\": {}", expr_to_json(value))],
        ),
        ExprKind::TupleDestructuring { pattern, value } => object(
            "TupleDestructuring",
            &[format!("\"pattern\": {}", pattern_to_json(pattern)), format!("\"value\": {}", expr_to_json(value))],
        ),
        ExprKind::RecordDestructuring { pattern, value } => object(
            "RecordDestructuring",
            &[format!("\"pattern\": {}", pattern_to_json(pattern)), format!("\"value\": {}", expr_to_json(value))],
        ),
        ExprKind::Import { path } => object("Import", &[format!("\"path\": {}", escape(path))]),
        ExprKind::Record(fields) => object(
            "Record",
            &[format!(
                "\"fields\": [{}]",
                fields
                    .iter()
                    .map(|(name, value)| format!("{{\"name\": {}, \"value\": {}}}", sym(*name), expr_to_json(value)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        ),
        ExprKind::Tuple(elements) => object("Tuple", &[format!("\"elements\": {}", array(elements, expr_to_json))]),
        ExprKind::Unit => object("Unit", &[]),
        ExprKind::Accessor(field) => object("Accessor", &[format!("\"field\": {}", sym(*field))]),
        ExprKind::List(elements) => object("List", &[format!("\"elements\": {}", array(elements, expr_to_json))]),
        ExprKind::Where { main, definitions } => object(
            "Where",
            &[
                format!("\"main\": {}", expr_to_json(main)),
                format!("\"definitions\": {}", array(definitions, expr_to_json)),
            ],
        ),
        ExprKind::Typed { expr: inner, ty } => object(
            "Typed",
            &[format!("\"expr\": {}", expr_to_json(inner)), format!("\"type\": {}", type_to_json(ty))],
        ),
        ExprKind::Constrained { expr: inner, ty, constraint } => object(
            "Constrained",
            &[
                format!("\"expr\": {}", expr_to_json(inner)),
                format!("\"type\": {}", type_to_json(ty)),
                format!("\"constraint\": {}", constraint_to_json(constraint)),
            ],
        ),
        ExprKind::TypeDefinition { name, type_params, constructors } => object(
            "TypeDefinition",
            &[
                format!("\"name\": {}", sym(*name)),
                format!("\"typeParams\": {}", array(type_params, |p| sym(*p))),
                format!("\"constructors\": {}", array(constructors, constructor_def_to_json)),
            ],
        ),
        ExprKind::Match { scrutinee, cases } => object(
            "Match",
            &[
                format!("\"scrutinee\": {}", expr_to_json(scrutinee)),
                format!("\"cases\": {}", array(cases, match_case_to_json)),
            ],
        ),
        ExprKind::ConstraintDefinition { name, type_param, functions } => object(
            "ConstraintDefinition",
            &[
                format!("\"name\": {}", sym(*name)),
                format!("\"typeParam\": {}", sym(*type_param)),
                format!(
                    "\"functions\": [{}]",
                    functions
                        .iter()
                        .map(|f| format!("{{\"name\": {}, \"signature\": {}}}", sym(f.name), type_to_json(&f.signature)))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ],
        ),
        ExprKind::ImplementDefinition { constraint_name, type_expr, given, functions } => object(
            "ImplementDefinition",
            &[
                format!("\"constraintName\": {}", sym(*constraint_name)),
                format!("\"type\": {}", type_to_json(type_expr)),
                format!(
                    "\"given\": {}",
                    given.as_ref().map(constraint_to_json).unwrap_or_else(|| "null".to_string())
                ),
                format!(
                    "\"functions\": [{}]",
                    functions
                        .iter()
                        .map(|f| format!("{{\"name\": {}, \"body\": {}}}", sym(f.name), expr_to_json(&f.body)))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ],
        ),
        ExprKind::Ffi { module, name } => {
            object("Ffi", &[format!("\"module\": {}", sym(*module)), format!("\"name\": {}", sym(*name))])
        }
    }
}

fn literal_to_json(lit: &Literal) -> String {
    match lit {
        Literal::Number(n) => n.to_string(),
        Literal::String(s) => escape(s),
        Literal::Bool(b) => b.to_string(),
        Literal::Unit => "null".to_string(),
    }
}

fn match_case_to_json(case: &MatchCase) -> String {
    format!("{{\"pattern\": {}, \"body\": {}}}", pattern_to_json(&case.pattern), expr_to_json(&case.body))
}

fn constructor_def_to_json(def: &ConstructorDef) -> String {
    format!("{{\"name\": {}, \"params\": {}}}", sym(def.name), array(&def.params, type_to_json))
}

fn pattern_to_json(pattern: &Pattern) -> String {
    match &pattern.kind {
        PatternKind::Constructor(name, args) => {
            object("Constructor", &[format!("\"name\": {}", sym(*name)), format!("\"args\": {}", array(args, pattern_to_json))])
        }
        PatternKind::Variable(name) => object("Variable", &[format!("\"name\": {}", sym(*name))]),
        PatternKind::Literal(lit) => object("Literal", &[format!("\"value\": {}", literal_to_json(lit))]),
        PatternKind::Wildcard => object("Wildcard", &[]),
        PatternKind::Tuple(elems) => object("Tuple", &[format!("\"elements\": {}", array(elems, pattern_to_json))]),
        PatternKind::Record(fields) => object(
            "Record",
            &[format!(
                "\"fields\": [{}]",
                fields
                    .iter()
                    .map(|(name, p)| format!("{{\"name\": {}, \"pattern\": {}}}", sym(*name), pattern_to_json(p)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        ),
    }
}

fn type_to_json(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => object("Primitive", &[format!("\"name\": {}", escape(&format!("{p:?}")))]),
        Type::Variable(name, constraints) => object(
            "Variable",
            &[format!("\"name\": {}", sym(*name)), format!("\"constraints\": {}", array(constraints, constraint_to_json))],
        ),
        Type::Function { params, ret, effects, constraints } => object(
            "Function",
            &[
                format!("\"params\": {}", array(params, type_to_json)),
                format!("\"ret\": {}", type_to_json(ret)),
                format!("\"effects\": {}", array(&effects.iter().collect::<Vec<_>>(), |e| escape(&e.to_string()))),
                format!("\"constraints\": {}", array(constraints, constraint_to_json)),
            ],
        ),
        Type::List(elem) => object("List", &[format!("\"elem\": {}", type_to_json(elem))]),
        Type::Tuple(elems) => object("Tuple", &[format!("\"elements\": {}", array(elems, type_to_json))]),
        Type::Record(fields) => object(
            "Record",
            &[format!(
                "\"fields\": [{}]",
                fields
                    .iter()
                    .map(|(name, t)| format!("{{\"name\": {}, \"type\": {}}}", sym(*name), type_to_json(t)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        ),
        Type::Variant(name, args) => {
            object("Variant", &[format!("\"name\": {}", sym(*name)), format!("\"args\": {}", array(args, type_to_json))])
        }
        Type::Adt { name, type_params, constructors } => object(
            "Adt",
            &[
                format!("\"name\": {}", sym(*name)),
                format!("\"typeParams\": {}", array(type_params, |p| sym(*p))),
                format!("\"constructors\": {}", array(constructors, constructor_def_to_json)),
            ],
        ),
        Type::Union(tys) => object("Union", &[format!("\"types\": {}", array(tys, type_to_json))]),
        Type::Unit => object("Unit", &[]),
        Type::Unknown => object("Unknown", &[]),
    }
}

fn constraint_to_json(c: &Constraint) -> String {
    match c {
        Constraint::Is(var, class) => {
            object("Is", &[format!("\"var\": {}", sym(*var)), format!("\"class\": {}", sym(*class))])
        }
        Constraint::HasField(var, field, ty) => object(
            "HasField",
            &[format!("\"var\": {}", sym(*var)), format!("\"field\": {}", sym(*field)), format!("\"type\": {}", type_to_json(ty))],
        ),
        Constraint::HasStructure(var, fields) => object(
            "HasStructure",
            &[format!(
                "\"var\": {}",
                sym(*var)
            ), format!(
                "\"fields\": [{}]",
                fields
                    .iter()
                    .map(|(name, t)| format!("{{\"name\": {}, \"type\": {}}}", sym(*name), type_to_json(t)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        ),
        Constraint::Implements(var, trait_name) => {
            object("Implements", &[format!("\"var\": {}", sym(*var)), format!("\"trait\": {}", sym(*trait_name))])
        }
        Constraint::Custom(var, name, args) => object(
            "Custom",
            &[format!("\"var\": {}", sym(*var)), format!("\"name\": {}", sym(*name)), format!("\"args\": {}", array(args, type_to_json))],
        ),
        Constraint::And(l, r) => {
            object("And", &[format!("\"left\": {}", constraint_to_json(l)), format!("\"right\": {}", constraint_to_json(r))])
        }
        Constraint::Or(l, r) => {
            object("Or", &[format!("\"left\": {}", constraint_to_json(l)), format!("\"right\": {}", constraint_to_json(r))])
        }
        Constraint::Paren(inner) => object("Paren", &[format!("\"inner\": {}", constraint_to_json(inner))]),
    }
}
