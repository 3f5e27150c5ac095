use super::*;
use crate::ast::{BinOp, Expr, Stmt};

fn parse_str(input: &str) -> CompileResult<Program> {
    Parser::from_source(input).parse_program()
}

fn parse_expr(input: &str) -> Expr {
    let program = parse_str(&format!("print {};", input)).unwrap();
    let Stmt::Print { value } = &program[0].0 else {
        panic!("expected a print statement, got {:?}", program[0].0);
    };
    value.0.clone()
}

fn num(n: i32) -> Expr {
    Expr::Number(n)
}

fn var(name: &str) -> Expr {
    Expr::Variable(name.to_string())
}

// Drops spans so trees can be compared structurally.
#[derive(Debug, PartialEq)]
enum Shape {
    Leaf(Expr),
    Bin(BinOp, Box<Shape>, Box<Shape>),
}

fn shape(expr: &Expr) -> Shape {
    match expr {
        Expr::BinOp {
            operator,
            l_value,
            r_value,
        } => Shape::Bin(
            *operator,
            Box::new(shape(&l_value.0)),
            Box::new(shape(&r_value.0)),
        ),
        leaf => Shape::Leaf(leaf.clone()),
    }
}

fn bin(op: BinOp, l: Shape, r: Shape) -> Shape {
    Shape::Bin(op, Box::new(l), Box::new(r))
}

fn leaf(expr: Expr) -> Shape {
    Shape::Leaf(expr)
}

#[test]
fn test_parse_let_and_print() {
    let program = parse_str("let x = 5; print x;").unwrap();

    assert_eq!(program.len(), 2);
    assert_eq!(
        program[0].0,
        Stmt::Let {
            var: "x".to_string(),
            value: (num(5), 8..9),
        }
    );
    assert_eq!(program[0].1, 0..10);
    assert_eq!(
        program[1].0,
        Stmt::Print {
            value: (var("x"), 17..18),
        }
    );
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        shape(&parse_expr("a + b * c")),
        bin(
            BinOp::Add,
            leaf(var("a")),
            bin(BinOp::Mul, leaf(var("b")), leaf(var("c")))
        )
    );
    assert_eq!(
        shape(&parse_expr("a / b - c")),
        bin(
            BinOp::Sub,
            bin(BinOp::Div, leaf(var("a")), leaf(var("b"))),
            leaf(var("c"))
        )
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(
        shape(&parse_expr("a - b - c")),
        bin(
            BinOp::Sub,
            bin(BinOp::Sub, leaf(var("a")), leaf(var("b"))),
            leaf(var("c"))
        )
    );
    assert_eq!(
        shape(&parse_expr("8 / 4 / 2")),
        bin(
            BinOp::Div,
            bin(BinOp::Div, leaf(num(8)), leaf(num(4))),
            leaf(num(2))
        )
    );
}

#[test]
fn test_parentheses_reset_precedence() {
    assert_eq!(
        shape(&parse_expr("(a + b) * c")),
        bin(
            BinOp::Mul,
            bin(BinOp::Add, leaf(var("a")), leaf(var("b"))),
            leaf(var("c"))
        )
    );
    assert_eq!(
        shape(&parse_expr("a - (b - c)")),
        bin(
            BinOp::Sub,
            leaf(var("a")),
            bin(BinOp::Sub, leaf(var("b")), leaf(var("c")))
        )
    );
    assert_eq!(shape(&parse_expr("((7))")), leaf(num(7)));
}

#[test]
fn test_binop_span_covers_operands() {
    let program = parse_str("print 1 + 23;").unwrap();
    let Stmt::Print { value } = &program[0].0 else {
        panic!("expected print");
    };
    assert_eq!(value.1, 6..12);
}

#[test]
fn test_stray_semicolons_are_skipped() {
    let program = parse_str(";; let a = 1; ; print a;;").unwrap();
    assert_eq!(program.len(), 2);
    assert!(parse_str(";;;").unwrap().is_empty());
    assert!(parse_str("").unwrap().is_empty());
}

#[test]
fn test_statement_count_matches_keywords() {
    let input = "let a = 1; print a; let b = a * 2; ; print b + a; print 0;";
    let keywords = tokenize(input)
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::KeywordLet | TokenKind::KeywordPrint))
        .count();

    assert_eq!(parse_str(input).unwrap().len(), keywords);
}

#[test]
fn test_missing_assign() {
    let err = parse_str("let x 5;").unwrap_err();

    assert_eq!(err.code(), "Syntax Error");
    assert_eq!(err.span(), 6..7);
    assert!(err.to_string().contains("'='"), "{}", err);
    assert!(err.to_string().contains("'5'"), "{}", err);
}

#[test]
fn test_missing_identifier_after_let() {
    let err = parse_str("let = 5;").unwrap_err();

    assert_eq!(err.span(), 4..5);
    assert!(err.to_string().contains("expected identifier after 'let'"));
}

#[test]
fn test_missing_semicolon() {
    let err = parse_str("print 1 print 2;").unwrap_err();
    assert_eq!(err.span(), 8..13);

    let err = parse_str("let x = 1").unwrap_err();
    assert_eq!(err.span(), 9..9);
    assert!(err.to_string().contains("end of input"), "{}", err);
}

#[test]
fn test_unclosed_parenthesis() {
    let err = parse_str("print (1 + 2;").unwrap_err();

    assert_eq!(err.span(), 12..13);
    assert!(err.to_string().contains("')'"), "{}", err);
}

#[test]
fn test_unexpected_statement_start() {
    let err = parse_str("x = 1;").unwrap_err();
    assert_eq!(err.span(), 0..1);

    let err = parse_str("let a = 1; 42;").unwrap_err();
    assert_eq!(err.span(), 11..13);
}

#[test]
fn test_unknown_character_fails_in_expression() {
    let err = parse_str("print 1 + $;").unwrap_err();

    assert_eq!(err.span(), 10..11);
    assert!(err.to_string().contains("'$'"), "{}", err);
}

#[test]
fn test_missing_operand() {
    let err = parse_str("print 1 + ;").unwrap_err();
    assert_eq!(err.span(), 10..11);

    let err = parse_str("print;").unwrap_err();
    assert_eq!(err.span(), 5..6);
}

#[test]
fn test_literal_out_of_range() {
    let err = parse_str("print 99999999999;").unwrap_err();

    assert_eq!(
        err,
        CompileError::InvalidLiteral {
            text: "99999999999".to_string(),
            span: 6..17,
        }
    );
    assert_eq!(
        parse_expr("2147483647"),
        num(i32::MAX),
    );
}

#[test]
fn test_undeclared_variable_parses() {
    // name resolution happens during emission
    assert!(parse_str("print nowhere;").is_ok());
}

#[test]
fn test_parser_appends_missing_eof() {
    let mut tokens = tokenize("print 1;");
    tokens.pop();

    let program = Parser::new(tokens).parse_program().unwrap();
    assert_eq!(program.len(), 1);
    assert!(Parser::new(vec![]).parse_program().unwrap().is_empty());
}
