use glyph_ast::{BinOp, Expr, Item, Literal, Statement, UnOp};
use indoc::indoc;

use crate::lexer::tokenize;
use crate::parser::Parser;

/// Parses statements wrapped in a function body.
fn body(statements: &str) -> Vec<Statement> {
    let source = format!("! f() {{\n{statements}\n}}");
    let tokens = tokenize(&source).expect("tokenize failed");
    let module = Parser::new(&source, tokens).parse().expect("parse failed");
    let Item::Function(f) = module.items.into_iter().next().unwrap() else {
        panic!("expected function");
    };
    f.body
}

fn single(statements: &str) -> Statement {
    let mut stmts = body(statements);
    assert_eq!(stmts.len(), 1, "expected one statement: {stmts:?}");
    stmts.remove(0)
}

#[test]
fn assign_statement() {
    let stmt = single("$ user = db.find(id)");
    let Statement::Assign { name, value } = stmt else {
        panic!("expected assign");
    };
    assert_eq!(name, "user");
    assert!(matches!(value, Expr::Call { .. }));
}

#[test]
fn return_with_value() {
    let stmt = single("> user");
    assert_eq!(
        stmt,
        Statement::Return(Some(Expr::Variable("user".into())))
    );
}

#[test]
fn bare_return() {
    assert_eq!(single(">"), Statement::Return(None));
}

#[test]
fn return_empty_object_and_array() {
    assert_eq!(single("> {}"), Statement::Return(Some(Expr::Object(vec![]))));
    assert_eq!(single("> []"), Statement::Return(Some(Expr::Array(vec![]))));
}

#[test]
fn object_literal_entries() {
    let stmt = single(r#"> {message: "Hello", count: 2}"#);
    let Statement::Return(Some(Expr::Object(entries))) = stmt else {
        panic!("expected object return");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "message");
    assert_eq!(
        entries[0].1,
        Expr::Literal(Literal::Str("Hello".into()))
    );
}

#[test]
fn if_else_statement() {
    let stmt = single(indoc! {"
        if x > 1 {
          > x
        } else {
          > 0
        }
    "});
    let Statement::If {
        cond,
        then_branch,
        else_branch,
    } = stmt
    else {
        panic!("expected if");
    };
    assert!(matches!(cond, Expr::Binary { op: BinOp::Gt, .. }));
    assert_eq!(then_branch.len(), 1);
    assert_eq!(else_branch.len(), 1);
}

#[test]
fn else_if_chain() {
    let stmt = single(indoc! {"
        if a {
          > 1
        } else if b {
          > 2
        }
    "});
    let Statement::If { else_branch, .. } = stmt else {
        panic!("expected if");
    };
    assert_eq!(else_branch.len(), 1);
    assert!(matches!(else_branch[0], Statement::If { .. }));
}

#[test]
fn while_loop_with_break_and_continue() {
    let stmts = body(indoc! {"
        while x < 10 {
          $ x = x + 1
          break
          continue
        }
    "});
    let Statement::While { body, .. } = &stmts[0] else {
        panic!("expected while");
    };
    assert_eq!(body.len(), 3);
    assert_eq!(body[1], Statement::Break);
    assert_eq!(body[2], Statement::Continue);
}

#[test]
fn for_in_loop() {
    let stmt = single(indoc! {"
        for item in items {
          $ total = total + item
        }
    "});
    let Statement::For { var, iter, body } = stmt else {
        panic!("expected for");
    };
    assert_eq!(var, "item");
    assert_eq!(iter, Expr::Variable("items".into()));
    assert_eq!(body.len(), 1);
}

#[test]
fn expression_statement() {
    let stmt = single("log.info(msg)");
    assert!(matches!(stmt, Statement::Expr(Expr::Call { .. })));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let stmt = single("> 1 + 2 * 3");
    let Statement::Return(Some(Expr::Binary { op, lhs, rhs })) = stmt else {
        panic!("expected binary return");
    };
    assert_eq!(op, BinOp::Add);
    assert_eq!(*lhs, Expr::Literal(Literal::Int(1)));
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn comparison_binds_looser_than_arithmetic() {
    let stmt = single("> a + 1 >= b * 2");
    let Statement::Return(Some(Expr::Binary { op, .. })) = stmt else {
        panic!("expected binary return");
    };
    assert_eq!(op, BinOp::Ge);
}

#[test]
fn logical_operators_lowest_precedence() {
    let stmt = single("> a == 1 && b != 2 || c");
    let Statement::Return(Some(Expr::Binary { op, .. })) = stmt else {
        panic!("expected binary return");
    };
    assert_eq!(op, BinOp::Or);
}

#[test]
fn unary_operators() {
    assert_eq!(
        single("> !done"),
        Statement::Return(Some(Expr::Unary {
            op: UnOp::Not,
            operand: Box::new(Expr::Variable("done".into())),
        }))
    );
    assert_eq!(
        single("> -x"),
        Statement::Return(Some(Expr::Unary {
            op: UnOp::Neg,
            operand: Box::new(Expr::Variable("x".into())),
        }))
    );
}

#[test]
fn postfix_chain() {
    let stmt = single("> db.users.find(id)[0]");
    let Statement::Return(Some(Expr::Index { base, index })) = stmt else {
        panic!("expected index expression");
    };
    assert_eq!(*index, Expr::Literal(Literal::Int(0)));
    let Expr::Call { callee, args } = *base else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(*callee, Expr::FieldAccess { .. }));
}

#[test]
fn literals() {
    assert_eq!(
        single("> 3.14"),
        Statement::Return(Some(Expr::Literal(Literal::Float(3.14))))
    );
    assert_eq!(
        single("> true"),
        Statement::Return(Some(Expr::Literal(Literal::Bool(true))))
    );
    assert_eq!(
        single("> null"),
        Statement::Return(Some(Expr::Literal(Literal::Null)))
    );
}

#[test]
fn parenthesized_expression() {
    let stmt = single("> (1 + 2) * 3");
    let Statement::Return(Some(Expr::Binary { op, .. })) = stmt else {
        panic!("expected binary return");
    };
    assert_eq!(op, BinOp::Mul);
}

#[test]
fn array_literal_with_elements() {
    let stmt = single("> [1, 2, 3]");
    let Statement::Return(Some(Expr::Array(elements))) = stmt else {
        panic!("expected array return");
    };
    assert_eq!(elements.len(), 3);
}
