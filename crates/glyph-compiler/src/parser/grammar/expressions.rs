//! Expression parsing: precedence climbing over a small operator table.

use glyph_ast::{BinOp, Expr, Literal, UnOp};

use crate::lexer::{TokenKind, unescape};
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        while let Some((op, precedence)) = self.current_binary_op() {
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(precedence + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn current_binary_op(&self) -> Option<(BinOp, u8)> {
        let entry = match self.kind() {
            TokenKind::OrOr => (BinOp::Or, 1),
            TokenKind::AndAnd => (BinOp::And, 2),
            TokenKind::EqEq => (BinOp::Eq, 3),
            TokenKind::NotEq => (BinOp::Ne, 3),
            TokenKind::Less => (BinOp::Lt, 4),
            TokenKind::LessEq => (BinOp::Le, 4),
            TokenKind::Greater => (BinOp::Gt, 4),
            TokenKind::GreaterEq => (BinOp::Ge, 4),
            TokenKind::Plus => (BinOp::Add, 5),
            TokenKind::Minus => (BinOp::Sub, 5),
            TokenKind::Star => (BinOp::Mul, 6),
            TokenKind::Slash => (BinOp::Div, 6),
            TokenKind::Percent => (BinOp::Mod, 6),
            _ => return None,
        };
        Some(entry)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.kind() {
            TokenKind::Bang => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Field access, calls, and indexing bind tighter than any operator.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident()?;
                    expr = Expr::FieldAccess {
                        base: Box::new(expr),
                        field,
                    };
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "']' to close index")?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) && !self.at_end() {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' to close call arguments")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.kind() {
            TokenKind::Int => {
                let value = self
                    .current_text()
                    .parse()
                    .map_err(|_| self.error("invalid integer literal"))?;
                self.advance();
                Ok(Expr::Literal(Literal::Int(value)))
            }
            TokenKind::Float => {
                let value = self
                    .current_text()
                    .parse()
                    .map_err(|_| self.error("invalid float literal"))?;
                self.advance();
                Ok(Expr::Literal(Literal::Float(value)))
            }
            TokenKind::Str => {
                let value = unescape(self.current_text());
                self.advance();
                Ok(Expr::Literal(Literal::Str(value)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Ident => {
                let name = self.current_text().to_owned();
                self.advance();
                Ok(Expr::Variable(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')' to close expression")?;
                Ok(expr)
            }
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            _ => Err(self.error(format!(
                "expected expression, but found {}",
                self.describe_current()
            ))),
        }
    }

    /// `{key: value, ...}` - keys are identifiers or strings; entries may
    /// be separated by commas or newlines.
    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_newlines();

        let mut entries = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            let key = if self.check(TokenKind::Str) {
                let key = unescape(self.current_text());
                self.advance();
                key
            } else {
                self.expect_ident()?
            };
            self.expect(TokenKind::Colon, "':' after object key")?;
            let value = self.parse_expr()?;
            entries.push((key, value));

            self.eat(TokenKind::Comma);
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close object literal")?;
        Ok(Expr::Object(entries))
    }

    /// `[a, b, c]`
    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBracket, "'['")?;
        self.skip_newlines();

        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) && !self.at_end() {
            elements.push(self.parse_expr()?);
            self.eat(TokenKind::Comma);
            self.skip_newlines();
        }

        self.expect(TokenKind::RBracket, "']' to close array literal")?;
        Ok(Expr::Array(elements))
    }
}
