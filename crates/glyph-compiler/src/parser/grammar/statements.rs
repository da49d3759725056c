//! Statement parsing.

use glyph_ast::Statement;

use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.kind() {
            TokenKind::Dollar => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(TokenKind::Equals, "'=' after variable name")?;
                let value = self.parse_expr()?;
                Ok(Statement::Assign { name, value })
            }
            TokenKind::Greater => {
                self.advance();
                if matches!(
                    self.kind(),
                    TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
                ) {
                    Ok(Statement::Return(None))
                } else {
                    Ok(Statement::Return(Some(self.parse_expr()?)))
                }
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                self.skip_newlines();
                let body = self.parse_block()?;
                Ok(Statement::While { cond, body })
            }
            TokenKind::For => {
                self.advance();
                let var = self.expect_ident()?;
                self.expect(TokenKind::In, "'in' after loop variable")?;
                let iter = self.parse_expr()?;
                self.skip_newlines();
                let body = self.parse_block()?;
                Ok(Statement::For { var, iter, body })
            }
            TokenKind::Break => {
                self.advance();
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Statement::Continue)
            }
            _ => Ok(Statement::Expr(self.parse_expr()?)),
        }
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::If, "'if'")?;
        let cond = self.parse_expr()?;
        self.skip_newlines();
        let then_branch = self.parse_block()?;

        let mut else_branch = Vec::new();
        if self.eat(TokenKind::Else) {
            self.skip_newlines();
            if self.check(TokenKind::If) {
                else_branch.push(self.parse_if_statement()?);
            } else {
                else_branch = self.parse_block()?;
            }
        }

        Ok(Statement::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `{ statements }` separated by newlines.
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::LBrace, "'{' to open block")?;
        self.skip_newlines();

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }

        self.expect(TokenKind::RBrace, "'}' to close block")?;
        Ok(statements)
    }
}
