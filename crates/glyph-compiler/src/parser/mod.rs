//! Recursive-descent parser producing a typed [`Module`].
//!
//! Top-level items are dispatched on their leading sigil (`:` type, `@`
//! route, `!` function/command, `*` cron, `~` event, `&` queue) or keyword
//! (`import`, `from`, `module`, `const`, `type`, `provider`). Grammar rules
//! live in the `grammar` submodules, each an `impl Parser` block.
//!
//! Structural failures abort the parse with a [`ParseError`]; there is no
//! error recovery, since the validation pipeline treats a parse failure as
//! fatal to everything downstream.

use glyph_ast::Module;

use crate::lexer::{Token, TokenKind};
use crate::source::LineIndex;

mod grammar;

/// A structural failure. The rendered message embeds `line N, column M`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    line_index: LineIndex,
}

impl<'src> Parser<'src> {
    /// `tokens` must end with an `Eof` token, as produced by
    /// [`tokenize`](crate::lexer::tokenize).
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenKind::Eof)
        ));
        Self {
            source,
            tokens,
            pos: 0,
            line_index: LineIndex::new(source),
        }
    }

    pub fn parse(mut self) -> Result<Module, ParseError> {
        self.parse_module()
    }

    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current_text(&self) -> &'src str {
        self.current().text(self.source)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consume the current token if it matches.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}, but found {}", self.describe_current())))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if self.check(TokenKind::Ident) {
            let text = self.current_text().to_owned();
            self.advance();
            Ok(text)
        } else {
            Err(self.error(format!(
                "expected identifier, but found {}",
                self.describe_current()
            )))
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline) {}
    }

    /// Error located at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(message, self.current())
    }

    fn error_at(&self, message: impl Into<String>, token: Token) -> ParseError {
        let (line, column) = self.line_index.line_col(token.span.start);
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// A short description of the current token for error messages.
    fn describe_current(&self) -> String {
        match self.kind() {
            TokenKind::Eof => "end of file".to_owned(),
            TokenKind::Newline => "end of line".to_owned(),
            _ => format!("'{}'", self.current_text()),
        }
    }
}
