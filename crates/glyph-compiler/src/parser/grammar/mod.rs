//! Grammar rules, split by category.

mod expressions;
mod items;
mod statements;
mod types;

#[cfg(test)]
mod statements_tests;

use glyph_ast::{Item, Module};

use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut items = Vec::new();

        while !self.at_end() {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            items.push(self.parse_item()?);
        }

        Ok(Module { items })
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.kind() {
            TokenKind::Colon => {
                self.advance();
                self.parse_type_def().map(Item::Type)
            }
            TokenKind::At => {
                self.advance();
                self.parse_at_item()
            }
            TokenKind::Bang => {
                self.advance();
                self.parse_bang_item()
            }
            TokenKind::Star => {
                self.advance();
                self.parse_cron_task().map(Item::Cron)
            }
            TokenKind::Tilde => {
                self.advance();
                self.parse_event_handler().map(Item::Event)
            }
            TokenKind::Ampersand => {
                self.advance();
                self.parse_queue_worker().map(Item::Queue)
            }
            TokenKind::Import => self.parse_plain_import().map(Item::Import),
            TokenKind::From => self.parse_selective_import().map(Item::Import),
            TokenKind::Module => self.parse_module_decl().map(Item::Module),
            TokenKind::Const => self.parse_const_decl().map(Item::Const),
            TokenKind::Ident => match self.current_text() {
                "type" => {
                    self.advance();
                    self.parse_type_def().map(Item::Type)
                }
                "provider" => {
                    self.advance();
                    self.parse_provider_def().map(Item::Provider)
                }
                other => Err(self.error(format!(
                    "unexpected token '{other}'; top-level items must start with \
                     ':', '@', '!', '*', '~', or '&'"
                ))),
            },
            _ => Err(self.error(format!(
                "unexpected token {}; top-level items must start with \
                 ':', '@', '!', '*', '~', or '&'",
                self.describe_current()
            ))),
        }
    }
}
