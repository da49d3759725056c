//! Type annotation parsing.

use glyph_ast::Type;

use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    /// Parses a type annotation plus its trailing `!` required marker.
    ///
    /// `int`, `str`/`string`, `bool`, `float` become primitive variants;
    /// `Database`, `Redis`, `MongoDB`, `LLM` become provider variants;
    /// everything else is a named reference. Postfix forms: `<args>`
    /// generic application, `?` optional, `| T` union. `[T]` is an array.
    pub(crate) fn parse_type(&mut self) -> Result<(Type, bool), ParseError> {
        let ty = self.parse_type_no_marker()?;
        let required = self.eat(TokenKind::Bang);
        Ok((ty, required))
    }

    pub(crate) fn parse_type_no_marker(&mut self) -> Result<Type, ParseError> {
        let first = self.parse_type_atom()?;

        if !self.check(TokenKind::Pipe) {
            return Ok(first);
        }

        let mut variants = vec![first];
        while self.eat(TokenKind::Pipe) {
            variants.push(self.parse_type_atom()?);
        }
        Ok(Type::Union(variants))
    }

    fn parse_type_atom(&mut self) -> Result<Type, ParseError> {
        let mut ty = if self.eat(TokenKind::LBracket) {
            let element = self.parse_type_no_marker()?;
            self.expect(TokenKind::RBracket, "']' to close array type")?;
            Type::Array(Box::new(element))
        } else {
            self.parse_type_name()?
        };

        if self.check(TokenKind::Less) {
            let args = self.parse_generic_args()?;
            ty = Type::Generic {
                base: Box::new(ty),
                args,
            };
        }

        if self.eat(TokenKind::Question) {
            ty = Type::Optional(Box::new(ty));
        }

        Ok(ty)
    }

    fn parse_type_name(&mut self) -> Result<Type, ParseError> {
        if !self.check(TokenKind::Ident) {
            return Err(self.error(format!(
                "expected type name, but found {}",
                self.describe_current()
            )));
        }
        let mut name = self.current_text().to_owned();
        self.advance();

        // Imported types are referenced by qualified name, e.g. `m.User`.
        while self.check(TokenKind::Dot) && self.peek_kind(1) == TokenKind::Ident {
            self.advance();
            name.push('.');
            name.push_str(self.current_text());
            self.advance();
        }

        Ok(match name.as_str() {
            "int" => Type::Int,
            "str" | "string" => Type::Str,
            "bool" => Type::Bool,
            "float" => Type::Float,
            "Database" => Type::Database,
            "Redis" => Type::Redis,
            "MongoDB" => Type::MongoDb,
            "LLM" => Type::Llm,
            _ => Type::Named(name),
        })
    }

    fn parse_generic_args(&mut self) -> Result<Vec<Type>, ParseError> {
        self.expect(TokenKind::Less, "'<'")?;
        let mut args = vec![self.parse_type_no_marker()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_type_no_marker()?);
        }
        self.expect(TokenKind::Greater, "'>' to close type arguments")?;
        Ok(args)
    }
}
