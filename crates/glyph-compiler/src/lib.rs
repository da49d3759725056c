//! Glyph compiler front-end: lexer, parser, module resolution, and the
//! semantic validation pipeline.
//!
//! - `lexer` - source text to tokens
//! - `parser` - tokens to a typed [`glyph_ast::Module`]
//! - `modules` - import resolution across files
//! - `validate` - the validation pipeline: cross-checks type references,
//!   provider injections, route definitions and imports, and produces a
//!   structured diagnostic report
//! - `source` - byte-offset to line/column mapping
//!
//! The typical entry point is [`Validator`]:
//!
//! ```
//! use glyph_compiler::Validator;
//!
//! let source = ": User { id: int! }";
//! let result = Validator::new(source, "user.glyph").validate();
//! assert!(result.valid);
//! ```

pub mod lexer;
pub mod modules;
pub mod parser;
pub mod source;
pub mod validate;

pub use lexer::{LexError, Token, TokenKind, tokenize};
pub use modules::{LoadedModule, ModuleError, ModuleResolver};
pub use parser::{ParseError, Parser};
pub use validate::{
    ErrorKind, Location, Severity, ValidationError, ValidationResult, ValidationStats, Validator,
};
