//! Lexer for Glyph source.
//!
//! Produces span-based tokens without storing text - text is sliced from
//! source only when needed. Whitespace and comments (`# ...` and `// ...`)
//! are skipped; newlines are significant and emitted as tokens because
//! Glyph's top-level grammar is line-oriented.
//!
//! Tokenization is all-or-nothing: the first lexical failure aborts with a
//! [`LexError`] carrying the line/column of the offending input.

use logos::Logos;

use crate::source::{LineIndex, Span};


/// All token kinds. `Eof` is never produced by Logos; `tokenize` appends it.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
pub enum TokenKind {
    #[token("\n")]
    Newline,

    #[token("@")]
    At,
    #[token(":")]
    Colon,
    #[token("$")]
    Dollar,
    #[token("+")]
    Plus,
    #[token("->")]
    Arrow,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(">=")]
    GreaterEq,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEq,
    #[token("<")]
    Less,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Equals,
    #[token("?")]
    Question,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AndAnd,
    #[token("&")]
    Ampersand,
    #[token("||")]
    OrOr,
    #[token("|>")]
    PipeOp,
    #[token("|")]
    Pipe,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("...")]
    DotDotDot,
    #[token(".")]
    Dot,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("import")]
    Import,
    #[token("from")]
    From,
    #[token("as")]
    As,
    #[token("module")]
    Module,
    #[token("const")]
    Const,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    Str,

    /// End of input sentinel, appended by [`tokenize`].
    Eof,
}

/// Zero-copy token: kind + span; text is sliced from source on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.range()]
    }
}

/// A lexical failure. The rendered message embeds `line N, column M` so
/// downstream consumers that only see the text can still locate it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedCharacter { ch: char, line: u32, column: u32 },
}

/// Tokenizes source into a vector of span-based tokens, ending with `Eof`.
///
/// The first unlexable input aborts tokenization. A stray quote means the
/// string regex could not reach a closing quote on the same line, so it is
/// reported as an unterminated string rather than a bad character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => {
                let index = LineIndex::new(source);
                let (line, column) = index.line_col(span.start);
                let ch = source[span.range()].chars().next().unwrap_or('\0');
                return Err(if ch == '"' || ch == '\'' {
                    LexError::UnterminatedString { line, column }
                } else {
                    LexError::UnexpectedCharacter { ch, line, column }
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(source.len(), source.len()),
    });
    Ok(tokens)
}

/// Strips the surrounding quotes from a string token's text and processes
/// escape sequences. Unknown escapes keep the escaped character, matching
/// the reference lexer.
pub fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
