//! Typed diagnostics: the closed error taxonomy and the diagnostic record.

use serde::{Deserialize, Serialize};

/// The fixed diagnostic taxonomy. Wire names are stable snake_case strings.
///
/// Four kinds (`TypeMismatch`, `MissingRequired`, `UnusedDefinition`,
/// `DeprecatedUsage`, `InvalidType`) are reserved for future analyses and
/// never emitted by the current pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SyntaxError,
    LexerError,
    UndefinedReference,
    TypeMismatch,
    DuplicateDefinition,
    MissingRequired,
    UnusedDefinition,
    DeprecatedUsage,
    InvalidRoute,
    InvalidType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "syntax_error",
            ErrorKind::LexerError => "lexer_error",
            ErrorKind::UndefinedReference => "undefined_reference",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::DuplicateDefinition => "duplicate_definition",
            ErrorKind::MissingRequired => "missing_required",
            ErrorKind::UnusedDefinition => "unused_definition",
            ErrorKind::DeprecatedUsage => "deprecated_usage",
            ErrorKind::InvalidRoute => "invalid_route",
            ErrorKind::InvalidType => "invalid_type",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity is fixed at the point a diagnostic is constructed; there is no
/// promotion or demotion afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A source location, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// One diagnostic: a typed, located, hinted finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    /// The trimmed source line at `location.line`, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub severity: Severity,
    /// Free-text cross-reference, e.g. the containing route or type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
}

impl ValidationError {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, message, Severity::Error)
    }

    pub fn warning(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, message, Severity::Warning)
    }

    fn new(kind: ErrorKind, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            fix_hint: None,
            context: None,
            severity,
            related_to: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related_to = Some(related.into());
        self
    }
}
