//! The semantic validation pipeline.
//!
//! [`Validator::validate`] runs phases strictly in order: tokenize, parse,
//! import resolution, definition collection (pass 1), reference validation
//! (pass 2), cross-cutting structural checks, stats. A failure in either of
//! the first two phases short-circuits everything downstream and yields
//! exactly one diagnostic; semantic findings are cumulative and never abort
//! the walk.
//!
//! One `validate()` call owns all of its mutable state; results are plain
//! values. Validating many files in parallel is safe as long as each run
//! gets its own `Validator`.

mod classify;
mod diagnostics;
mod imports;
mod report;
mod semantics;

#[cfg(test)]
mod validator_tests;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::lexer::tokenize;
use crate::parser::Parser;

pub use diagnostics::{ErrorKind, Location, Severity, ValidationError};

/// The top-level validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty after all phases complete.
    pub valid: bool,
    pub file_path: String,
    /// Discovery order is insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationError>,
    /// Absent when lexing or parsing failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ValidationStats>,
}

impl ValidationResult {
    fn new(file_path: impl Into<String>) -> Self {
        Self {
            valid: true,
            file_path: file_path.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: None,
        }
    }
}

/// Declaration counts plus total source line count. Purely informational;
/// never affects `valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub types: usize,
    pub routes: usize,
    pub functions: usize,
    pub commands: usize,
    pub lines: usize,
}

/// Validates one Glyph source file.
pub struct Validator {
    source: String,
    file_path: String,
    search_paths: Vec<PathBuf>,
}

impl Validator {
    pub fn new(source: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            file_path: file_path.into(),
            search_paths: Vec::new(),
        }
    }

    /// Adds an extra module search path, consulted after the importing
    /// file's own directory.
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Runs the full pipeline and returns a structured report.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new(self.file_path.as_str());
        let lines: Vec<&str> = self.source.split('\n').collect();

        let tokens = match tokenize(&self.source) {
            Ok(tokens) => tokens,
            Err(err) => {
                result.valid = false;
                result
                    .errors
                    .push(classify::lexer_error(&self.file_path, &lines, err.to_string()));
                return result;
            }
        };

        let module = match Parser::new(&self.source, tokens).parse() {
            Ok(module) => module,
            Err(err) => {
                result.valid = false;
                result
                    .errors
                    .push(classify::syntax_error(&self.file_path, &lines, err.to_string()));
                return result;
            }
        };

        self.check_semantics(&module, &mut result);

        result.stats = Some(semantics::collect_stats(&module, lines.len()));
        result.valid = result.errors.is_empty();
        result
    }
}
