//! Classification of upstream phase failures into diagnostics.
//!
//! Lexer and parser failures arrive as free text. There is no structured
//! position protocol with those phases: the location is recovered by
//! scanning the message for the literal substrings `"line "` and
//! `"column "`, defaulting each coordinate to 1 when absent. Fix hints are
//! an ordered set of substring-match rules with a generic fallback.

use super::diagnostics::{ErrorKind, Location, ValidationError};

/// Converts a lexical failure message into a `lexer_error` diagnostic.
pub(super) fn lexer_error(file_path: &str, lines: &[&str], message: String) -> ValidationError {
    let (line, column) = extract_location(&message);
    let mut err = ValidationError::error(ErrorKind::LexerError, message.clone())
        .with_location(Location {
            file: file_path.to_owned(),
            line,
            column,
        })
        .with_hint(suggest_lexer_fix(&message));
    if let Some(context) = line_context(lines, line) {
        err = err.with_context(context);
    }
    err
}

/// Converts a structural failure message into a `syntax_error` diagnostic.
pub(super) fn syntax_error(file_path: &str, lines: &[&str], message: String) -> ValidationError {
    let (line, column) = extract_location(&message);
    let mut err = ValidationError::error(ErrorKind::SyntaxError, message.clone())
        .with_location(Location {
            file: file_path.to_owned(),
            line,
            column,
        })
        .with_hint(suggest_parse_fix(&message));
    if let Some(context) = line_context(lines, line) {
        err = err.with_context(context);
    }
    err
}

/// Best-effort line/column extraction from a free-text message.
pub(super) fn extract_location(message: &str) -> (u32, u32) {
    let line = scan_number_after(message, "line ").unwrap_or(1);
    let column = scan_number_after(message, "column ").unwrap_or(1);
    (line, column)
}

fn scan_number_after(message: &str, marker: &str) -> Option<u32> {
    let idx = message.find(marker)?;
    let rest = &message[idx + marker.len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The trimmed source line at a 1-indexed line number. Out-of-range lines
/// and blank lines yield `None` rather than failing.
pub(super) fn line_context(lines: &[&str], line: u32) -> Option<String> {
    if line < 1 || line as usize > lines.len() {
        return None;
    }
    let trimmed = lines[line as usize - 1].trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

pub(super) fn suggest_lexer_fix(message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("unterminated string") {
        return "add closing quote to string literal".to_owned();
    }
    if lower.contains("unexpected character") {
        return "check for invalid characters or typos".to_owned();
    }
    if lower.contains("invalid number") {
        return "check number format (e.g., 123, 3.14)".to_owned();
    }

    "check syntax near the error location".to_owned()
}

pub(super) fn suggest_parse_fix(message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("expected") {
        if lower.contains("expected '{'") {
            return "add opening brace '{' after type or route declaration".to_owned();
        }
        if lower.contains("expected '}'") {
            return "add closing brace '}' to complete the block".to_owned();
        }
        if lower.contains("expected ':'") {
            return "add colon ':' between field name and type".to_owned();
        }
        if lower.contains("expected identifier") {
            return "add a valid name (letters, numbers, underscores)".to_owned();
        }
    }

    if lower.contains("unexpected token") {
        return "remove unexpected token or check syntax".to_owned();
    }
    if lower.contains("unexpected end") {
        return "complete the statement or block".to_owned();
    }

    "review Glyph syntax documentation".to_owned()
}
