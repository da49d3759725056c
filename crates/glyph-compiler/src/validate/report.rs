//! Report serialization: wire format and human transcript.

use super::ValidationResult;

impl ValidationResult {
    /// Lossless wire serialization. Empty collections and absent optionals
    /// are omitted.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Terminal transcript: header, then one block per error, then one
    /// block per warning. Not intended to be machine-parsed.
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        if self.valid {
            let stats = self.stats.unwrap_or_default();
            out.push_str(&format!("✓ {} is valid\n", self.file_path));
            out.push_str(&format!(
                "  {} types, {} routes, {} functions, {} commands\n",
                stats.types, stats.routes, stats.functions, stats.commands
            ));
        } else {
            out.push_str(&format!("✗ {} has errors\n\n", self.file_path));
        }

        for err in &self.errors {
            out.push_str(&format!("ERROR [{}]: {}\n", err.kind, err.message));
            if let Some(location) = &err.location {
                out.push_str(&format!(
                    "  at {}:{}:{}\n",
                    location.file, location.line, location.column
                ));
            }
            if let Some(context) = &err.context {
                out.push_str(&format!("  > {context}\n"));
            }
            if let Some(hint) = &err.fix_hint {
                out.push_str(&format!("  hint: {hint}\n"));
            }
            out.push('\n');
        }

        for warning in &self.warnings {
            out.push_str(&format!("WARNING [{}]: {}\n", warning.kind, warning.message));
            if let Some(hint) = &warning.fix_hint {
                out.push_str(&format!("  hint: {hint}\n"));
            }
            out.push('\n');
        }

        out
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        if self.valid {
            let stats = self.stats.unwrap_or_default();
            format!("valid: {} types, {} routes", stats.types, stats.routes)
        } else {
            format!(
                "invalid: {} errors, {} warnings",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}
