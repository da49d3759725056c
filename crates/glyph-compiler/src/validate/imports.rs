//! Import resolution adapter.
//!
//! Flattens the exported type names of every imported module into the type
//! environment: aliased and plain imports register qualified `alias.Name`
//! entries, selective imports register the chosen names unqualified.
//!
//! Resolution failure is non-fatal. The module may still be valid at
//! interpretation time through a different resolution strategy, so a
//! failure degrades to a warning and validation continues with whatever
//! did resolve.

use std::path::{Path, PathBuf};

use glyph_ast::{Item, Module};

use crate::lexer::tokenize;
use crate::modules::ModuleResolver;
use crate::parser::Parser;

use super::diagnostics::{ErrorKind, ValidationError};
use super::semantics::Environment;
use super::{ValidationResult, Validator};

impl Validator {
    pub(super) fn resolve_imports(
        &self,
        module: &Module,
        env: &mut Environment,
        result: &mut ValidationResult,
    ) {
        if !module.items.iter().any(|i| matches!(i, Item::Import(_))) {
            return;
        }

        let base_dir = Path::new(&self.file_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_owned)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut resolver = ModuleResolver::new();
        resolver.add_search_path(&base_dir);
        for path in &self.search_paths {
            resolver.add_search_path(path);
        }
        resolver.set_parse_func(|source| {
            let tokens = tokenize(source).map_err(|e| e.to_string())?;
            Parser::new(source, tokens).parse().map_err(|e| e.to_string())
        });

        let imports = match resolver.process_imports(module, &base_dir) {
            Ok(imports) => imports,
            Err(err) => {
                result.warnings.push(
                    ValidationError::warning(
                        ErrorKind::UndefinedReference,
                        format!("failed to resolve imports: {err}"),
                    )
                    .with_hint("check that imported modules exist and are accessible"),
                );
                return;
            }
        };

        for item in &module.items {
            let Item::Import(import) = item else {
                continue;
            };

            if import.selective {
                let Some(loaded) = imports.get(&import.path) else {
                    continue;
                };
                for name in &import.names {
                    if matches!(loaded.exports.get(&name.name), Some(Item::Type(_))) {
                        env.add_type(name.local_name());
                    }
                }
            } else {
                let key = import
                    .alias
                    .clone()
                    .unwrap_or_else(|| import_stem(&import.path));
                let Some(loaded) = imports.get(&key) else {
                    continue;
                };
                for (name, exported) in &loaded.exports {
                    if matches!(exported, Item::Type(_)) {
                        env.add_type(format!("{key}.{name}"));
                    }
                }
            }
        }
    }
}

fn import_stem(import_path: &str) -> String {
    Path::new(import_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| import_path.to_owned())
}
