//! Module resolution: loading and caching imported Glyph files.
//!
//! The resolver is deliberately decoupled from the parser - the parse
//! function is injected via [`ModuleResolver::set_parse_func`] so this
//! module never depends on the front-end that calls it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use glyph_ast::{Item, Module};


pub type ParseFn = Box<dyn Fn(&str) -> Result<Module, String>>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ModuleError {
    #[error("module not found: {path}")]
    NotFound { path: String },

    #[error("circular dependency detected: {chain}")]
    CircularDependency { chain: String },

    #[error("failed to read module {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse module {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("no parse function set in module resolver")]
    NoParseFunc,

    #[error("'{name}' is not exported from module '{path}'")]
    MissingExport { name: String, path: String },
}

/// A parsed and loaded module.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    /// The resolved file path.
    pub path: PathBuf,
    pub module: Module,
    /// Exported items: functions, types, providers, commands and consts by
    /// name; routes by `"METHOD:path"`.
    pub exports: IndexMap<String, Item>,
    /// Module namespace, if a `module "..."` declaration is present.
    pub namespace: Option<String>,
}

pub struct ModuleResolver {
    search_paths: Vec<PathBuf>,
    cache: HashMap<PathBuf, LoadedModule>,
    loading_stack: Vec<PathBuf>,
    parse_func: Option<ParseFn>,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            cache: HashMap::new(),
            loading_stack: Vec::new(),
            parse_func: None,
        }
    }

    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn set_parse_func(&mut self, f: impl Fn(&str) -> Result<Module, String> + 'static) {
        self.parse_func = Some(Box::new(f));
    }

    pub fn cached(&self, path: &Path) -> Option<&LoadedModule> {
        self.cache.get(path)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolves all import statements in `module`, keyed by alias (aliased
    /// imports), import path (selective imports), or file stem (plain
    /// imports).
    pub fn process_imports(
        &mut self,
        module: &Module,
        base_dir: &Path,
    ) -> Result<IndexMap<String, LoadedModule>, ModuleError> {
        let mut imports = IndexMap::new();

        for item in &module.items {
            let Item::Import(import) = item else {
                continue;
            };

            let loaded = self.resolve(&import.path, base_dir)?;

            if import.selective {
                for name in &import.names {
                    if !loaded.exports.contains_key(&name.name) {
                        return Err(ModuleError::MissingExport {
                            name: name.name.clone(),
                            path: import.path.clone(),
                        });
                    }
                }
            }

            let key = if let Some(alias) = &import.alias {
                alias.clone()
            } else if import.selective {
                import.path.clone()
            } else {
                file_stem(&import.path)
            };

            imports.insert(key, loaded);
        }

        Ok(imports)
    }

    /// Resolves and loads one module. `base_dir` is the directory of the
    /// importing file.
    pub fn resolve(
        &mut self,
        import_path: &str,
        base_dir: &Path,
    ) -> Result<LoadedModule, ModuleError> {
        let full_path = self.resolve_path(import_path, base_dir)?;

        if let Some(cached) = self.cache.get(&full_path) {
            return Ok(cached.clone());
        }

        if self.loading_stack.contains(&full_path) {
            return Err(ModuleError::CircularDependency {
                chain: self.format_chain(&full_path),
            });
        }

        self.loading_stack.push(full_path.clone());
        let loaded = self.load(&full_path);
        self.loading_stack.pop();
        let loaded = loaded?;

        self.cache.insert(full_path, loaded.clone());
        Ok(loaded)
    }

    fn resolve_path(&self, import_path: &str, base_dir: &Path) -> Result<PathBuf, ModuleError> {
        if import_path.starts_with("./") || import_path.starts_with("../") {
            return find_glyph_file(&base_dir.join(import_path))
                .ok_or_else(|| ModuleError::NotFound {
                    path: import_path.to_owned(),
                });
        }

        if Path::new(import_path).is_absolute() {
            return find_glyph_file(Path::new(import_path)).ok_or_else(|| ModuleError::NotFound {
                path: import_path.to_owned(),
            });
        }

        for search_path in &self.search_paths {
            if let Some(resolved) = find_glyph_file(&search_path.join(import_path)) {
                return Ok(resolved);
            }
        }

        Err(ModuleError::NotFound {
            path: import_path.to_owned(),
        })
    }

    fn load(&self, full_path: &Path) -> Result<LoadedModule, ModuleError> {
        let source = fs::read_to_string(full_path).map_err(|e| ModuleError::Io {
            path: full_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let parse = self.parse_func.as_ref().ok_or(ModuleError::NoParseFunc)?;
        let module = parse(&source).map_err(|reason| ModuleError::Parse {
            path: full_path.display().to_string(),
            reason,
        })?;

        let exports = extract_exports(&module);
        let namespace = module.items.iter().find_map(|item| match item {
            Item::Module(decl) => Some(decl.name.clone()),
            _ => None,
        });

        Ok(LoadedModule {
            path: full_path.to_owned(),
            module,
            exports,
            namespace,
        })
    }

    fn format_chain(&self, last: &Path) -> String {
        self.loading_stack
            .iter()
            .map(|p| p.display().to_string())
            .chain(std::iter::once(last.display().to_string()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Finds a `.glyph` file for a path, trying the extension and the
/// `main.glyph` / `index.glyph` directory conventions.
fn find_glyph_file(path: &Path) -> Option<PathBuf> {
    let candidates = if path.extension().is_some_and(|ext| ext == "glyph") {
        vec![path.to_owned()]
    } else {
        vec![
            PathBuf::from(format!("{}.glyph", path.display())),
            path.join("main.glyph"),
            path.join("index.glyph"),
        ]
    };

    for candidate in candidates {
        if candidate.is_file() {
            return Some(candidate.canonicalize().unwrap_or(candidate));
        }
    }
    None
}

fn file_stem(import_path: &str) -> String {
    Path::new(import_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| import_path.to_owned())
}

fn extract_exports(module: &Module) -> IndexMap<String, Item> {
    let mut exports = IndexMap::new();

    for item in &module.items {
        match item {
            Item::Function(f) => {
                exports.insert(f.name.clone(), item.clone());
            }
            Item::Type(t) => {
                exports.insert(t.name.clone(), item.clone());
            }
            Item::Provider(p) => {
                exports.insert(p.name.clone(), item.clone());
            }
            Item::Command(c) => {
                exports.insert(c.name.clone(), item.clone());
            }
            Item::Const(c) => {
                exports.insert(c.name.clone(), item.clone());
            }
            Item::Route(r) => {
                exports.insert(format!("{}:{}", r.method, r.path), item.clone());
            }
            _ => {}
        }
    }

    exports
}
