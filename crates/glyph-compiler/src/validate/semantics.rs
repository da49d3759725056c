//! Semantic validation: definition collection (pass 1), reference
//! resolution (pass 2), route and provider-injection checks.

use indexmap::IndexSet;

use glyph_ast::{
    Function, HttpMethod, Item, Module, ProviderDef, Route, Type, TypeDef,
};

use super::diagnostics::{ErrorKind, ValidationError};
use super::{ValidationResult, ValidationStats, Validator};

/// Names that resolve without a local or imported definition.
const BUILTIN_TYPES: &[&str] = &[
    "int", "str", "string", "bool", "float", "timestamp", "any", "object", "List", "Map", "Result",
    "Database", "Redis", "MongoDB", "LLM",
];

const BUILTIN_PROVIDERS: &[&str] = &["Database", "Redis", "MongoDB", "LLM"];

fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

fn is_builtin_provider(name: &str) -> bool {
    BUILTIN_PROVIDERS.contains(&name)
}

/// The two name environments. Written during import resolution and pass 1,
/// read-only afterwards; entries are never removed, so declaration order
/// among types is irrelevant to reference validation.
#[derive(Debug, Default)]
pub(super) struct Environment {
    types: IndexSet<String>,
    providers: IndexSet<String>,
}

impl Environment {
    pub(super) fn add_type(&mut self, name: impl Into<String>) {
        self.types.insert(name.into());
    }

    fn add_provider(&mut self, name: impl Into<String>) {
        self.providers.insert(name.into());
    }

    fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    fn has_provider(&self, name: &str) -> bool {
        self.providers.contains(name)
    }
}

impl Validator {
    pub(super) fn check_semantics(&self, module: &Module, result: &mut ValidationResult) {
        let mut env = Environment::default();

        self.resolve_imports(module, &mut env, result);
        collect_definitions(module, &mut env, result);

        for item in &module.items {
            match item {
                Item::Type(type_def) => validate_type_fields(type_def, &env, result),
                Item::Route(route) => validate_route(route, &env, result),
                Item::Function(function) => validate_function(function, &env, result),
                Item::Provider(provider) => validate_provider(provider, &env, result),
                _ => {}
            }
        }

        check_duplicate_routes(module, result);
    }
}

/// Pass 1: one forward walk collecting type and provider definitions.
/// Re-declaring a name flags the second and later occurrences; the name is
/// marked present regardless, so N duplicates yield N-1 errors.
fn collect_definitions(module: &Module, env: &mut Environment, result: &mut ValidationResult) {
    for item in &module.items {
        match item {
            Item::Type(type_def) => {
                if env.has_type(&type_def.name) {
                    result.errors.push(
                        ValidationError::error(
                            ErrorKind::DuplicateDefinition,
                            format!("duplicate type definition: {}", type_def.name),
                        )
                        .with_related(type_def.name.as_str())
                        .with_hint(format!(
                            "rename one of the '{}' type definitions or remove the duplicate",
                            type_def.name
                        )),
                    );
                }
                env.add_type(type_def.name.clone());
            }
            Item::Provider(provider) => {
                if env.has_provider(&provider.name) {
                    result.errors.push(
                        ValidationError::error(
                            ErrorKind::DuplicateDefinition,
                            format!("duplicate provider definition: {}", provider.name),
                        )
                        .with_related(provider.name.as_str())
                        .with_hint(format!(
                            "rename one of the '{}' provider definitions or remove the duplicate",
                            provider.name
                        )),
                    );
                }
                env.add_provider(provider.name.clone());
                // Provider names are legal injectable types.
                env.add_type(provider.name.clone());
            }
            _ => {}
        }
    }
}

fn validate_type_fields(type_def: &TypeDef, env: &Environment, result: &mut ValidationResult) {
    for field in &type_def.fields {
        validate_type_ref(&field.ty, env, &[], result, &type_def.name);
    }
}

fn validate_function(function: &Function, env: &Environment, result: &mut ValidationResult) {
    if let Some(return_type) = &function.return_type {
        validate_type_ref(
            return_type,
            env,
            &[],
            result,
            &format!("function {}", function.name),
        );
    }
    for param in &function.params {
        validate_type_ref(
            &param.ty,
            env,
            &[],
            result,
            &format!("function {} parameter {}", function.name, param.name),
        );
    }
}

/// Providers are validated structurally like functions. Method types may
/// also reference the provider's own generic type parameters.
fn validate_provider(provider: &ProviderDef, env: &Environment, result: &mut ValidationResult) {
    for method in &provider.methods {
        let related = format!("provider {} method {}", provider.name, method.name);
        if let Some(return_type) = &method.return_type {
            validate_type_ref(return_type, env, &provider.type_params, result, &related);
        }
        for param in &method.params {
            validate_type_ref(&param.ty, env, &provider.type_params, result, &related);
        }
    }
}

fn validate_route(route: &Route, env: &Environment, result: &mut ValidationResult) {
    let related = format!("route {} {}", route.method, route.path);

    if let Some(return_type) = &route.return_type {
        validate_type_ref(return_type, env, &[], result, &related);
    }

    if !route.path.starts_with('/') {
        result.errors.push(
            ValidationError::error(
                ErrorKind::InvalidRoute,
                format!("route path must start with /: {}", route.path),
            )
            .with_related(route.path.as_str())
            .with_hint(format!("change path to '/{}'", route.path.trim_start_matches('/'))),
        );
    }

    // Repeating a :param name is stylistically wrong but not fatal.
    let mut params = IndexSet::new();
    for segment in route.path.split('/') {
        let Some(param) = segment.strip_prefix(':') else {
            continue;
        };
        if !params.insert(param) {
            result.warnings.push(
                ValidationError::warning(
                    ErrorKind::DuplicateDefinition,
                    format!("duplicate path parameter: {param}"),
                )
                .with_related(route.path.as_str())
                .with_hint("use unique names for path parameters"),
            );
        }
    }

    for injection in &route.injections {
        let Some(provider) = injection.ty.provider_name() else {
            continue;
        };
        if !env.has_provider(provider) && !is_builtin_provider(provider) {
            result.errors.push(
                ValidationError::error(
                    ErrorKind::UndefinedReference,
                    format!("undefined provider type: {provider}"),
                )
                .with_related(related.as_str())
                .with_hint(format!(
                    "define 'provider {provider} {{ ... }}' or use a builtin provider \
                     (Database, Redis, MongoDB, LLM)"
                )),
            );
        }
    }
}

/// Pass 2 core: depth-first resolution of one type reference. Resolution
/// does not short-circuit - every independently-reachable unresolved name
/// produces its own diagnostic.
fn validate_type_ref(
    ty: &Type,
    env: &Environment,
    type_params: &[String],
    result: &mut ValidationResult,
    related: &str,
) {
    match ty {
        Type::Named(name) => {
            if env.has_type(name)
                || is_builtin_type(name)
                || type_params.iter().any(|param| param == name)
            {
                return;
            }
            result.errors.push(
                ValidationError::error(
                    ErrorKind::UndefinedReference,
                    format!("undefined type: {name}"),
                )
                .with_related(related)
                .with_hint(format!("define type '{name}' or check for typos")),
            );
        }
        Type::Array(element) => validate_type_ref(element, env, type_params, result, related),
        Type::Optional(inner) => validate_type_ref(inner, env, type_params, result, related),
        Type::Generic { base, args } => {
            validate_type_ref(base, env, type_params, result, related);
            for arg in args {
                validate_type_ref(arg, env, type_params, result, related);
            }
        }
        // Concrete builtins, unions, and provider types resolve trivially.
        _ => {}
    }
}

/// Routes sharing an identical `(method, path)` key: the second and later
/// occurrences are each flagged.
fn check_duplicate_routes(module: &Module, result: &mut ValidationResult) {
    let mut seen: IndexSet<(HttpMethod, &str)> = IndexSet::new();

    for item in &module.items {
        let Item::Route(route) = item else {
            continue;
        };
        if !seen.insert((route.method, route.path.as_str())) {
            let key = format!("{} {}", route.method, route.path);
            result.errors.push(
                ValidationError::error(
                    ErrorKind::DuplicateDefinition,
                    format!("duplicate route: {key}"),
                )
                .with_related(key.as_str())
                .with_hint("remove duplicate route or change the path/method"),
            );
        }
    }
}

pub(super) fn collect_stats(module: &Module, lines: usize) -> ValidationStats {
    let mut stats = ValidationStats {
        lines,
        ..Default::default()
    };

    for item in &module.items {
        match item {
            Item::Type(_) => stats.types += 1,
            Item::Route(_) => stats.routes += 1,
            Item::Function(_) => stats.functions += 1,
            Item::Command(_) => stats.commands += 1,
            _ => {}
        }
    }

    stats
}
