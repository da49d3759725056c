use std::fs;

use indoc::indoc;

use super::diagnostics::ErrorKind;
use super::{ValidationResult, Validator};

fn validate(source: &str) -> ValidationResult {
    Validator::new(source, "test.glyph").validate()
}

fn kinds(result: &ValidationResult) -> Vec<ErrorKind> {
    result.errors.iter().map(|e| e.kind).collect()
}

#[test]
fn valid_source() {
    let result = validate(indoc! {"
        : User {
          id: int!
          name: string!
        }

        @ GET /users/:id -> User {
          $ user = db.find(id)
          > user
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    let stats = result.stats.unwrap();
    assert_eq!(stats.types, 1);
    assert_eq!(stats.routes, 1);
}

#[test]
fn lexer_failure_short_circuits() {
    let result = validate("@ GET /test {\n  $ message = \"unterminated");
    assert!(!result.valid);
    assert_eq!(kinds(&result), vec![ErrorKind::LexerError]);
    assert!(result.warnings.is_empty());
    assert!(result.stats.is_none());

    let err = &result.errors[0];
    assert!(err.message.contains("unterminated string"));
    let location = err.location.as_ref().unwrap();
    assert_eq!(location.line, 2);
    assert_eq!(
        err.fix_hint.as_deref(),
        Some("add closing quote to string literal")
    );
    // Context is the trimmed offending line.
    assert_eq!(err.context.as_deref(), Some("$ message = \"unterminated"));
}

#[test]
fn parse_failure_short_circuits() {
    let result = validate(": User {\n  id: int!\n  name: string!\n");
    assert!(!result.valid);
    assert_eq!(kinds(&result), vec![ErrorKind::SyntaxError]);
    assert!(result.warnings.is_empty());
    assert!(result.stats.is_none());
    assert!(
        result.errors[0]
            .fix_hint
            .as_deref()
            .unwrap()
            .contains("closing brace")
    );
}

#[test]
fn duplicate_type_definition() {
    let result = validate(indoc! {"
        : User {
          id: int!
        }

        : User {
          name: string!
        }
    "});
    assert!(!result.valid);
    let duplicates: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.kind == ErrorKind::DuplicateDefinition && e.message.contains("User"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].related_to.as_deref(), Some("User"));
    assert!(duplicates[0].fix_hint.is_some());
}

#[test]
fn three_declarations_yield_two_duplicate_errors() {
    let result = validate(indoc! {"
        : X {
          a: int
        }
        : X {
          b: int
        }
        : X {
          c: int
        }
    "});
    let duplicates = result
        .errors
        .iter()
        .filter(|e| e.kind == ErrorKind::DuplicateDefinition)
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn duplicate_provider_definition() {
    let result = validate(indoc! {"
        provider Mailer {
          send(to: str!) -> bool
        }
        provider Mailer {
          send(to: str!) -> bool
        }
    "});
    assert!(!result.valid);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.kind == ErrorKind::DuplicateDefinition
                && e.message.contains("duplicate provider definition: Mailer"))
    );
}

#[test]
fn undefined_route_return_type() {
    let result = validate(indoc! {"
        @ GET /users -> NonExistentType {
          > {}
        }
    "});
    assert!(!result.valid);
    let err = result
        .errors
        .iter()
        .find(|e| e.kind == ErrorKind::UndefinedReference)
        .unwrap();
    assert!(err.message.contains("NonExistentType"));
    assert_eq!(err.related_to.as_deref(), Some("route GET /users"));
    assert!(err.fix_hint.as_deref().unwrap().contains("NonExistentType"));
}

#[test]
fn forward_references_are_tolerated() {
    let result = validate(indoc! {"
        : A {
          b: B!
        }

        : B {
          id: int!
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn recursive_resolution_reports_exactly_one_error() {
    // Array-of-optional-of-undefined-name: one diagnostic, naming the leaf.
    let result = validate(indoc! {"
        : Wrapper {
          values: [Unknown?]!
        }
    "});
    assert_eq!(kinds(&result), vec![ErrorKind::UndefinedReference]);
    assert!(result.errors[0].message.contains("Unknown"));
}

#[test]
fn generic_arguments_are_resolved_in_order() {
    let result = validate(indoc! {"
        : Response {
          data: Result<UnknownA, UnknownB>!
        }
    "});
    assert_eq!(
        kinds(&result),
        vec![ErrorKind::UndefinedReference, ErrorKind::UndefinedReference]
    );
    assert!(result.errors[0].message.contains("UnknownA"));
    assert!(result.errors[1].message.contains("UnknownB"));
}

#[test]
fn builtin_types_resolve() {
    let result = validate(indoc! {"
        : Response {
          count: int!
          message: str!
          flag: bool!
          value: float!
          created: timestamp!
          data: any!
          blob: object
        }

        @ GET /test -> Response {
          > {}
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn container_builtins_resolve() {
    let result = validate(indoc! {"
        : User {
          id: int!
        }

        : Page {
          items: List<User>!
          index: Map<string, User>!
          outcome: Result<User, string>!
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn nested_type_chain_resolves() {
    let result = validate(indoc! {"
        : Address {
          street: string!
        }

        : Company {
          address: Address!
        }

        : Employee {
          company: Company!
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn undefined_nested_field_type() {
    let result = validate(indoc! {"
        : Employee {
          name: string!
          company: NonExistentCompany!
        }
    "});
    assert!(!result.valid);
    let err = &result.errors[0];
    assert_eq!(err.kind, ErrorKind::UndefinedReference);
    assert!(err.message.contains("NonExistentCompany"));
    assert_eq!(err.related_to.as_deref(), Some("Employee"));
}

#[test]
fn route_path_must_start_with_slash() {
    let result = validate("@ GET users/:id {\n  > {}\n}");
    assert!(!result.valid);
    let err = result
        .errors
        .iter()
        .find(|e| e.kind == ErrorKind::InvalidRoute)
        .unwrap();
    assert!(err.message.contains("users/:id"));
    assert!(err.fix_hint.as_deref().unwrap().contains("/users/:id"));
}

#[test]
fn duplicate_path_parameter_is_a_warning() {
    let result = validate("@ GET /users/:id/posts/:id {\n  > {}\n}");
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert!(result.valid);
    let warning = result
        .warnings
        .iter()
        .find(|w| w.kind == ErrorKind::DuplicateDefinition)
        .unwrap();
    assert!(warning.message.contains("duplicate path parameter: id"));
    assert_eq!(warning.related_to.as_deref(), Some("/users/:id/posts/:id"));
}

#[test]
fn duplicate_routes_flag_second_occurrence_once() {
    let result = validate(indoc! {"
        @ GET /x {
          > {}
        }

        @ GET /x {
          > {}
        }
    "});
    let duplicates: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.kind == ErrorKind::DuplicateDefinition)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message.contains("duplicate route: GET /x"));
}

#[test]
fn same_path_different_method_is_fine() {
    let result = validate(indoc! {"
        @ GET /x {
          > {}
        }

        @ POST /x {
          > {}
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn builtin_provider_injection_is_allowed() {
    let result = validate(indoc! {r#"
        @ GET /data {
          % db: Database
          $ rows = db.query("SELECT * FROM data")
          > rows
        }
    "#});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn declared_provider_injection_is_allowed() {
    let result = validate(indoc! {"
        provider Mailer {
          send(to: str!) -> bool
        }

        @ POST /notify {
          % mail: Mailer
          > mail.send(address)
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn undefined_provider_injection_is_an_error() {
    let result = validate(indoc! {"
        @ GET /x {
          % svc: Foo
          > {}
        }
    "});
    assert!(!result.valid);
    let err = result
        .errors
        .iter()
        .find(|e| e.kind == ErrorKind::UndefinedReference)
        .unwrap();
    assert!(err.message.contains("undefined provider type: Foo"));
    assert_eq!(err.related_to.as_deref(), Some("route GET /x"));
    let hint = err.fix_hint.as_deref().unwrap();
    assert!(hint.contains("provider Foo"));
    assert!(hint.contains("Database, Redis, MongoDB, LLM"));
}

#[test]
fn provider_is_an_injectable_type_elsewhere() {
    // Provider names enter the type environment too.
    let result = validate(indoc! {"
        provider Mailer {
          send(to: str!) -> bool
        }

        : Service {
          mail: Mailer!
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn function_signature_types_are_validated() {
    let result = validate(indoc! {"
        : User {
          id: int!
        }

        ! getUser(id: int!): User {
          $ user = db.find(id)
          > user
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert_eq!(result.stats.unwrap().functions, 1);
}

#[test]
fn undefined_function_return_type() {
    let result = validate("! getUser(id: int!): NonExistent {\n  > {}\n}");
    assert!(!result.valid);
    let err = &result.errors[0];
    assert_eq!(err.related_to.as_deref(), Some("function getUser"));
}

#[test]
fn undefined_function_param_type() {
    let result = validate("! process(data: UnknownType!): string {\n  > \"done\"\n}");
    assert!(!result.valid);
    let err = &result.errors[0];
    assert_eq!(
        err.related_to.as_deref(),
        Some("function process parameter data")
    );
}

#[test]
fn provider_method_types_are_validated() {
    let result = validate(indoc! {"
        provider Store {
          put(item: Widget!) -> Receipt
        }
    "});
    assert!(!result.valid);
    assert_eq!(
        kinds(&result),
        vec![ErrorKind::UndefinedReference, ErrorKind::UndefinedReference]
    );
    for err in &result.errors {
        assert_eq!(err.related_to.as_deref(), Some("provider Store method put"));
    }
}

#[test]
fn provider_type_params_resolve_in_method_types() {
    let result = validate(indoc! {"
        provider Cache<T> {
          get(key: str!) -> T
          set(key: str!, value: T) -> bool
        }
    "});
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn stats_accuracy() {
    let result = validate(indoc! {"
        : A {
          id: int!
        }
        : B {
          id: int!
        }
        : C {
          id: int!
        }

        @ GET /a {
          > {}
        }
        @ GET /b {
          > {}
        }

        ! f(x: int!): int {
          > x
        }
    "});
    let stats = result.stats.unwrap();
    assert_eq!(stats.types, 3);
    assert_eq!(stats.routes, 2);
    assert_eq!(stats.functions, 1);
    assert_eq!(stats.commands, 0);
}

#[test]
fn stats_reported_even_when_invalid() {
    let result = validate(indoc! {"
        : A {
          x: Missing!
        }

        @ GET /a {
          > {}
        }
    "});
    assert!(!result.valid);
    let stats = result.stats.unwrap();
    assert_eq!(stats.types, 1);
    assert_eq!(stats.routes, 1);
}

#[test]
fn empty_source_is_valid() {
    let result = validate("");
    assert!(result.valid);
    let stats = result.stats.unwrap();
    assert_eq!(stats.types, 0);
    assert_eq!(stats.routes, 0);
    assert_eq!(stats.lines, 1);
}

#[test]
fn comments_only_source_is_valid() {
    let result = validate("# a comment\n# another\n");
    assert!(result.valid);
}

#[test]
fn line_count_splits_on_newlines() {
    let result = validate(": User {\n  id: int!\n}");
    assert_eq!(result.stats.unwrap().lines, 3);
}

#[test]
fn unresolvable_import_degrades_to_warning() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("main.glyph");
    let source = indoc! {"
        import \"./missing\" as m

        : User {
          id: int!
        }
    "};

    let result = Validator::new(source, file_path.display().to_string()).validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert_eq!(result.warnings.len(), 1);
    let warning = &result.warnings[0];
    assert_eq!(warning.kind, ErrorKind::UndefinedReference);
    assert!(warning.message.contains("failed to resolve imports"));
    assert!(
        warning
            .fix_hint
            .as_deref()
            .unwrap()
            .contains("imported modules exist")
    );
}

#[test]
fn aliased_import_registers_qualified_type_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("models.glyph"), ": User {\n  id: int!\n}").unwrap();
    let file_path = dir.path().join("main.glyph");

    let source = indoc! {"
        import \"./models\" as m

        : Profile {
          user: m.User!
        }
    "};
    let result = Validator::new(source, file_path.display().to_string()).validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn qualified_name_requires_the_right_alias() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("models.glyph"), ": User {\n  id: int!\n}").unwrap();
    let file_path = dir.path().join("main.glyph");

    let source = indoc! {"
        import \"./models\" as m

        : Profile {
          user: other.User!
        }
    "};
    let result = Validator::new(source, file_path.display().to_string()).validate();
    assert!(!result.valid);
    assert!(result.errors[0].message.contains("other.User"));
}

#[test]
fn plain_import_registers_under_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("models.glyph"), ": User {\n  id: int!\n}").unwrap();
    let file_path = dir.path().join("main.glyph");

    let source = indoc! {"
        import \"./models\"

        : Profile {
          user: models.User!
        }
    "};
    let result = Validator::new(source, file_path.display().to_string()).validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn selective_import_registers_local_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("models.glyph"),
        ": User {\n  id: int!\n}\n: Post {\n  id: int!\n}",
    )
    .unwrap();
    let file_path = dir.path().join("main.glyph");

    let source = indoc! {"
        from \"./models\" import { User, Post as P }

        : Feed {
          author: User!
          posts: [P]!
        }
    "};
    let result = Validator::new(source, file_path.display().to_string()).validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn extra_search_path_is_consulted() {
    let lib_dir = tempfile::tempdir().unwrap();
    fs::write(lib_dir.path().join("shared.glyph"), ": Shared {\n  id: int!\n}").unwrap();
    let main_dir = tempfile::tempdir().unwrap();
    let file_path = main_dir.path().join("main.glyph");

    let source = indoc! {"
        import \"shared\" as lib

        : Wrapper {
          inner: lib.Shared!
        }
    "};
    let result = Validator::new(source, file_path.display().to_string())
        .with_search_path(lib_dir.path())
        .validate();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn every_semantic_error_is_collected() {
    // One walk collects every independent finding; nothing short-circuits.
    let result = validate(indoc! {"
        : User {
          id: int!
          pet: Ghost!
        }

        : User {
          name: string!
        }

        @ GET bad {
          % svc: Nope
          > {}
        }
    "});
    assert!(!result.valid);
    let kinds = kinds(&result);
    assert!(kinds.contains(&ErrorKind::DuplicateDefinition));
    assert!(kinds.contains(&ErrorKind::InvalidRoute));
    assert!(kinds.contains(&ErrorKind::UndefinedReference));
    assert!(result.errors.len() >= 3);
}

#[test]
fn validation_round_trip_through_wire_format() {
    let result = validate(indoc! {"
        : User {
          pet: Ghost!
        }

        @ GET /users/:id/:id {
          > {}
        }
    "});
    assert!(!result.valid);
    assert!(!result.warnings.is_empty());

    let json = result.to_json(true).unwrap();
    let parsed: ValidationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}
