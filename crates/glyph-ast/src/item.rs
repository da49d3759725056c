//! Top-level module items.

use crate::expr::{Expr, Statement};
use crate::types::Type;

/// A parsed Glyph source file: an ordered sequence of top-level items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub items: Vec<Item>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Type(TypeDef),
    Provider(ProviderDef),
    Route(Route),
    WebSocket(WebSocketRoute),
    Function(Function),
    Command(Command),
    Cron(CronTask),
    Event(EventHandler),
    Queue(QueueWorker),
    Import(ImportStatement),
    Module(ModuleDecl),
    Const(ConstDecl),
}

/// `: Name { field: type! }` or `type Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub required: bool,
}

/// `provider Name { method(param: type!) -> type }`
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDef {
    pub name: String,
    /// Generic type parameters, e.g. the `T` in `provider Cache<T>`.
    pub type_params: Vec<String>,
    pub methods: Vec<ProviderMethod>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMethod {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
}

/// A named, typed parameter of a function or provider method.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub required: bool,
    pub default: Option<Expr>,
}

/// `@ GET /users/:id -> User { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    pub return_type: Option<Type>,
    pub auth: Option<AuthConfig>,
    pub rate_limit: Option<RateLimit>,
    pub injections: Vec<Injection>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        };
        f.write_str(s)
    }
}

/// `+ auth(jwt)`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub scheme: String,
}

/// `+ ratelimit(100/min)`
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimit {
    pub requests: u32,
    pub window: String,
}

/// `% db: Database`
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub name: String,
    pub ty: Type,
}

/// `@ ws /chat { on connect { ... } }`
#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketRoute {
    pub path: String,
    pub events: Vec<WebSocketEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketEvent {
    pub kind: WsEventKind,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WsEventKind {
    Connect,
    Message,
    Disconnect,
    Error,
}

/// `! name(param: type!) : Ret { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Vec<Statement>,
}

/// `! deploy "Deploy the app" env: str! --verbose: bool { ... }`
///
/// Commands take positional parameters and `--flags` without parens; a
/// parenthesized parameter list makes the item a [`Function`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<CommandParam>,
    pub return_type: Option<Type>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandParam {
    pub name: String,
    pub ty: Option<Type>,
    pub required: bool,
    pub is_flag: bool,
    pub default: Option<Expr>,
}

/// `* "0 0 * * *" daily_cleanup { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CronTask {
    pub name: Option<String>,
    pub schedule: String,
    pub timezone: Option<String>,
    pub retries: u32,
    pub injections: Vec<Injection>,
    pub body: Vec<Statement>,
}

/// `~ "user.created" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EventHandler {
    pub event: String,
    pub is_async: bool,
    pub injections: Vec<Injection>,
    pub body: Vec<Statement>,
}

/// `& "email.send" { + concurrency(5) ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct QueueWorker {
    pub queue: String,
    pub concurrency: u32,
    pub max_retries: u32,
    pub timeout: u32,
    pub injections: Vec<Injection>,
    pub body: Vec<Statement>,
}

/// `import "./models" as m` or `from "./models" import { User, Post as P }`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStatement {
    pub path: String,
    pub alias: Option<String>,
    pub selective: bool,
    pub names: Vec<ImportName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportName {
    /// The name this import is visible under locally.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// `module "myapp/utils"`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
}

/// `const MAX_RETRIES = 3`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub value: Expr,
}
